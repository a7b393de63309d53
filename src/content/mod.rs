//! Content module - posts, essays, and content processing

pub mod document;
mod frontmatter;
pub mod loader;
mod markdown;
mod sanitize;

pub use document::{
    sort_by_date_desc, Dated, Document, DocumentKind, Enclosure, Essay, FeedSource, ItemMeta, Post,
};
pub use frontmatter::FrontMatter;
pub use loader::{ContentSource, FsContentSource};
pub use markdown::MarkdownRenderer;
pub use sanitize::Sanitizer;
