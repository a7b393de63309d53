//! Descriptions and display titles derived from markdown bodies

use lazy_static::lazy_static;

use super::html::{truncate, truncate_chars};
use crate::content::{Essay, MarkdownRenderer, Post, Sanitizer};

/// Maximum length of a post description, in characters
pub const DESCRIPTION_LENGTH: usize = 400;

/// Maximum length of a derived essay title, in characters
pub const ESSAY_TITLE_LENGTH: usize = 50;

const ELLIPSIS: &str = "...";

lazy_static! {
    static ref PLAIN_TEXT: Sanitizer = Sanitizer::strip_all();
}

/// Render markdown and strip every tag
pub fn plain_text(renderer: &MarkdownRenderer, markdown: &str) -> String {
    PLAIN_TEXT.sanitize(&renderer.render(markdown))
}

/// Plain-text excerpt of a post: the first 400 characters of its body
pub fn post_description(renderer: &MarkdownRenderer, post: &Post) -> String {
    let text = plain_text(renderer, &post.body);
    truncate_chars(&text, DESCRIPTION_LENGTH).to_string()
}

/// The essay's title, or the opening of its body when it has none
pub fn essay_display_title(renderer: &MarkdownRenderer, essay: &Essay) -> String {
    if let Some(title) = essay.title.as_deref().filter(|t| !t.is_empty()) {
        return title.to_string();
    }

    let text = plain_text(renderer, &essay.body);
    truncate(text.trim(), ESSAY_TITLE_LENGTH, Some(ELLIPSIS))
}
