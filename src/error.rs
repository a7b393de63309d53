//! Error types for content loading, feed generation and translations

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading a content collection
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid front-matter in {path:?}: {message}")]
    FrontMatter { path: PathBuf, message: String },

    #[error("Duplicate slug '{slug}' in collection '{collection}'")]
    DuplicateSlug { collection: String, slug: String },

    #[error("Content source unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised while building the syndication feed
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Failed to load content: {0}")]
    Content(#[from] ContentError),

    #[error("Feed validation failed: {0}")]
    Validation(String),

    #[error("Feed serialization failed: {0}")]
    Serialization(String),
}

/// Errors raised while loading language tables
#[derive(Error, Debug)]
pub enum I18nError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid language file {path:?}: {message}")]
    InvalidFile { path: PathBuf, message: String },

    #[error("Unknown message key '{key}' in {path:?}")]
    UnknownKey { path: PathBuf, key: String },
}
