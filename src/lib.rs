//! blog-rs: content pipeline for a personal blog
//!
//! Loads markdown posts and essays, orders and memoizes them, indexes posts
//! by category and serializes an RSS feed of everything, newest first.

pub mod cache;
pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod feed;
pub mod helpers;
pub mod i18n;
pub mod server;
pub mod store;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// The main blog application
#[derive(Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::ThemeConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Content directory holding `posts/` and `essays/`
    pub content_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
    /// Extra language files
    pub languages_dir: PathBuf,
}

impl Blog {
    /// Create a new Blog instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::ThemeConfig::load(&config_path)?
        } else {
            config::ThemeConfig::default()
        };

        let content_dir = base_dir.join(&config.content_dir);
        let public_dir = base_dir.join(&config.public_dir);
        let languages_dir = base_dir.join(&config.languages_dir);

        Ok(Self {
            config,
            base_dir,
            content_dir,
            public_dir,
            languages_dir,
        })
    }

    /// Store reading from the content directory
    pub fn content_store(&self) -> store::ContentStore {
        store::ContentStore::new(content::FsContentSource::new(&self.content_dir))
    }

    /// Translator for the configured locale, with language files applied
    pub fn translator(&self) -> Result<i18n::Translator> {
        let mut translator = i18n::Translator::new(&self.config.locale);
        translator.load_languages(&self.languages_dir)?;
        Ok(translator)
    }

    /// Write the feed into the public directory
    pub fn generate(&self) -> Result<()> {
        commands::generate::run(self)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
