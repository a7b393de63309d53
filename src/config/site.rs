//! Site and theme configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
///
/// Every field has a built-in default, so `_config.yml` only needs the keys
/// it overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    // Site
    pub title: String,
    pub author: String,
    pub desc: String,
    pub website: String,
    pub locale: String,
    pub theme_style: ThemeStyle,

    // Listing
    pub pagination: PaginationConfig,

    // Header & navigation
    pub socials: Vec<LinkItem>,
    pub header: HeaderConfig,
    pub navs: Vec<LinkItem>,

    // Category
    pub category_map: Vec<CategoryMapping>,

    // Directory
    pub content_dir: String,
    pub public_dir: String,
    pub languages_dir: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            title: "Ryuichi's Blog".to_string(),
            author: "Ryuichi".to_string(),
            desc: "Life is a game".to_string(),
            website: "https://astro-blog-sunsir007.vercel.app/".to_string(),
            locale: "en-us".to_string(),
            theme_style: ThemeStyle::Dark,

            pagination: PaginationConfig::default(),

            socials: vec![
                LinkItem::new("github", "https://github.com/ryusaksun"),
                LinkItem::new("rss", "/atom.xml"),
                LinkItem::new("twitter", "https://twitter.com/Ryuichi_lol"),
            ],
            header: HeaderConfig::default(),
            navs: vec![
                LinkItem::new("Posts", "/"),
                LinkItem::new("Essays", "/essays"),
                LinkItem::new("Gallery", "/gallery"),
            ],

            category_map: Vec::new(),

            content_dir: "content".to_string(),
            public_dir: "public".to_string(),
            languages_dir: "languages".to_string(),
        }
    }
}

impl ThemeConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: ThemeConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Absolute URL for a site-relative link
    pub fn absolute_url(&self, link: &str) -> String {
        if link.starts_with("http://") || link.starts_with("https://") {
            return link.to_string();
        }
        format!(
            "{}/{}",
            self.website.trim_end_matches('/'),
            link.trim_start_matches('/')
        )
    }
}

/// Color scheme of the theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeStyle {
    Light,
    Dark,
}

/// Pagination configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub posts_per_page: usize,
    pub essays_per_page: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            posts_per_page: 5,
            essays_per_page: 10,
        }
    }
}

/// Header metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderConfig {
    pub twitter: String,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            twitter: "@ryuichi_lol".to_string(),
        }
    }
}

/// A named link (social profile or navigation entry)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkItem {
    pub name: String,
    pub href: String,
}

impl LinkItem {
    pub fn new(name: &str, href: &str) -> Self {
        Self {
            name: name.to_string(),
            href: href.to_string(),
        }
    }
}

/// Maps a category name to the path its pages live under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryMapping {
    pub name: String,
    pub path: String,
}

impl CategoryMapping {
    pub fn new(name: &str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
        }
    }
}
