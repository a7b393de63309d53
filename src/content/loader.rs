//! Content loader - loads posts and essays from the content directory

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::document::{DocumentKind, Essay, ItemMeta, Post};
use super::FrontMatter;
use crate::error::ContentError;

/// Where collections come from.
///
/// Loading is all-or-nothing: one bad document fails the whole collection.
pub trait ContentSource: Send + Sync {
    fn load_posts(&self) -> Result<Vec<Post>, ContentError>;
    fn load_essays(&self) -> Result<Vec<Essay>, ContentError>;
}

/// Reads `<content_dir>/posts/**/*.md` and `<content_dir>/essays/**/*.md`
#[derive(Debug, Clone)]
pub struct FsContentSource {
    content_dir: PathBuf,
}

impl FsContentSource {
    /// Create a new content loader
    pub fn new<P: AsRef<Path>>(content_dir: P) -> Self {
        Self {
            content_dir: content_dir.as_ref().to_path_buf(),
        }
    }

    /// Read every markdown file of a collection as (slug, front matter, body)
    fn load_collection(
        &self,
        kind: DocumentKind,
    ) -> Result<Vec<(String, FrontMatter, String)>, ContentError> {
        let dir = self.content_dir.join(kind.collection());
        if !dir.exists() {
            tracing::warn!("Collection directory {:?} does not exist", dir);
            return Ok(Vec::new());
        }

        let mut documents = Vec::new();
        let mut seen = HashSet::new();

        for entry in WalkDir::new(&dir).follow_links(true).sort_by_file_name() {
            let entry = entry.map_err(|e| ContentError::Io {
                path: e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.clone()),
                source: e.into(),
            })?;
            let path = entry.path();
            if !path.is_file() || !is_markdown_file(path) {
                continue;
            }

            let content = fs::read_to_string(path).map_err(|source| ContentError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            let (fm, body) =
                FrontMatter::parse(&content).map_err(|message| ContentError::FrontMatter {
                    path: path.to_path_buf(),
                    message,
                })?;

            let slug = slug_for(&dir, path);
            if !seen.insert(slug.clone()) {
                return Err(ContentError::DuplicateSlug {
                    collection: kind.collection().to_string(),
                    slug,
                });
            }

            tracing::debug!("Loaded {} {:?}", kind.collection(), path);
            documents.push((slug, fm, body.to_string()));
        }

        Ok(documents)
    }
}

impl ContentSource for FsContentSource {
    fn load_posts(&self) -> Result<Vec<Post>, ContentError> {
        self.load_collection(DocumentKind::Post)?
            .into_iter()
            .map(|(slug, fm, body)| -> Result<Post, ContentError> {
                let pub_date = fm.parse_pub_date().map_err(|message| {
                    ContentError::FrontMatter {
                        path: self.content_dir.join("posts").join(&slug),
                        message,
                    }
                })?;
                let categories = fm.category_list();
                let title = fm
                    .title
                    .clone()
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| slug.clone());

                Ok(Post {
                    title,
                    pub_date,
                    categories,
                    meta: item_meta(fm),
                    body,
                    slug,
                })
            })
            .collect()
    }

    fn load_essays(&self) -> Result<Vec<Essay>, ContentError> {
        self.load_collection(DocumentKind::Essay)?
            .into_iter()
            .map(|(slug, fm, body)| -> Result<Essay, ContentError> {
                let pub_date = fm.parse_pub_date().map_err(|message| {
                    ContentError::FrontMatter {
                        path: self.content_dir.join("essays").join(&slug),
                        message,
                    }
                })?;

                Ok(Essay {
                    title: fm.title.clone(),
                    pub_date,
                    meta: item_meta(fm),
                    body,
                    slug,
                })
            })
            .collect()
    }
}

fn item_meta(fm: FrontMatter) -> ItemMeta {
    ItemMeta {
        custom_data: fm.custom_data,
        comments_url: fm.comments_url,
        source: fm.source,
        enclosure: fm.enclosure,
    }
}

/// Slug from the path relative to the collection directory, without extension
fn slug_for(collection_dir: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(collection_dir).unwrap_or(path);
    let without_ext = relative.with_extension("");
    without_ext
        .components()
        .map(|c| slug::slugify(c.as_os_str().to_string_lossy()))
        .collect::<Vec<_>>()
        .join("/")
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}
