//! In-process memo of loaded collections
//!
//! One `CollectionCache` lives for one build (or one server process) and is
//! passed by reference to whatever needs ordered collections. Nothing here
//! touches disk.

use std::collections::HashMap;
use std::sync::Arc;

use crate::content::{Essay, Post};

/// Whether collections are memoized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheMode {
    /// One-shot build: load once, reuse until invalidated
    Memoize,
    /// Interactive server with watching: always read fresh
    Bypass,
}

/// Memoized posts, essays and category-path lookups
#[derive(Debug)]
pub struct CollectionCache {
    mode: CacheMode,
    posts: Option<Arc<Vec<Post>>>,
    essays: Option<Arc<Vec<Essay>>>,
    category_paths: HashMap<String, String>,
}

impl CollectionCache {
    pub fn new(mode: CacheMode) -> Self {
        Self {
            mode,
            posts: None,
            essays: None,
            category_paths: HashMap::new(),
        }
    }

    /// Cached posts, or the result of `load` (memoized only on success)
    pub fn posts_or_populate<E, F>(&mut self, load: F) -> Result<Arc<Vec<Post>>, E>
    where
        F: FnOnce() -> Result<Vec<Post>, E>,
    {
        get_or_populate(&mut self.posts, self.mode, "posts", load)
    }

    /// Cached essays, or the result of `load` (memoized only on success)
    pub fn essays_or_populate<E, F>(&mut self, load: F) -> Result<Arc<Vec<Essay>>, E>
    where
        F: FnOnce() -> Result<Vec<Essay>, E>,
    {
        get_or_populate(&mut self.essays, self.mode, "essays", load)
    }

    /// Resolved category path for a composite key
    pub fn category_path_or_insert_with<F>(&mut self, key: String, resolve: F) -> String
    where
        F: FnOnce() -> String,
    {
        self.category_paths.entry(key).or_insert_with(resolve).clone()
    }

    /// Number of memoized category-path lookups
    pub fn category_path_len(&self) -> usize {
        self.category_paths.len()
    }

    pub fn is_populated(&self) -> bool {
        self.posts.is_some() || self.essays.is_some() || !self.category_paths.is_empty()
    }

    /// Drop every memoized value. Idempotent.
    pub fn invalidate(&mut self) {
        if self.is_populated() {
            tracing::debug!(
                "Clearing collection cache ({} category paths)",
                self.category_path_len()
            );
        }
        self.posts = None;
        self.essays = None;
        self.category_paths.clear();
    }
}

impl Default for CollectionCache {
    fn default() -> Self {
        Self::new(CacheMode::Memoize)
    }
}

fn get_or_populate<T, E, F>(
    slot: &mut Option<Arc<Vec<T>>>,
    mode: CacheMode,
    name: &str,
    load: F,
) -> Result<Arc<Vec<T>>, E>
where
    F: FnOnce() -> Result<Vec<T>, E>,
{
    if mode == CacheMode::Memoize {
        if let Some(cached) = slot {
            tracing::debug!("Cache hit: {}", name);
            return Ok(Arc::clone(cached));
        }
    }

    let loaded = Arc::new(load()?);
    if mode == CacheMode::Memoize {
        tracing::debug!("Cache populated: {} ({} items)", name, loaded.len());
        *slot = Some(Arc::clone(&loaded));
    }
    Ok(loaded)
}
