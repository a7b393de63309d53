//! Ordered access to the post and essay collections

mod category;

pub use category::{path_from_category, CategoryIndex};

use std::sync::Arc;

use crate::cache::CollectionCache;
use crate::content::{sort_by_date_desc, ContentSource, Essay, Post};
use crate::error::ContentError;

/// Wraps a [`ContentSource`], sorting newest first and memoizing through the
/// cache it is handed.
pub struct ContentStore {
    source: Box<dyn ContentSource>,
}

impl ContentStore {
    pub fn new<S: ContentSource + 'static>(source: S) -> Self {
        Self {
            source: Box::new(source),
        }
    }

    /// All posts, newest first; empty if the collection fails to load
    pub fn posts(&self, cache: &mut CollectionCache) -> Arc<Vec<Post>> {
        self.try_posts(cache).unwrap_or_else(|e| {
            tracing::error!("Error fetching posts: {}", e);
            Arc::new(Vec::new())
        })
    }

    /// All essays, newest first; empty if the collection fails to load
    pub fn essays(&self, cache: &mut CollectionCache) -> Arc<Vec<Essay>> {
        self.try_essays(cache).unwrap_or_else(|e| {
            tracing::error!("Error fetching essays: {}", e);
            Arc::new(Vec::new())
        })
    }

    /// Like [`posts`](Self::posts) but surfaces the load error
    pub fn try_posts(&self, cache: &mut CollectionCache) -> Result<Arc<Vec<Post>>, ContentError> {
        cache.posts_or_populate(|| {
            let mut posts = self.source.load_posts()?;
            sort_by_date_desc(&mut posts);
            Ok(posts)
        })
    }

    /// Like [`essays`](Self::essays) but surfaces the load error
    pub fn try_essays(
        &self,
        cache: &mut CollectionCache,
    ) -> Result<Arc<Vec<Essay>>, ContentError> {
        cache.essays_or_populate(|| {
            let mut essays = self.source.load_essays()?;
            sort_by_date_desc(&mut essays);
            Ok(essays)
        })
    }

    /// Category name to posts, in post order
    pub fn categories(&self, cache: &mut CollectionCache) -> CategoryIndex {
        match self.try_posts(cache) {
            Ok(posts) => CategoryIndex::build(&posts),
            Err(e) => {
                tracing::error!("Error building categories: {}", e);
                CategoryIndex::default()
            }
        }
    }
}

/// Reset every memoized collection and lookup
pub fn clear_cache(cache: &mut CollectionCache) {
    cache.invalidate();
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    use crate::content::{ContentSource, Essay, Post};
    use crate::error::ContentError;

    /// In-memory source whose failure can be toggled from the test
    #[derive(Clone, Default)]
    pub struct MemorySource {
        pub posts: Vec<Post>,
        pub essays: Vec<Essay>,
        pub failing: Arc<AtomicBool>,
        pub loads: Arc<AtomicUsize>,
    }

    impl MemorySource {
        pub fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        pub fn load_count(&self) -> usize {
            self.loads.load(Ordering::SeqCst)
        }

        fn check(&self) -> Result<(), ContentError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            if self.failing.load(Ordering::SeqCst) {
                return Err(ContentError::Unavailable("memory source offline".to_string()));
            }
            Ok(())
        }
    }

    impl ContentSource for MemorySource {
        fn load_posts(&self) -> Result<Vec<Post>, ContentError> {
            self.check()?;
            Ok(self.posts.clone())
        }

        fn load_essays(&self) -> Result<Vec<Essay>, ContentError> {
            self.check()?;
            Ok(self.essays.clone())
        }
    }
}
