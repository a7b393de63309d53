//! Category index and category path lookup

use indexmap::IndexMap;

use crate::cache::CollectionCache;
use crate::config::CategoryMapping;
use crate::content::Post;

/// Category name (case-sensitive) to the posts tagged with it
#[derive(Debug, Clone, Default)]
pub struct CategoryIndex {
    buckets: IndexMap<String, Vec<Post>>,
}

impl CategoryIndex {
    /// Build from posts already in display order; buckets keep that order
    pub fn build(posts: &[Post]) -> Self {
        let mut buckets: IndexMap<String, Vec<Post>> = IndexMap::new();
        for post in posts {
            for category in &post.categories {
                buckets
                    .entry(category.clone())
                    .or_default()
                    .push(post.clone());
            }
        }
        Self { buckets }
    }

    pub fn posts(&self, category: &str) -> &[Post] {
        self.buckets.get(category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Category names with their posts, in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Post])> {
        self.buckets
            .iter()
            .map(|(name, posts)| (name.as_str(), posts.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Path for a category: the mapped path when `category_map` names it,
/// otherwise the category itself.
///
/// Memoized per (category, serialized map); the serialization follows map
/// order, so a reordered map is a separate entry.
pub fn path_from_category(
    cache: &mut CollectionCache,
    category: &str,
    category_map: &[CategoryMapping],
) -> String {
    let serialized = serde_json::to_string(category_map).unwrap_or_default();
    let key = format!("{}\u{0}{}", category, serialized);

    cache.category_path_or_insert_with(key, || {
        category_map
            .iter()
            .find(|mapping| mapping.name == category)
            .map(|mapping| mapping.path.clone())
            .unwrap_or_else(|| category.to_string())
    })
}
