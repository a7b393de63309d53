//! Post, Essay and the tagged Document union

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Source a feed item was republished from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSource {
    pub url: String,
    pub title: String,
}

/// Media attached to a feed item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enclosure {
    pub url: String,
    pub length: u64,
    #[serde(rename = "type")]
    pub mime_type: String,
}

/// Feed-only metadata shared by posts and essays
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemMeta {
    /// Raw XML appended to the feed item
    pub custom_data: Option<String>,
    pub comments_url: Option<String>,
    pub source: Option<FeedSource>,
    pub enclosure: Option<Enclosure>,
}

/// A long-form blog post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// URL-friendly name derived from the file name
    pub slug: String,

    /// Post title
    pub title: String,

    /// Publication date
    pub pub_date: Option<DateTime<Local>>,

    /// Post categories, in front-matter order
    pub categories: Vec<String>,

    pub meta: ItemMeta,

    /// Raw markdown content
    pub body: String,
}

impl Post {
    pub fn new(slug: &str, title: &str) -> Self {
        Self {
            slug: slug.to_string(),
            title: title.to_string(),
            pub_date: None,
            categories: Vec::new(),
            meta: ItemMeta::default(),
            body: String::new(),
        }
    }

    pub fn link(&self) -> String {
        format!("/posts/{}/", self.slug)
    }
}

/// A short-form essay; the title is optional
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Essay {
    pub slug: String,
    pub title: Option<String>,
    pub pub_date: Option<DateTime<Local>>,
    pub meta: ItemMeta,
    pub body: String,
}

impl Essay {
    pub fn new(slug: &str) -> Self {
        Self {
            slug: slug.to_string(),
            title: None,
            pub_date: None,
            meta: ItemMeta::default(),
            body: String::new(),
        }
    }

    pub fn link(&self) -> String {
        format!("/essays/{}/", self.slug)
    }
}

/// Discriminator between the two collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Post,
    Essay,
}

impl DocumentKind {
    /// Collection name on disk
    pub fn collection(&self) -> &'static str {
        match self {
            DocumentKind::Post => "posts",
            DocumentKind::Essay => "essays",
        }
    }
}

/// Either kind of content document
#[derive(Debug, Clone)]
pub enum Document {
    Post(Post),
    Essay(Essay),
}

impl Document {
    pub fn kind(&self) -> DocumentKind {
        match self {
            Document::Post(_) => DocumentKind::Post,
            Document::Essay(_) => DocumentKind::Essay,
        }
    }

    pub fn slug(&self) -> &str {
        match self {
            Document::Post(post) => &post.slug,
            Document::Essay(essay) => &essay.slug,
        }
    }

    /// Site-relative link to the rendered page
    pub fn link(&self) -> String {
        match self {
            Document::Post(post) => post.link(),
            Document::Essay(essay) => essay.link(),
        }
    }

    pub fn pub_date(&self) -> Option<DateTime<Local>> {
        match self {
            Document::Post(post) => post.pub_date,
            Document::Essay(essay) => essay.pub_date,
        }
    }

    pub fn body(&self) -> &str {
        match self {
            Document::Post(post) => &post.body,
            Document::Essay(essay) => &essay.body,
        }
    }

    pub fn meta(&self) -> &ItemMeta {
        match self {
            Document::Post(post) => &post.meta,
            Document::Essay(essay) => &essay.meta,
        }
    }
}

/// Anything ordered by publish date
pub trait Dated {
    fn pub_date(&self) -> Option<DateTime<Local>>;
}

impl Dated for Post {
    fn pub_date(&self) -> Option<DateTime<Local>> {
        self.pub_date
    }
}

impl Dated for Essay {
    fn pub_date(&self) -> Option<DateTime<Local>> {
        self.pub_date
    }
}

impl Dated for Document {
    fn pub_date(&self) -> Option<DateTime<Local>> {
        Document::pub_date(self)
    }
}

/// Sort newest first. A missing date counts as "now", sampled once per call,
/// so undated documents float to the top.
pub fn sort_by_date_desc<T: Dated>(items: &mut [T]) {
    let now = Local::now();
    items.sort_by(|a, b| {
        let a_date = a.pub_date().unwrap_or(now);
        let b_date = b.pub_date().unwrap_or(now);
        b_date.cmp(&a_date)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn dated_post(slug: &str, date: Option<(i32, u32, u32)>) -> Post {
        let mut post = Post::new(slug, slug);
        post.pub_date = date.map(|(y, m, d)| Local.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap());
        post
    }

    #[test]
    fn test_links() {
        assert_eq!(Post::new("hello", "Hello").link(), "/posts/hello/");
        assert_eq!(Essay::new("thought").link(), "/essays/thought/");
        let doc = Document::Essay(Essay::new("thought"));
        assert_eq!(doc.kind(), DocumentKind::Essay);
        assert_eq!(doc.link(), "/essays/thought/");
    }

    #[test]
    fn test_sort_newest_first() {
        let mut posts = vec![
            dated_post("old", Some((2020, 1, 1))),
            dated_post("new", Some((2024, 6, 1))),
            dated_post("mid", Some((2022, 3, 15))),
        ];
        sort_by_date_desc(&mut posts);
        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_undated_sorts_first() {
        let mut posts = vec![
            dated_post("dated", Some((2024, 6, 1))),
            dated_post("undated", None),
        ];
        sort_by_date_desc(&mut posts);
        assert_eq!(posts[0].slug, "undated");
    }

    #[test]
    fn test_mixed_documents_sort_together() {
        let mut essay = Essay::new("essay");
        essay.pub_date = Some(Local.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap());
        let mut docs = vec![
            Document::Post(dated_post("post-old", Some((2021, 1, 1)))),
            Document::Essay(essay),
            Document::Post(dated_post("post-new", Some((2024, 1, 1)))),
        ];
        sort_by_date_desc(&mut docs);
        let slugs: Vec<_> = docs.iter().map(|d| d.slug()).collect();
        assert_eq!(slugs, vec!["post-new", "essay", "post-old"]);
    }
}
