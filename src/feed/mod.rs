//! RSS feed of posts and essays
//!
//! Posts and essays are merged newest first and serialized as RSS 2.0 with a
//! `pretty-feed` XSL stylesheet instruction. [`FeedGenerator::respond`] is the
//! HTTP-shaped entry point: it never fails, it answers 500 instead.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use rss::validation::Validate;
use rss::{
    Category, CategoryBuilder, Channel, ChannelBuilder, EnclosureBuilder, GuidBuilder, Item,
    ItemBuilder, SourceBuilder,
};
use std::collections::BTreeMap;

use crate::cache::CollectionCache;
use crate::config::ThemeConfig;
use crate::content::{sort_by_date_desc, Document, MarkdownRenderer, Sanitizer};
use crate::error::FeedError;
use crate::helpers::{date_rfc2822, essay_display_title, post_description};
use crate::store::ContentStore;

/// Stylesheet referenced from the feed
pub const STYLESHEET: &str = "/pretty-feed-v3.xsl";

/// Body of the failure response
pub const FEED_ERROR_BODY: &str = "Error generating RSS feed";

const CONTENT_NAMESPACE: &str = "http://purl.org/rss/1.0/modules/content/";

/// Status, content type and body of the feed endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedResponse {
    pub status: StatusCode,
    pub content_type: &'static str,
    pub body: String,
}

impl FeedResponse {
    fn ok(body: String) -> Self {
        Self {
            status: StatusCode::OK,
            content_type: "application/xml; charset=utf-8",
            body,
        }
    }

    fn error() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            content_type: "text/plain; charset=utf-8",
            body: FEED_ERROR_BODY.to_string(),
        }
    }
}

impl IntoResponse for FeedResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, self.content_type)],
            self.body,
        )
            .into_response()
    }
}

/// Builds the feed from a content store
pub struct FeedGenerator<'a> {
    config: &'a ThemeConfig,
    renderer: &'a MarkdownRenderer,
    sanitizer: Sanitizer,
}

impl<'a> FeedGenerator<'a> {
    pub fn new(config: &'a ThemeConfig, renderer: &'a MarkdownRenderer) -> Self {
        Self {
            config,
            renderer,
            sanitizer: Sanitizer::feed(),
        }
    }

    /// Serve the feed: 200 with the XML, or 500 with a plain-text message
    pub fn respond(&self, store: &ContentStore, cache: &mut CollectionCache) -> FeedResponse {
        match self.generate(store, cache) {
            Ok(xml) => FeedResponse::ok(xml),
            Err(e) => {
                tracing::error!("Error generating RSS feed: {}", e);
                FeedResponse::error()
            }
        }
    }

    /// Build the feed XML
    pub fn generate(
        &self,
        store: &ContentStore,
        cache: &mut CollectionCache,
    ) -> Result<String, FeedError> {
        let documents = merged_documents(store, cache)?;

        let mut items = Vec::with_capacity(documents.len());
        let mut custom_data = Vec::with_capacity(documents.len());
        for doc in &documents {
            let item = self.item(doc);
            if let Err(e) = item.validate() {
                tracing::warn!("Leaving {} out of the feed: {}", doc.link(), e);
                continue;
            }
            items.push(item);
            custom_data.push(doc.meta().custom_data.as_deref());
        }
        let count = items.len();

        let channel = self.channel(items);
        channel
            .validate()
            .map_err(|e| FeedError::Validation(e.to_string()))?;

        let xml = channel
            .write_to(Vec::new())
            .map_err(|e| FeedError::Serialization(e.to_string()))
            .and_then(|bytes| {
                String::from_utf8(bytes).map_err(|e| FeedError::Serialization(e.to_string()))
            })?;

        tracing::debug!("Generated feed with {} items", count);
        Ok(with_stylesheet(&splice_custom_data(&xml, &custom_data)))
    }

    fn channel(&self, items: Vec<Item>) -> Channel {
        let mut namespaces = BTreeMap::new();
        namespaces.insert("content".to_string(), CONTENT_NAMESPACE.to_string());

        ChannelBuilder::default()
            .title(self.config.title.clone())
            .link(self.config.website.clone())
            .description(self.config.desc.clone())
            .language(Some(self.config.locale.clone()))
            .generator(Some(format!("blog-rs {}", env!("CARGO_PKG_VERSION"))))
            .namespaces(namespaces)
            .items(items)
            .build()
    }

    fn item(&self, doc: &Document) -> Item {
        let link = self.config.absolute_url(&doc.link());
        let meta = doc.meta();

        let (title, description, categories): (String, Option<String>, Vec<Category>) = match doc
        {
            Document::Post(post) => (
                post.title.clone(),
                Some(post_description(self.renderer, post)),
                post.categories
                    .iter()
                    .map(|name| CategoryBuilder::default().name(name.clone()).build())
                    .collect(),
            ),
            Document::Essay(essay) => (essay_display_title(self.renderer, essay), None, Vec::new()),
        };

        let enclosure = meta.enclosure.as_ref().map(|e| {
            EnclosureBuilder::default()
                .url(self.config.absolute_url(&e.url))
                .length(e.length.to_string())
                .mime_type(e.mime_type.clone())
                .build()
        });
        let source = meta.source.as_ref().map(|s| {
            SourceBuilder::default()
                .url(self.config.absolute_url(&s.url))
                .title(Some(s.title.clone()))
                .build()
        });
        let content = self.sanitizer.sanitize(&self.renderer.render(doc.body()));

        ItemBuilder::default()
            .title(Some(title))
            .link(Some(link.clone()))
            .guid(Some(GuidBuilder::default().permalink(true).value(link).build()))
            .description(description)
            .author(Some(self.config.author.clone()))
            .categories(categories)
            .comments(
                meta.comments_url
                    .as_deref()
                    .map(|url| self.config.absolute_url(url)),
            )
            .enclosure(enclosure)
            .source(source)
            .pub_date(doc.pub_date().map(|date| date_rfc2822(&date)))
            .content(Some(content))
            .build()
    }
}

/// Posts and essays merged into one list, newest first
fn merged_documents(
    store: &ContentStore,
    cache: &mut CollectionCache,
) -> Result<Vec<Document>, FeedError> {
    let posts = store.try_posts(cache)?;
    let essays = store.try_essays(cache)?;

    let mut documents: Vec<Document> = posts
        .iter()
        .cloned()
        .map(Document::Post)
        .chain(essays.iter().cloned().map(Document::Essay))
        .collect();
    sort_by_date_desc(&mut documents);
    Ok(documents)
}

/// Insert each item's raw custom XML just before its closing tag
fn splice_custom_data(xml: &str, custom_data: &[Option<&str>]) -> String {
    const CLOSE: &str = "</item>";

    if custom_data.iter().all(Option::is_none) {
        return xml.to_string();
    }

    let mut out = String::with_capacity(xml.len());
    let mut rest = xml;
    for data in custom_data {
        let Some(pos) = rest.find(CLOSE) else { break };
        out.push_str(&rest[..pos]);
        if let Some(data) = data {
            out.push_str(data);
        }
        out.push_str(CLOSE);
        rest = &rest[pos + CLOSE.len()..];
    }
    out.push_str(rest);
    out
}

/// Replace any XML declaration with ours, followed by the stylesheet instruction
fn with_stylesheet(xml: &str) -> String {
    let mut body = xml.trim_start();
    if body.starts_with("<?xml ") {
        if let Some(end) = body.find("?>") {
            body = body[end + 2..].trim_start();
        }
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><?xml-stylesheet href="{}" type="text/xsl"?>{}"#,
        STYLESHEET, body
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Enclosure, Essay, Post};
    use crate::store::testing::MemorySource;
    use chrono::{Local, TimeZone};

    fn at(year: i32, month: u32) -> Option<chrono::DateTime<Local>> {
        Some(Local.with_ymd_and_hms(year, month, 1, 12, 0, 0).unwrap())
    }

    fn source() -> MemorySource {
        let mut newest = Post::new("newest", "Newest Post");
        newest.pub_date = at(2024, 5);
        newest.categories = vec!["tech".to_string()];
        newest.body = "Hello **feed**\n\n![cat](https://example.com/cat.png)".to_string();

        let mut oldest = Post::new("oldest", "Oldest Post");
        oldest.pub_date = at(2020, 1);
        oldest.body = "Old words".to_string();
        oldest.meta.custom_data = Some("<mood>calm</mood>".to_string());
        oldest.meta.enclosure = Some(Enclosure {
            url: "https://example.com/a.mp3".to_string(),
            length: 2048,
            mime_type: "audio/mpeg".to_string(),
        });

        let mut essay = Essay::new("middle");
        essay.pub_date = at(2022, 3);
        essay.body = "A short essay without any title at all".to_string();

        MemorySource {
            posts: vec![oldest, newest],
            essays: vec![essay],
            ..Default::default()
        }
    }

    fn respond(src: MemorySource) -> FeedResponse {
        let config = ThemeConfig::default();
        let renderer = MarkdownRenderer::new();
        let store = ContentStore::new(src);
        let mut cache = CollectionCache::default();
        FeedGenerator::new(&config, &renderer).respond(&store, &mut cache)
    }

    #[test]
    fn test_feed_success() {
        let response = respond(source());
        assert_eq!(response.status, StatusCode::OK);
        assert!(response.content_type.starts_with("application/xml"));

        let body = &response.body;
        assert!(body.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?><?xml-stylesheet href="/pretty-feed-v3.xsl" type="text/xsl"?>"#));
        assert_eq!(body.matches("<?xml ").count(), 1);
        assert!(body.contains("<title>Ryuichi&apos;s Blog</title>") || body.contains("<title>Ryuichi's Blog</title>"));
    }

    #[test]
    fn test_items_are_merged_newest_first() {
        let body = respond(source()).body;
        let newest = body.find("/posts/newest/").unwrap();
        let middle = body.find("/essays/middle/").unwrap();
        let oldest = body.find("/posts/oldest/").unwrap();
        assert!(newest < middle && middle < oldest);
        assert!(body.contains("https://astro-blog-sunsir007.vercel.app/posts/newest/"));
    }

    #[test]
    fn test_item_fields() {
        let body = respond(source()).body;
        assert!(body.contains("<title>Newest Post</title>"));
        assert!(body.contains("A short essay without any title at all"));
        assert!(body.contains("tech</category>"));
        assert!(body.contains(r#"<img src="https://example.com/cat.png" alt="cat" />"#));
        assert!(body.contains("<mood>calm</mood></item>"));
        assert!(body.contains("audio/mpeg"));
        assert!(body.contains("<author>Ryuichi</author>"));
    }

    #[test]
    fn test_load_failure_is_500() {
        let src = source();
        src.set_failing(true);
        let response = respond(src);
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.content_type.starts_with("text/plain"));
        assert_eq!(response.body, FEED_ERROR_BODY);
    }

    #[test]
    fn test_invalid_site_url_is_500() {
        let config = ThemeConfig {
            website: "not a url".to_string(),
            ..Default::default()
        };
        let renderer = MarkdownRenderer::new();
        let store = ContentStore::new(source());
        let mut cache = CollectionCache::default();
        let generator = FeedGenerator::new(&config, &renderer);
        assert!(matches!(
            generator.generate(&store, &mut cache),
            Err(FeedError::Validation(_))
        ));
        assert_eq!(
            generator.respond(&store, &mut cache).status,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    fn single_post(edit: impl FnOnce(&mut Post)) -> MemorySource {
        let mut post = Post::new("a", "A");
        post.pub_date = at(2024, 1);
        edit(&mut post);
        MemorySource {
            posts: vec![post],
            ..Default::default()
        }
    }

    #[test]
    fn test_relative_comments_url_is_resolved() {
        let response = respond(single_post(|post| {
            post.meta.comments_url = Some("/posts/a/#comments".to_string());
        }));
        assert_eq!(response.status, StatusCode::OK);
        assert!(response.body.contains(
            "<comments>https://astro-blog-sunsir007.vercel.app/posts/a/#comments</comments>"
        ));
    }

    #[test]
    fn test_relative_enclosure_url_is_resolved() {
        let response = respond(single_post(|post| {
            post.meta.enclosure = Some(Enclosure {
                url: "/audio/a.mp3".to_string(),
                length: 10,
                mime_type: "audio/mpeg".to_string(),
            });
        }));
        assert_eq!(response.status, StatusCode::OK);
        assert!(response
            .body
            .contains("https://astro-blog-sunsir007.vercel.app/audio/a.mp3"));
    }

    #[test]
    fn test_invalid_item_is_left_out() {
        let mut src = source();
        let mut broken = Post::new("broken", "Broken");
        broken.pub_date = at(2023, 1);
        broken.meta.comments_url = Some("http://[not-a-host".to_string());
        broken.meta.custom_data = Some("<lost/>".to_string());
        src.posts.push(broken);

        let response = respond(src);
        assert_eq!(response.status, StatusCode::OK);
        assert!(!response.body.contains("/posts/broken/"));
        assert!(!response.body.contains("<lost/>"));
        assert!(response.body.contains("/posts/newest/"));
        assert!(response.body.contains("<mood>calm</mood></item>"));
    }

    #[test]
    fn test_splice_custom_data() {
        let xml = "<a><item>1</item><item>2</item></a>";
        assert_eq!(
            splice_custom_data(xml, &[None, Some("<x/>")]),
            "<a><item>1</item><item>2<x/></item></a>"
        );
        assert_eq!(splice_custom_data(xml, &[None, None]), xml);
    }

    #[test]
    fn test_with_stylesheet_replaces_declaration() {
        let out = with_stylesheet(r#"<?xml version="1.0" encoding="utf-8"?><rss/>"#);
        assert!(out.ends_with("?><rss/>"));
        assert_eq!(out.matches("<?xml ").count(), 1);
        assert!(out.contains(STYLESHEET));
    }
}
