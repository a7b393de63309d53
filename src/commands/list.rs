//! List site content

use anyhow::Result;
use std::fmt::Write;

use crate::cache::CollectionCache;
use crate::content::MarkdownRenderer;
use crate::helpers::{essay_display_title, format_date, format_essay_date, paginate, Page};
use crate::i18n::{MessageKey, Translator};
use crate::store::{path_from_category, ContentStore};
use crate::Blog;

/// List site content by type
pub fn run(blog: &Blog, content_type: &str, page: usize) -> Result<()> {
    let store = blog.content_store();
    let mut cache = CollectionCache::default();
    let translator = blog.translator()?;

    let listing = render(blog, &store, &mut cache, &translator, content_type, page)?;
    print!("{}", listing);
    Ok(())
}

/// Render one page of a listing
pub fn render(
    blog: &Blog,
    store: &ContentStore,
    cache: &mut CollectionCache,
    translator: &Translator,
    content_type: &str,
    page: usize,
) -> Result<String> {
    let mut out = String::new();
    let pagination = &blog.config.pagination;

    match content_type {
        "post" | "posts" => {
            let posts = store.posts(cache);
            writeln!(
                out,
                "{} ({}):",
                translator.get(MessageKey::Posts, None),
                posts.len()
            )?;

            let page = paginate(posts.as_slice(), pagination.posts_per_page, page);
            for post in page.items {
                writeln!(
                    out,
                    "  {} - {} [{}]",
                    format_date(post.pub_date.as_ref()),
                    post.title,
                    post.link()
                )?;
            }
            write_page_footer(&mut out, translator, &page)?;
        }
        "essay" | "essays" => {
            let essays = store.essays(cache);
            writeln!(
                out,
                "{} ({}):",
                translator.get(MessageKey::Essays, None),
                essays.len()
            )?;

            let renderer = MarkdownRenderer::new();
            let page = paginate(essays.as_slice(), pagination.essays_per_page, page);
            for essay in page.items {
                writeln!(
                    out,
                    "  {} - {} [{}]",
                    format_essay_date(essay.pub_date.as_ref()),
                    essay_display_title(&renderer, essay),
                    essay.link()
                )?;
            }
            write_page_footer(&mut out, translator, &page)?;
        }
        "category" | "categories" => {
            let index = store.categories(cache);
            writeln!(
                out,
                "{} ({}):",
                translator.get(MessageKey::Categories, None),
                index.len()
            )?;
            for (name, posts) in index.iter() {
                let path = path_from_category(cache, name, &blog.config.category_map);
                writeln!(
                    out,
                    "  {} ({}) -> {}",
                    name,
                    translator.get(MessageKey::PostCount, Some(&posts.len())),
                    path
                )?;
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, essay, category",
                content_type
            );
        }
    }

    Ok(out)
}

fn write_page_footer<T>(
    out: &mut String,
    translator: &Translator,
    page: &Page<'_, T>,
) -> Result<()> {
    if page.total_pages <= 1 {
        return Ok(());
    }

    let mut parts = Vec::new();
    if page.has_prev() {
        parts.push(translator.get(MessageKey::PreviousPage, None));
    }
    parts.push(format!(
        "{} / {}",
        translator.get(MessageKey::PageIndicator, Some(&page.number)),
        page.total_pages
    ));
    if page.has_next() {
        parts.push(translator.get(MessageKey::NextPage, None));
    }
    writeln!(out, "{}", parts.join(" | "))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CategoryMapping;
    use crate::content::{Essay, Post};
    use crate::store::testing::MemorySource;
    use chrono::{Local, TimeZone};
    use tempfile::TempDir;

    fn blog() -> (TempDir, Blog) {
        let tmp = TempDir::new().unwrap();
        let mut blog = Blog::new(tmp.path()).unwrap();
        blog.config.pagination.posts_per_page = 2;
        blog.config.category_map = vec![CategoryMapping::new("生活", "life")];
        (tmp, blog)
    }

    fn source() -> MemorySource {
        let posts = (1..=3)
            .map(|day| {
                let mut post = Post::new(&format!("p{}", day), &format!("Post {}", day));
                post.pub_date = Local.with_ymd_and_hms(2024, 1, day, 8, 0, 0).single();
                post.categories = vec!["生活".to_string(), "rust".to_string()];
                post
            })
            .collect();

        let mut essay = Essay::new("e1");
        essay.pub_date = Local.with_ymd_and_hms(2024, 2, 3, 21, 7, 0).single();
        essay.body = "Just a thought".to_string();

        MemorySource {
            posts,
            essays: vec![essay],
            ..Default::default()
        }
    }

    fn list(content_type: &str, page: usize, locale: &str) -> Result<String> {
        let (_tmp, blog) = blog();
        let store = ContentStore::new(source());
        let mut cache = CollectionCache::default();
        render(&blog, &store, &mut cache, &Translator::new(locale), content_type, page)
    }

    #[test]
    fn test_list_posts_paginated() {
        let first = list("post", 1, "en-us").unwrap();
        assert!(first.starts_with("Posts (3):\n"));
        assert!(first.contains("2024-01-03 - Post 3 [/posts/p3/]"));
        assert!(!first.contains("Post 1"));
        assert!(first.contains("Page 1 / 2 | Next"));

        let second = list("post", 2, "en-us").unwrap();
        assert!(second.contains("Post 1"));
        assert!(second.contains("Previous | Page 2 / 2"));
    }

    #[test]
    fn test_list_essays() {
        let out = list("essays", 1, "en-us").unwrap();
        assert!(out.contains("2024/02/03 21:07 - Just a thought [/essays/e1/]"));
    }

    #[test]
    fn test_list_categories_localized() {
        let out = list("category", 1, "zh-cn").unwrap();
        assert!(out.starts_with("分类 (2):"));
        assert!(out.contains("生活 (共 3 篇文章) -> life"));
        assert!(out.contains("rust (共 3 篇文章) -> rust"));
    }

    #[test]
    fn test_unknown_type() {
        assert!(list("tag", 1, "en-us").is_err());
    }
}
