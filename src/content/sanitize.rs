//! HTML sanitizer with a configurable tag allow-list

use lol_html::html_content::Element;
use lol_html::{doc_comments, element, rewrite_str, RewriteStrSettings};
use std::collections::HashSet;

use crate::helpers::html_escape;

/// Tags allowed by the general-purpose policy
const DEFAULT_TAGS: &[&str] = &[
    "address", "article", "aside", "footer", "header", "h1", "h2", "h3", "h4", "h5", "h6",
    "hgroup", "main", "nav", "section", "blockquote", "dd", "div", "dl", "dt", "figcaption",
    "figure", "hr", "li", "ol", "p", "pre", "ul", "a", "abbr", "b", "bdi", "bdo", "br", "cite",
    "code", "data", "dfn", "em", "i", "kbd", "mark", "q", "rb", "rp", "rt", "rtc", "ruby", "s",
    "samp", "small", "span", "strong", "sub", "sup", "time", "u", "var", "wbr", "caption", "col",
    "colgroup", "table", "tbody", "td", "tfoot", "th", "thead", "tr",
];

/// Tags whose text content is dropped along with the tag
const NON_TEXT_TAGS: &[&str] = &["script", "style", "textarea", "option", "noscript"];

const URL_ATTRIBUTES: &[&str] = &["href", "src"];

const ALLOWED_SCHEMES: &[&str] = &["http", "https", "ftp", "mailto", "tel"];

/// Strips every tag outside its allow-list, keeping the text in between
#[derive(Debug, Clone)]
pub struct Sanitizer {
    allowed_tags: HashSet<String>,
}

impl Sanitizer {
    /// Allow exactly the given tags
    pub fn with_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            allowed_tags: tags
                .into_iter()
                .map(|t| t.as_ref().to_ascii_lowercase())
                .collect(),
        }
    }

    /// Plain text: no tag survives
    pub fn strip_all() -> Self {
        Self::with_tags(std::iter::empty::<&str>())
    }

    /// Feed content: the general-purpose list plus images
    pub fn feed() -> Self {
        Self::with_tags(DEFAULT_TAGS.iter().chain(["img"].iter()))
    }

    pub fn allows(&self, tag: &str) -> bool {
        self.allowed_tags.contains(tag)
    }

    /// Sanitize an HTML fragment
    pub fn sanitize(&self, html: &str) -> String {
        let settings = RewriteStrSettings {
            element_content_handlers: vec![element!("*", |el| {
                let name = el.tag_name();
                if self.allows(&name) {
                    filter_attributes(el, &name);
                } else if NON_TEXT_TAGS.contains(&name.as_str()) {
                    el.remove();
                } else {
                    el.remove_and_keep_content();
                }
                Ok(())
            })],
            document_content_handlers: vec![doc_comments!(|comment| {
                comment.remove();
                Ok(())
            })],
            ..RewriteStrSettings::new()
        };

        rewrite_str(html, settings).unwrap_or_else(|e| {
            tracing::warn!("Failed to sanitize HTML, escaping it instead: {}", e);
            html_escape(html)
        })
    }
}

/// Drop every attribute the tag does not allow, and URLs with unsafe schemes
fn filter_attributes(el: &mut Element<'_, '_>, tag: &str) {
    let allowed = allowed_attributes(tag);
    let attributes: Vec<(String, String)> = el
        .attributes()
        .iter()
        .map(|attr| (attr.name(), attr.value()))
        .collect();

    for (name, value) in attributes {
        let keep = allowed.contains(&name.as_str())
            && (!URL_ATTRIBUTES.contains(&name.as_str()) || is_allowed_url(&value));
        if !keep {
            el.remove_attribute(&name);
        }
    }
}

fn allowed_attributes(tag: &str) -> &'static [&'static str] {
    match tag {
        "a" => &["href", "name", "target"],
        "img" => &["src", "srcset", "alt", "title", "width", "height", "loading"],
        _ => &[],
    }
}

/// Relative URLs and a handful of schemes pass; `javascript:` and friends do not
fn is_allowed_url(value: &str) -> bool {
    let value = value.trim();
    let scheme_end = value.find(|c| matches!(c, ':' | '/' | '?' | '#'));
    match scheme_end {
        Some(pos) if value[pos..].starts_with(':') => {
            let scheme = value[..pos].to_ascii_lowercase();
            ALLOWED_SCHEMES.contains(&scheme.as_str())
        }
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_all_keeps_text() {
        let s = Sanitizer::strip_all();
        assert_eq!(
            s.sanitize("<h1>Title</h1>\n<p>Hello <b>World</b></p>\n"),
            "Title\nHello World\n"
        );
    }

    #[test]
    fn test_strip_all_drops_script_content_and_comments() {
        let s = Sanitizer::strip_all();
        assert_eq!(
            s.sanitize("<p>a<script>evil()</script>b<!-- note -->c</p>"),
            "abc"
        );
    }

    #[test]
    fn test_feed_keeps_images_and_links() {
        let s = Sanitizer::feed();
        let out = s.sanitize(
            r#"<p><img src="/cat.png" alt="cat" onerror="x()"><a href="https://x.io" class="k">x</a></p>"#,
        );
        assert!(out.starts_with(r#"<p><img src="/cat.png" alt="cat""#));
        assert!(out.ends_with(r#"<a href="https://x.io">x</a></p>"#));
        assert!(!out.contains("onerror"));
        assert!(!out.contains("class"));
    }

    #[test]
    fn test_tags_outside_allow_list_are_unwrapped() {
        let s = Sanitizer::with_tags(["p"]);
        assert_eq!(
            s.sanitize(r#"<p><img src="/cat.png"><em>hi</em></p>"#),
            "<p>hi</p>"
        );
    }

    #[test]
    fn test_unsafe_scheme_is_removed() {
        let s = Sanitizer::feed();
        assert_eq!(
            s.sanitize(r#"<a href="javascript:alert(1)">x</a>"#),
            "<a>x</a>"
        );
        assert!(is_allowed_url("mailto:me@example.com"));
        assert!(is_allowed_url("/posts/a:b/"));
    }

    #[test]
    fn test_disallowed_attributes_dropped_from_allowed_tags() {
        let s = Sanitizer::feed();
        assert_eq!(
            s.sanitize(r#"<pre style="color: red"><span style="x">fn</span></pre>"#),
            "<pre><span>fn</span></pre>"
        );
    }
}
