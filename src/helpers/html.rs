//! HTML helper functions

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// First `length` characters of `s`; may cut mid-word
pub fn truncate_chars(s: &str, length: usize) -> &str {
    match s.char_indices().nth(length) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Truncate a string, appending `omission` only when something was cut
pub fn truncate(s: &str, length: usize, omission: Option<&str>) -> String {
    let omission = omission.unwrap_or("...");
    let head = truncate_chars(s, length);
    if head.len() == s.len() {
        s.to_string()
    } else {
        format!("{}{}", head.trim_end(), omission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("<a href=\"x\">&</a>"), "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;");
    }

    #[test]
    fn test_truncate_chars_counts_characters() {
        assert_eq!(truncate_chars("héllo wörld", 7), "héllo w");
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("随笔内容", 2), "随笔");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hello World", 5, None), "Hello...");
        assert_eq!(truncate("Hi", 10, None), "Hi");
        assert_eq!(truncate("Hello", 5, Some("…")), "Hello");
    }
}
