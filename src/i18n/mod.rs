//! Internationalization (i18n) support
//!
//! Messages are addressed by a closed set of [`MessageKey`]s. Built-in tables
//! cover `en-us` and `zh-cn`; extra language files are validated when loaded so
//! a misspelled key is reported up front instead of silently falling back.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::error::I18nError;

/// Placeholder replaced by the translation parameter
const PLACEHOLDER: &str = "%d";

/// Every message the site knows how to translate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    Posts,
    Essays,
    Gallery,
    Categories,
    Archive,
    PreviousPage,
    NextPage,
    PageIndicator,
    PostCount,
    ReadMore,
    BackToTop,
    NotFound,
}

impl MessageKey {
    pub const ALL: [MessageKey; 12] = [
        MessageKey::Posts,
        MessageKey::Essays,
        MessageKey::Gallery,
        MessageKey::Categories,
        MessageKey::Archive,
        MessageKey::PreviousPage,
        MessageKey::NextPage,
        MessageKey::PageIndicator,
        MessageKey::PostCount,
        MessageKey::ReadMore,
        MessageKey::BackToTop,
        MessageKey::NotFound,
    ];

    /// The key as written in language files and templates
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKey::Posts => "posts",
            MessageKey::Essays => "essays",
            MessageKey::Gallery => "gallery",
            MessageKey::Categories => "categories",
            MessageKey::Archive => "archive",
            MessageKey::PreviousPage => "previous_page",
            MessageKey::NextPage => "next_page",
            MessageKey::PageIndicator => "page_indicator",
            MessageKey::PostCount => "post_count",
            MessageKey::ReadMore => "read_more",
            MessageKey::BackToTop => "back_to_top",
            MessageKey::NotFound => "not_found",
        }
    }
}

impl FromStr for MessageKey {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MessageKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or(())
    }
}

impl fmt::Display for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type Table = HashMap<MessageKey, String>;

/// Translation lookup for the configured locale
#[derive(Debug, Clone)]
pub struct Translator {
    /// Current locale
    locale: String,
    /// Locale -> key -> template
    tables: HashMap<String, Table>,
}

impl Translator {
    /// Create a translator with the built-in tables
    pub fn new(locale: &str) -> Self {
        let mut tables = HashMap::new();
        tables.insert("en-us".to_string(), builtin_table(EN_US));
        tables.insert("zh-cn".to_string(), builtin_table(ZH_CN));
        Self {
            locale: locale.to_string(),
            tables,
        }
    }

    /// Load `<locale>.yml` files from a directory, overriding built-in entries
    pub fn load_languages<P: AsRef<Path>>(&mut self, dir: P) -> Result<(), I18nError> {
        let dir = dir.as_ref();
        if !dir.exists() {
            return Ok(());
        }

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let ext = path.extension().and_then(|e| e.to_str());
            if !path.is_file() || !matches!(ext, Some("yml") | Some("yaml")) {
                continue;
            }

            let locale = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("en-us")
                .to_lowercase();

            let content = fs::read_to_string(&path)?;
            let raw: HashMap<String, String> =
                serde_yaml::from_str(&content).map_err(|e| I18nError::InvalidFile {
                    path: path.clone(),
                    message: e.to_string(),
                })?;

            let table = self.tables.entry(locale).or_default();
            for (key, template) in raw {
                let key = key.parse::<MessageKey>().map_err(|_| I18nError::UnknownKey {
                    path: path.clone(),
                    key: key.clone(),
                })?;
                table.insert(key, template);
            }
            tracing::debug!("Loaded language file: {:?}", path);
        }

        Ok(())
    }

    /// Get the current locale
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Translate a key given as a string.
    ///
    /// Unknown locales, unknown keys and empty templates all return `key`
    /// itself. When `param` is given, the first `%d` in the template is
    /// replaced with it.
    pub fn translate(&self, key: &str, param: Option<&dyn fmt::Display>) -> String {
        match key.parse::<MessageKey>() {
            Ok(message) => self
                .lookup(message)
                .map(|template| substitute(template, param))
                .unwrap_or_else(|| key.to_string()),
            Err(_) => key.to_string(),
        }
    }

    /// Translate a typed key
    pub fn get(&self, key: MessageKey, param: Option<&dyn fmt::Display>) -> String {
        self.translate(key.as_str(), param)
    }

    fn lookup(&self, key: MessageKey) -> Option<&str> {
        self.tables
            .get(&self.locale.to_lowercase())
            .and_then(|table| table.get(&key))
            .map(String::as_str)
            .filter(|template| !template.is_empty())
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::new("en-us")
    }
}

fn substitute(template: &str, param: Option<&dyn fmt::Display>) -> String {
    match param {
        Some(value) => template.replacen(PLACEHOLDER, &value.to_string(), 1),
        None => template.to_string(),
    }
}

fn builtin_table(entries: &[(MessageKey, &str)]) -> Table {
    entries
        .iter()
        .map(|(key, template)| (*key, template.to_string()))
        .collect()
}

const EN_US: &[(MessageKey, &str)] = &[
    (MessageKey::Posts, "Posts"),
    (MessageKey::Essays, "Essays"),
    (MessageKey::Gallery, "Gallery"),
    (MessageKey::Categories, "Categories"),
    (MessageKey::Archive, "Archive"),
    (MessageKey::PreviousPage, "Previous"),
    (MessageKey::NextPage, "Next"),
    (MessageKey::PageIndicator, "Page %d"),
    (MessageKey::PostCount, "%d posts"),
    (MessageKey::ReadMore, "Read more"),
    (MessageKey::BackToTop, "Back to top"),
    (MessageKey::NotFound, "Page not found"),
];

const ZH_CN: &[(MessageKey, &str)] = &[
    (MessageKey::Posts, "文章"),
    (MessageKey::Essays, "随笔"),
    (MessageKey::Gallery, "相册"),
    (MessageKey::Categories, "分类"),
    (MessageKey::Archive, "归档"),
    (MessageKey::PreviousPage, "上一页"),
    (MessageKey::NextPage, "下一页"),
    (MessageKey::PageIndicator, "第 %d 页"),
    (MessageKey::PostCount, "共 %d 篇文章"),
    (MessageKey::ReadMore, "阅读全文"),
    (MessageKey::BackToTop, "回到顶部"),
    (MessageKey::NotFound, "页面不存在"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_builtin_tables_cover_every_key() {
        let en = Translator::new("en-us");
        let zh = Translator::new("zh-cn");
        for key in MessageKey::ALL {
            assert_ne!(en.get(key, None), key.as_str(), "en-us missing {}", key);
            assert_ne!(zh.get(key, None), key.as_str(), "zh-cn missing {}", key);
        }
    }

    #[test]
    fn test_translate_unknown_key_returns_key() {
        let i18n = Translator::new("en-us");
        assert_eq!(i18n.translate("hello", None), "hello");
    }

    #[test]
    fn test_translate_unknown_locale_returns_key() {
        let i18n = Translator::new("fr-fr");
        assert_eq!(i18n.translate("posts", None), "posts");
    }

    #[test]
    fn test_translate_with_param() {
        let i18n = Translator::new("en-us");
        assert_eq!(i18n.translate("page_indicator", Some(&3)), "Page 3");
        assert_eq!(i18n.get(MessageKey::PostCount, Some(&12)), "12 posts");
        assert_eq!(i18n.get(MessageKey::Posts, None), "Posts");
    }

    #[test]
    fn test_only_first_placeholder_is_replaced() {
        assert_eq!(substitute("%d of %d", Some(&1)), "1 of %d");
        assert_eq!(substitute("no placeholder", Some(&1)), "no placeholder");
    }

    #[test]
    fn test_locale_is_case_insensitive() {
        let i18n = Translator::new("zh-CN");
        assert_eq!(i18n.get(MessageKey::Essays, None), "随笔");
    }

    #[test]
    fn test_load_languages_overrides_and_empty_falls_back() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("en-us.yml"),
            "posts: Articles\nread_more: \"\"\n",
        )
        .unwrap();

        let mut i18n = Translator::new("en-us");
        i18n.load_languages(dir.path()).unwrap();
        assert_eq!(i18n.translate("posts", None), "Articles");
        assert_eq!(i18n.translate("read_more", None), "read_more");
        assert_eq!(i18n.translate("essays", None), "Essays");
    }

    #[test]
    fn test_load_languages_rejects_unknown_key() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("ja-jp.yml"), "greet: Hi %d\n").unwrap();

        let mut i18n = Translator::new("ja-jp");
        let err = i18n.load_languages(dir.path()).unwrap_err();
        assert!(matches!(err, I18nError::UnknownKey { ref key, .. } if key == "greet"));
    }
}
