//! Localized UI strings.
//!
//! A `Catalog` is a flat key -> string table. Two catalogs are built in
//! (`en` and `zh-CN`); config can override individual keys on top of
//! whichever one is selected.

use std::collections::HashMap;

use tracing::debug;

/// Lookup of a localized string by key.
pub trait Translate: Send + Sync {
    fn translate(&self, key: &str) -> String;
}

const EN: &[(&str, &str)] = &[
    ("notification.cleared", "Conversation cleared"),
    ("notification.copied", "Copied to clipboard"),
    ("notification.reset", "Session reset"),
    ("notification.deleted", "Message deleted"),
    ("notification.network-error", "Network error, please try again"),
];

const ZH_CN: &[(&str, &str)] = &[
    ("notification.cleared", "已清空"),
    ("notification.copied", "已复制"),
    ("notification.reset", "已重置"),
    ("notification.deleted", "已删除"),
    ("notification.network-error", "网络错误，请稍后重试"),
];

/// Locale tags with a built-in catalog.
pub const BUILT_IN_LOCALES: &[&str] = &["en", "zh-CN"];

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    strings: HashMap<String, String>,
}

impl Catalog {
    /// Built-in catalog for `locale`. Unknown tags fall back to `en`;
    /// a bare `zh` selects `zh-CN`.
    pub fn built_in(locale: &str) -> Self {
        let table = match locale {
            "zh" | "zh-CN" | "zh_CN" => ZH_CN,
            "en" => EN,
            other => {
                debug!(locale = %other, "no built-in catalog, using en");
                EN
            }
        };
        Self {
            strings: table
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        }
    }

    /// Replace or add entries from `overrides`.
    pub fn with_overrides<'a, I>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        for (key, value) in overrides {
            self.strings.insert(key.clone(), value.clone());
        }
        self
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl Translate for Catalog {
    /// Missing keys render as the key itself.
    fn translate(&self, key: &str) -> String {
        self.strings
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}
