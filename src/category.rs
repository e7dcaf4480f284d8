//! The category registry.
//!
//! A fixed list of categories built once from [`SiteConfig`](crate::config::SiteConfig)
//! at startup and shared read-only for the rest of the process. It drives
//! category pages and decides which documents count as members of one.
//!
//! Documents whose `category` is not in the registry are never dropped:
//! [`CategoryRegistry::classify`] reports them as [`CategoryMatch::Unknown`] so
//! readers can bucket them for diagnostics instead of coercing them into a
//! default.

use crate::config::CategoryConfig;
use std::collections::HashMap;

/// Display attributes of one registered category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub key: String,
    pub name: String,
    pub icon: String,
    pub color: String,
}

impl From<&CategoryConfig> for Category {
    fn from(config: &CategoryConfig) -> Self {
        Self {
            key: config.key.clone(),
            name: config.name.clone(),
            icon: config.icon.clone(),
            color: config.color.clone(),
        }
    }
}

/// Result of checking a document's raw category value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryMatch<'a> {
    Known(&'a Category),
    Unknown(&'a str),
}

#[derive(Debug, Clone, Default)]
pub struct CategoryRegistry {
    categories: Vec<Category>,
    by_key: HashMap<String, usize>,
}

impl CategoryRegistry {
    /// Build the registry from validated config entries, keeping their order.
    ///
    /// Duplicate keys are rejected by config validation; if one slips through
    /// the first entry wins.
    pub fn new(entries: &[CategoryConfig]) -> Self {
        let mut registry = Self::default();
        for entry in entries {
            if registry.by_key.contains_key(&entry.key) {
                continue;
            }
            registry
                .by_key
                .insert(entry.key.clone(), registry.categories.len());
            registry.categories.push(Category::from(entry));
        }
        registry
    }

    pub fn is_valid(&self, key: &str) -> bool {
        self.by_key.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Category> {
        self.by_key.get(key).map(|&i| &self.categories[i])
    }

    /// All categories in configured order.
    pub fn all(&self) -> &[Category] {
        &self.categories
    }

    /// All category keys in configured order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.key.as_str())
    }

    pub fn classify<'a>(&'a self, raw: &'a str) -> CategoryMatch<'a> {
        match self.get(raw) {
            Some(category) => CategoryMatch::Known(category),
            None => CategoryMatch::Unknown(raw),
        }
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
