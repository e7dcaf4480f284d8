//! Read-only queries over a built [`ContentIndex`].
//!
//! Every function here is a pure function of its inputs and returns borrowed
//! documents, so any number of readers can run them against one shared index.

use crate::category::{Category, CategoryMatch, CategoryRegistry};
use crate::document::Document;
use crate::index::ContentIndex;
use std::collections::BTreeMap;

/// Documents whose `category` equals `key`, in index order.
///
/// Any key is accepted; a key no document uses yields an empty list.
pub fn by_category<'a>(index: &'a ContentIndex, key: &str) -> Vec<&'a Document> {
    index.iter().filter(|d| d.category == key).collect()
}

/// Newest first; equal dates ordered by `raw_path` ascending.
///
/// The ordering is total over distinct paths, so the output does not depend
/// on the input order and sorting a sorted list changes nothing.
pub fn sorted_by_date<'a, I>(documents: I) -> Vec<&'a Document>
where
    I: IntoIterator<Item = &'a Document>,
{
    let mut sorted: Vec<&Document> = documents.into_iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.raw_path.cmp(&b.raw_path)));
    sorted
}

/// Document counts per category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCounts {
    /// Every registry key in registry order, including those with zero documents.
    pub known: Vec<(String, usize)>,
    /// Documents whose category is outside the registry, keyed by raw value.
    pub unrecognized: BTreeMap<String, usize>,
}

impl CategoryCounts {
    /// Count for a registry key (0 for keys outside the registry).
    pub fn get(&self, key: &str) -> usize {
        self.known
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }

    /// Size of the unrecognized bucket.
    pub fn unrecognized_total(&self) -> usize {
        self.unrecognized.values().sum()
    }

    /// Sum over every bucket; equals the index size.
    pub fn total(&self) -> usize {
        self.known.iter().map(|(_, n)| n).sum::<usize>() + self.unrecognized_total()
    }
}

pub fn count_by_category(index: &ContentIndex, registry: &CategoryRegistry) -> CategoryCounts {
    let mut known: Vec<(String, usize)> = registry.keys().map(|k| (k.to_string(), 0)).collect();
    let mut unrecognized = BTreeMap::new();

    for document in index {
        match registry.classify(&document.category) {
            CategoryMatch::Known(category) => {
                if let Some(slot) = known.iter_mut().find(|(k, _)| *k == category.key) {
                    slot.1 += 1;
                }
            }
            CategoryMatch::Unknown(raw) => {
                *unrecognized.entry(raw.to_string()).or_insert(0) += 1;
            }
        }
    }

    CategoryCounts {
        known,
        unrecognized,
    }
}

/// A category page: the registry entry and its members, newest first.
#[derive(Debug, Clone)]
pub struct CategoryListing<'a> {
    pub category: &'a Category,
    pub documents: Vec<&'a Document>,
}

/// Listing for a registry key, or `None` when the key is not registered.
///
/// Documents with an unregistered category never appear on any listing,
/// even when a caller asks for their raw category value.
pub fn category_listing<'a>(
    index: &'a ContentIndex,
    registry: &'a CategoryRegistry,
    key: &str,
) -> Option<CategoryListing<'a>> {
    let category = registry.get(key)?;
    Some(CategoryListing {
        category,
        documents: sorted_by_date(by_category(index, key)),
    })
}

/// A document's `related` references, split by whether they resolve.
#[derive(Debug, Clone, Default)]
pub struct Related<'a> {
    pub found: Vec<&'a Document>,
    /// References with no matching document, in declaration order.
    pub missing: Vec<&'a str>,
}

pub fn related<'a>(index: &'a ContentIndex, document: &'a Document) -> Related<'a> {
    let mut result = Related::default();
    for reference in &document.related {
        let key = reference.trim_matches('/');
        match index.get(key) {
            Some(target) => result.found.push(target),
            None => result.missing.push(reference),
        }
    }
    result
}
