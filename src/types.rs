//! JSON manifests handed to the site-building collaborator.
//!
//! `build` writes two files to the output directory:
//!
//! ```text
//! dist/
//! ├── manifest.json    # IndexManifest: documents, category counts, diagnostics
//! └── routes.json      # RouteManifest: every static page, in enumeration order
//! ```
//!
//! Both are derived from one [`SiteBuild`] and contain nothing that varies
//! between builds of the same content, so they can be diffed directly.

use crate::category::CategoryRegistry;
use crate::config::RoutesConfig;
use crate::document::{Document, ValidationError};
use crate::index::ContentIndex;
use crate::pipeline::SiteBuild;
use crate::query;
use crate::routes::{RouteSpec, RouteTable};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexManifest {
    /// Newest first.
    pub documents: Vec<DocumentEntry>,
    /// Registry order, including empty categories.
    pub categories: Vec<CategoryEntry>,
    /// Documents whose category is outside the registry, by raw value.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub unrecognized: BTreeMap<String, usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<DiagnosticEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentEntry {
    pub raw_path: String,
    pub slug: String,
    pub url: String,
    pub title: String,
    pub date: DateTime<Utc>,
    pub source: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related: Vec<String>,
    pub source_path: String,
    pub content_hash: String,
    pub html: String,
}

impl DocumentEntry {
    fn new(document: &Document, routes: &RoutesConfig) -> Self {
        Self {
            raw_path: document.raw_path.clone(),
            slug: document.slug().to_string(),
            url: routes.document_url(&document.raw_path).unwrap_or_default(),
            title: document.title.clone(),
            date: document.date,
            source: document.source.clone(),
            category: document.category.clone(),
            subcategory: document.subcategory.clone(),
            tags: document.tags.clone(),
            status: document.status.clone(),
            author: document.author.clone(),
            summary: document.summary.clone(),
            related: document.related.clone(),
            source_path: document.relative_path.clone(),
            content_hash: document.content_hash.clone(),
            html: document.rendered_body.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryEntry {
    pub key: String,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub url: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticEntry {
    pub file: String,
    pub field: String,
    pub reason: String,
}

impl From<&ValidationError> for DiagnosticEntry {
    fn from(error: &ValidationError) -> Self {
        Self {
            file: error.file.clone(),
            field: error.field.clone(),
            reason: error.reason.to_string(),
        }
    }
}

impl IndexManifest {
    pub fn new(
        index: &ContentIndex,
        registry: &CategoryRegistry,
        diagnostics: &[ValidationError],
        routes: &RoutesConfig,
    ) -> Self {
        let counts = query::count_by_category(index, registry);
        let categories = registry
            .all()
            .iter()
            .map(|category| CategoryEntry {
                key: category.key.clone(),
                name: category.name.clone(),
                icon: category.icon.clone(),
                color: category.color.clone(),
                url: routes.category_url(&category.key),
                count: counts.get(&category.key),
            })
            .collect();

        Self {
            documents: query::sorted_by_date(index)
                .into_iter()
                .map(|d| DocumentEntry::new(d, routes))
                .collect(),
            categories,
            unrecognized: counts.unrecognized,
            diagnostics: diagnostics.iter().map(DiagnosticEntry::from).collect(),
        }
    }

    pub fn from_build(site: &SiteBuild, routes: &RoutesConfig) -> Self {
        Self::new(&site.index, &site.registry, &site.diagnostics, routes)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteManifest {
    pub routes: Vec<RouteEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntry {
    pub url: String,
    #[serde(flatten)]
    pub route: RouteSpec,
}

impl RouteManifest {
    pub fn from_table(table: &RouteTable) -> Self {
        Self {
            routes: table
                .entries()
                .map(|(route, url)| RouteEntry {
                    url: url.to_string(),
                    route: route.clone(),
                })
                .collect(),
        }
    }
}
