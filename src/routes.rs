//! Static route enumeration.
//!
//! Derives every page the site must pre-render from a built index and the
//! category registry, and rejects any set of routes that would not map onto
//! distinct output pages.
//!
//! ## Routes
//!
//! ```text
//! /category/<key>          one per registry key, even with zero documents
//! /posts/<raw path>        one per document (nested scheme)
//! /posts/<first>/<last>    one per document (category-slug scheme)
//! ```
//!
//! Category routes come first in registry order, then document routes in
//! index order, so two builds of the same content produce identical route
//! manifests.
//!
//! ## Collisions
//!
//! Every route's URL goes into one map keyed by its lowercased form, and any
//! key claimed twice fails the build with [`BuildError::RouteCollision`].
//! Lowercasing matters because exported pages are written to filesystems that
//! may not distinguish `AI/Report` from `ai/report`. The map covers category
//! and document routes together, so a document at `/category/ai` is caught the
//! same way as two documents sharing a slug under the category-slug scheme.

use crate::category::CategoryRegistry;
use crate::config::{DocumentScheme, RoutesConfig};
use crate::document::Document;
use crate::index::{BuildError, ContentIndex};
use crate::naming;
use crate::query::{self, CategoryListing};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// One static page to generate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RouteSpec {
    Category { key: String },
    Document { raw_path: String },
}

impl RouteSpec {
    fn describe(&self) -> String {
        match self {
            RouteSpec::Category { key } => format!("category {key}"),
            RouteSpec::Document { raw_path } => format!("document {raw_path}"),
        }
    }
}

impl RoutesConfig {
    /// URL of a category page.
    pub fn category_url(&self, key: &str) -> String {
        format!("/{}/{}", self.category_prefix, key)
    }

    /// URL of a document page, or `None` when the scheme cannot express the path.
    pub fn document_url(&self, raw_path: &str) -> Option<String> {
        let segments = naming::segments(raw_path);
        let tail = match self.documents {
            DocumentScheme::Nested if !segments.is_empty() => segments.join("/"),
            DocumentScheme::CategorySlug if segments.len() >= 2 => {
                format!("{}/{}", segments[0], segments[segments.len() - 1])
            }
            _ => return None,
        };
        Some(format!("/{}/{}", self.document_prefix, tail))
    }
}

/// What a request URL resolves to.
#[derive(Debug)]
pub enum Resolved<'a> {
    Category(CategoryListing<'a>),
    Document(&'a Document),
    NotFound,
}

/// Enumerated routes with their URLs and a URL lookup.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<RouteSpec>,
    urls: Vec<String>,
    by_url: HashMap<String, usize>,
}

impl RouteTable {
    /// Enumerate and check every route for one build.
    pub fn build(
        index: &ContentIndex,
        registry: &CategoryRegistry,
        config: &RoutesConfig,
    ) -> Result<Self, BuildError> {
        let mut routes: Vec<RouteSpec> = registry
            .keys()
            .map(|key| RouteSpec::Category {
                key: key.to_string(),
            })
            .collect();
        routes.extend(index.iter().map(|document| RouteSpec::Document {
            raw_path: document.raw_path.clone(),
        }));

        let mut urls = Vec::with_capacity(routes.len());
        for route in &routes {
            let url = match route {
                RouteSpec::Category { key } => config.category_url(key),
                RouteSpec::Document { raw_path } => config.document_url(raw_path).ok_or_else(
                    || BuildError::UnroutablePath {
                        path: raw_path.clone(),
                        scheme: config.documents,
                    },
                )?,
            };
            urls.push(url);
        }

        let mut buckets: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (i, url) in urls.iter().enumerate() {
            buckets.entry(url_key(url)).or_default().push(i);
        }

        if let Some(ids) = buckets.values().find(|ids| ids.len() > 1) {
            return Err(BuildError::RouteCollision {
                url: urls[ids[0]].clone(),
                routes: ids.iter().map(|&i| routes[i].describe()).collect(),
            });
        }

        let by_url = buckets
            .into_iter()
            .map(|(key, ids)| (key, ids[0]))
            .collect();

        Ok(Self {
            routes,
            urls,
            by_url,
        })
    }

    pub fn routes(&self) -> &[RouteSpec] {
        &self.routes
    }

    /// Routes paired with their URLs, in enumeration order.
    pub fn entries(&self) -> impl Iterator<Item = (&RouteSpec, &str)> {
        self.routes
            .iter()
            .zip(self.urls.iter().map(String::as_str))
    }

    pub fn into_routes(self) -> Vec<RouteSpec> {
        self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Resolve a request URL against the built routes.
    ///
    /// Leading and trailing slashes are ignored and matching is
    /// case-insensitive, mirroring the collision check. Anything without a
    /// route, including a category page for an unregistered category, is
    /// [`Resolved::NotFound`].
    pub fn resolve<'a>(
        &self,
        index: &'a ContentIndex,
        registry: &'a CategoryRegistry,
        url: &str,
    ) -> Resolved<'a> {
        let Some(&i) = self.by_url.get(&url_key(url)) else {
            return Resolved::NotFound;
        };
        match &self.routes[i] {
            RouteSpec::Category { key } => query::category_listing(index, registry, key)
                .map(Resolved::Category)
                .unwrap_or(Resolved::NotFound),
            RouteSpec::Document { raw_path } => index
                .get(raw_path)
                .map(Resolved::Document)
                .unwrap_or(Resolved::NotFound),
        }
    }
}

/// Collision and lookup key for a URL.
fn url_key(url: &str) -> String {
    url.trim_matches('/').to_lowercase()
}

/// Every static route for the build: one per registry key, one per document.
pub fn enumerate_routes(
    index: &ContentIndex,
    registry: &CategoryRegistry,
    config: &RoutesConfig,
) -> Result<Vec<RouteSpec>, BuildError> {
    RouteTable::build(index, registry, config).map(RouteTable::into_routes)
}
