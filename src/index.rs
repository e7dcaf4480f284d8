//! The content index.
//!
//! Collects every parse result of one build into an immutable, path-keyed
//! document store. Building is the fan-in barrier of the pipeline: it needs
//! all results before it can decide whether two documents claim the same
//! `raw_path`.
//!
//! ## Build Rules
//!
//! - Results are partitioned into documents and [`ValidationError`]s.
//! - A `raw_path` shared by two or more documents is fatal
//!   ([`BuildError::DuplicatePath`]); nothing is ever silently overwritten.
//! - Validation errors follow the configured [`ValidationPolicy`]: reported
//!   next to the built index, or collected into [`BuildError::Invalid`].
//!
//! Once built, the index has no mutation API. Documents keep their insertion
//! order, which is the stable fallback order for every reader.

use crate::config::{DocumentScheme, ValidationPolicy};
use crate::document::{Document, ValidationError, ValidationReport};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Structural failures that make the route manifest wrong or ambiguous.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("{0}")]
    Invalid(ValidationReport),
    #[error("Duplicate document path {path:?} from {}", .sources.join(", "))]
    DuplicatePath {
        path: String,
        /// Positions of the conflicting documents among the valid documents.
        indices: Vec<usize>,
        /// Source files of the conflicting documents.
        sources: Vec<String>,
    },
    #[error("Route collision at {url}: {}", .routes.join(", "))]
    RouteCollision { url: String, routes: Vec<String> },
    #[error("Document {path:?} cannot be routed with the {scheme} scheme")]
    UnroutablePath {
        path: String,
        scheme: DocumentScheme,
    },
}

/// A built index plus the validation failures that were left out of it.
#[derive(Debug)]
pub struct BuildOutcome {
    pub index: ContentIndex,
    pub diagnostics: Vec<ValidationError>,
}

/// Immutable store of one build's documents.
#[derive(Debug, Clone, Default)]
pub struct ContentIndex {
    documents: Vec<Document>,
    by_path: HashMap<String, usize>,
}

impl ContentIndex {
    /// Build the index from every parse result of a build.
    pub fn build(
        results: Vec<Result<Document, ValidationError>>,
        policy: ValidationPolicy,
    ) -> Result<BuildOutcome, BuildError> {
        let mut documents = Vec::new();
        let mut diagnostics = Vec::new();
        for result in results {
            match result {
                Ok(document) => documents.push(document),
                Err(error) => diagnostics.push(error),
            }
        }

        let index = Self::from_documents(documents)?;

        if policy == ValidationPolicy::Abort && !diagnostics.is_empty() {
            return Err(BuildError::Invalid(ValidationReport(diagnostics)));
        }

        Ok(BuildOutcome { index, diagnostics })
    }

    /// Build the index from already-validated documents.
    pub fn from_documents(documents: Vec<Document>) -> Result<Self, BuildError> {
        let mut buckets: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for (i, document) in documents.iter().enumerate() {
            buckets.entry(&document.raw_path).or_default().push(i);
        }

        if let Some((path, indices)) = buckets.iter().find(|(_, ids)| ids.len() > 1) {
            return Err(BuildError::DuplicatePath {
                path: path.to_string(),
                indices: indices.clone(),
                sources: indices
                    .iter()
                    .map(|&i| documents[i].relative_path.clone())
                    .collect(),
            });
        }

        let by_path = buckets
            .into_iter()
            .map(|(path, ids)| (path.to_string(), ids[0]))
            .collect();

        Ok(Self { documents, by_path })
    }

    /// Exact lookup by `raw_path`.
    pub fn get(&self, raw_path: &str) -> Option<&Document> {
        self.by_path.get(raw_path).map(|&i| &self.documents[i])
    }

    pub fn contains(&self, raw_path: &str) -> bool {
        self.by_path.contains_key(raw_path)
    }

    /// All documents in insertion order.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Document> {
        self.documents.iter()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl<'a> IntoIterator for &'a ContentIndex {
    type Item = &'a Document;
    type IntoIter = std::slice::Iter<'a, Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ValidationReason;
    use crate::test_helpers::doc;

    fn missing_date(file: &str) -> ValidationError {
        ValidationError::new(file, "date", ValidationReason::Missing)
    }

    #[test]
    fn builds_from_valid_documents() {
        let index = ContentIndex::from_documents(vec![
            doc("ai/a", "ai", "2024-01-01"),
            doc("finance/b", "finance", "2024-01-02"),
        ])
        .unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(index.get("ai/a").unwrap().category, "ai");
        assert!(index.contains("finance/b"));
        assert!(index.get("ai").is_none());
        assert!(index.get("missing").is_none());
    }

    #[test]
    fn insertion_order_is_kept() {
        let index = ContentIndex::from_documents(vec![
            doc("z/last", "ai", "2024-01-01"),
            doc("a/first", "ai", "2024-01-01"),
        ])
        .unwrap();
        let paths: Vec<&str> = index.iter().map(|d| d.raw_path.as_str()).collect();
        assert_eq!(paths, vec!["z/last", "a/first"]);
    }

    #[test]
    fn duplicate_path_is_fatal() {
        let mut first = doc("ai/report", "ai", "2024-01-01");
        first.relative_path = "ai/report.md".to_string();
        let mut second = doc("ai/report", "ai", "2024-02-01");
        second.relative_path = "ai/report/index.md".to_string();

        let err = ContentIndex::from_documents(vec![
            first,
            doc("ai/other", "ai", "2024-01-01"),
            second,
        ])
        .unwrap_err();

        assert_eq!(
            err,
            BuildError::DuplicatePath {
                path: "ai/report".to_string(),
                indices: vec![0, 2],
                sources: vec!["ai/report.md".to_string(), "ai/report/index.md".to_string()],
            }
        );
        assert!(err.to_string().contains("ai/report.md, ai/report/index.md"));
    }

    #[test]
    fn smallest_duplicate_path_is_reported() {
        let err = ContentIndex::from_documents(vec![
            doc("z/dup", "ai", "2024-01-01"),
            doc("z/dup", "ai", "2024-01-01"),
            doc("a/dup", "ai", "2024-01-01"),
            doc("a/dup", "ai", "2024-01-01"),
        ])
        .unwrap_err();
        assert!(matches!(err, BuildError::DuplicatePath { path, .. } if path == "a/dup"));
    }

    #[test]
    fn report_policy_keeps_valid_remainder() {
        let outcome = ContentIndex::build(
            vec![
                Ok(doc("ai/a", "ai", "2024-01-01")),
                Err(missing_date("ai/b.md")),
                Ok(doc("ai/c", "ai", "2024-01-01")),
            ],
            ValidationPolicy::Report,
        )
        .unwrap();

        assert_eq!(outcome.index.len(), 2);
        assert_eq!(outcome.diagnostics, vec![missing_date("ai/b.md")]);
        assert!(outcome.index.get("ai/b").is_none());
    }

    #[test]
    fn report_policy_without_errors() {
        let outcome = ContentIndex::build(
            vec![Ok(doc("ai/a", "ai", "2024-01-01"))],
            ValidationPolicy::Report,
        )
        .unwrap();
        assert!(outcome.diagnostics.is_empty());
    }

    #[test]
    fn abort_policy_collects_every_error() {
        let err = ContentIndex::build(
            vec![
                Err(missing_date("ai/a.md")),
                Ok(doc("ai/b", "ai", "2024-01-01")),
                Err(missing_date("ai/c.md")),
            ],
            ValidationPolicy::Abort,
        )
        .unwrap_err();

        match err {
            BuildError::Invalid(report) => {
                assert_eq!(report.0, vec![missing_date("ai/a.md"), missing_date("ai/c.md")]);
            }
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn abort_policy_succeeds_when_all_valid() {
        let outcome = ContentIndex::build(
            vec![Ok(doc("ai/a", "ai", "2024-01-01"))],
            ValidationPolicy::Abort,
        )
        .unwrap();
        assert_eq!(outcome.index.len(), 1);
    }

    #[test]
    fn duplicates_win_over_abort_policy() {
        let err = ContentIndex::build(
            vec![
                Ok(doc("ai/a", "ai", "2024-01-01")),
                Ok(doc("ai/a", "ai", "2024-01-01")),
                Err(missing_date("ai/b.md")),
            ],
            ValidationPolicy::Abort,
        )
        .unwrap_err();
        assert!(matches!(err, BuildError::DuplicatePath { .. }));
    }

    #[test]
    fn empty_build() {
        let outcome = ContentIndex::build(Vec::new(), ValidationPolicy::Report).unwrap();
        assert!(outcome.index.is_empty());
        assert!(outcome.diagnostics.is_empty());
    }

    #[test]
    fn index_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ContentIndex>();
    }
}
