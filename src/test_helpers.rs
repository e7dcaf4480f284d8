//! Shared test utilities for the simple-notes test suite.
//!
//! Provides fixture setup, builders for content units and documents, and
//! lookup helpers that panic with the available keys on a miss.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let site = pipeline::build(tmp.path(), &SiteConfig::default(), None).unwrap();
//!
//! let note = find_document(&site.index, "ai/llm/prompting");
//! assert_eq!(note.subcategory.as_deref(), Some("llm"));
//! ```

use chrono::NaiveDate;
use std::path::Path;
use tempfile::TempDir;

use crate::document::Document;
use crate::frontmatter::ContentUnit;
use crate::index::ContentIndex;
use crate::scan::SourceFile;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Write a note at `relative` under `root`, creating parent directories.
pub fn note(root: &Path, relative: &str, text: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, text).unwrap();
}

// =========================================================================
// Builders
// =========================================================================

/// Split `text` as if it had been read from `path`. Panics on bad front matter.
pub fn unit(path: &str, text: &str) -> ContentUnit {
    ContentUnit::from_source(&SourceFile::new(path, text))
        .unwrap_or_else(|e| panic!("fixture front matter for {path} is malformed: {e}"))
}

/// A valid document with the given identity, category and `YYYY-MM-DD` date.
///
/// Everything else gets placeholder values; tests override fields directly.
pub fn doc(raw_path: &str, category: &str, date: &str) -> Document {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .unwrap_or_else(|e| panic!("bad test date {date:?}: {e}"))
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc();

    Document {
        title: format!("Title of {raw_path}"),
        date,
        source: "https://example.com".to_string(),
        category: category.to_string(),
        subcategory: None,
        tags: Vec::new(),
        status: "published".to_string(),
        author: None,
        summary: None,
        related: Vec::new(),
        raw_path: raw_path.to_string(),
        relative_path: format!("{raw_path}.md"),
        rendered_body: String::new(),
        content_hash: String::new(),
    }
}

// =========================================================================
// Lookups and extractors
// =========================================================================

/// Find a document by raw path. Panics if not found.
pub fn find_document<'a>(index: &'a ContentIndex, raw_path: &str) -> &'a Document {
    index.get(raw_path).unwrap_or_else(|| {
        let paths: Vec<&str> = index.iter().map(|d| d.raw_path.as_str()).collect();
        panic!("document '{raw_path}' not found. Available: {paths:?}")
    })
}

/// Raw paths in list order.
pub fn raw_paths<'a>(documents: &[&'a Document]) -> Vec<&'a str> {
    documents.iter().map(|d| d.raw_path.as_str()).collect()
}
