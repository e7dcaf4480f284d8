//! Content tree scanning.
//!
//! Stage 1 of the build pass. Walks the content root and reads every content
//! file into memory so the rest of the pipeline never touches the filesystem.
//!
//! ## Directory Structure
//!
//! ```text
//! content/                         # Content root
//! ├── config.toml                  # Site configuration (optional, ignored here)
//! ├── README.md                    # Root-level files are not content
//! ├── ai/
//! │   ├── 2024-03-01-agents.md     # → ai/2024-03-01-agents
//! │   └── llm/
//! │       └── prompting.md         # → ai/llm/prompting
//! ├── reading/
//! │   └── deep-work/
//! │       └── index.md             # → reading/deep-work
//! └── .obsidian/                   # Hidden entries are skipped
//! ```
//!
//! ## Rules
//!
//! - Only markdown files (`.md`, any case) below at least one directory count.
//! - Entries whose name starts with `.` are skipped, including whole directories.
//! - Walk order is sorted by file name at every level, so two scans of the same
//!   tree yield the same sequence.

use crate::document::{ValidationError, ValidationReason};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Content root not found: {0}")]
    MissingRoot(PathBuf),
}

/// One scanned content file: its text, or why it could not be decoded.
///
/// Undecodable files are per-document failures, not scan failures, so the
/// rest of the tree still builds.
pub type ScanEntry = Result<SourceFile, ValidationError>;

/// One content file read from disk.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Path relative to the content root, `/`-separated (e.g. `ai/llm/prompting.md`).
    pub relative_path: String,
    /// Full file contents.
    pub text: String,
    /// Hex SHA-256 of the file bytes.
    pub content_hash: String,
}

impl SourceFile {
    pub fn new(relative_path: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let content_hash = hash_bytes(text.as_bytes());
        Self {
            relative_path: relative_path.into(),
            text,
            content_hash,
        }
    }
}

const CONTENT_EXTENSIONS: &[&str] = &["md"];

/// Read every content file under `root`.
///
/// Only I/O and walk failures end the scan. A file that is not valid UTF-8
/// yields an `encoding` [`ValidationError`] in its place.
pub fn scan(root: &Path) -> Result<Vec<ScanEntry>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::MissingRoot(root.to_path_buf()));
    }

    let walker = WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e));

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry?;
        // Depth 1 files live at the root (README.md and friends)
        if entry.depth() < 2 || !entry.file_type().is_file() || !is_content(entry.path()) {
            continue;
        }

        let bytes = fs::read(entry.path())?;
        let content_hash = hash_bytes(&bytes);
        let relative_path = relative_path(entry.path(), root);

        files.push(match String::from_utf8(bytes) {
            Ok(text) => Ok(SourceFile {
                relative_path,
                text,
                content_hash,
            }),
            Err(e) => Err(ValidationError::new(
                &relative_path,
                "encoding",
                ValidationReason::NotUtf8 {
                    offset: e.utf8_error().valid_up_to(),
                },
            )),
        });
    }

    Ok(files)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

fn is_content(path: &Path) -> bool {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    CONTENT_EXTENSIONS.contains(&ext.as_str())
}

/// `/`-joined path of `path` below `root`, independent of the host separator.
fn relative_path(path: &Path, root: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn hash_bytes(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::setup_fixtures;
    use tempfile::TempDir;

    fn paths(entries: &[ScanEntry]) -> Vec<&str> {
        entries
            .iter()
            .map(|entry| match entry {
                Ok(file) => file.relative_path.as_str(),
                Err(error) => error.file.as_str(),
            })
            .collect()
    }

    fn decoded(entries: Vec<ScanEntry>) -> Vec<SourceFile> {
        entries
            .into_iter()
            .map(|entry| entry.unwrap_or_else(|e| panic!("undecodable entry: {e}")))
            .collect()
    }

    #[test]
    fn scan_finds_fixture_notes() {
        let tmp = setup_fixtures();
        let files = scan(tmp.path()).unwrap();

        assert_eq!(
            paths(&files),
            vec![
                "ai/2024-03-01-agents.md",
                "ai/llm/prompting.md",
                "drafts/untitled.md",
                "finance/2024-01-10-budget.md",
                "misc/scratch.md",
                "reading/deep-work/index.md",
            ]
        );
    }

    #[test]
    fn root_level_markdown_is_ignored() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("README.md"), "# Readme").unwrap();
        fs::create_dir_all(tmp.path().join("ai")).unwrap();
        fs::write(tmp.path().join("ai/note.md"), "body").unwrap();

        let files = scan(tmp.path()).unwrap();
        assert_eq!(paths(&files), vec!["ai/note.md"]);
    }

    #[test]
    fn hidden_entries_are_skipped() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join(".obsidian")).unwrap();
        fs::write(tmp.path().join(".obsidian/workspace.md"), "x").unwrap();
        fs::create_dir_all(tmp.path().join("ai")).unwrap();
        fs::write(tmp.path().join("ai/.draft.md"), "x").unwrap();
        fs::write(tmp.path().join("ai/visible.md"), "x").unwrap();

        let files = scan(tmp.path()).unwrap();
        assert_eq!(paths(&files), vec!["ai/visible.md"]);
    }

    #[test]
    fn non_markdown_files_are_skipped() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("ai")).unwrap();
        fs::write(tmp.path().join("ai/diagram.png"), "x").unwrap();
        fs::write(tmp.path().join("ai/NOTES.MD"), "x").unwrap();

        let files = scan(tmp.path()).unwrap();
        assert_eq!(paths(&files), vec!["ai/NOTES.MD"]);
    }

    #[test]
    fn content_hash_tracks_file_bytes() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("ai")).unwrap();
        fs::write(tmp.path().join("ai/a.md"), "same").unwrap();
        fs::write(tmp.path().join("ai/b.md"), "same").unwrap();
        fs::write(tmp.path().join("ai/c.md"), "different").unwrap();

        let files = decoded(scan(tmp.path()).unwrap());
        assert_eq!(files[0].content_hash, files[1].content_hash);
        assert_ne!(files[0].content_hash, files[2].content_hash);
        assert_eq!(files[0].content_hash.len(), 64);
    }

    #[test]
    fn invalid_utf8_becomes_an_entry_error() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("ai")).unwrap();
        fs::write(tmp.path().join("ai/good.md"), "fine").unwrap();
        fs::write(tmp.path().join("ai/latin1.md"), b"caf\xe9 \xff\xfe").unwrap();

        let entries = scan(tmp.path()).unwrap();
        assert_eq!(paths(&entries), vec!["ai/good.md", "ai/latin1.md"]);
        assert!(entries[0].is_ok());
        let error = entries[1].as_ref().unwrap_err();
        assert_eq!(error.field, "encoding");
        assert_eq!(error.reason, ValidationReason::NotUtf8 { offset: 3 });
    }

    #[test]
    fn source_file_new_hashes_text() {
        let file = SourceFile::new("ai/a.md", "same");
        assert_eq!(file.content_hash, hash_bytes(b"same"));
    }

    #[test]
    fn missing_root_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = scan(&tmp.path().join("nope"));
        assert!(matches!(result, Err(ScanError::MissingRoot(_))));
    }

    #[test]
    fn empty_tree_yields_no_files() {
        let tmp = TempDir::new().unwrap();
        assert!(scan(tmp.path()).unwrap().is_empty());
    }
}
