//! Centralized path identity for content files.
//!
//! Every document is identified by its `raw_path`: the file's location relative
//! to the content root, directory segments joined with `/`, extension stripped.
//! This module is the single place that derives it, so scan, parse, index and
//! route enumeration all agree on what a document is called.
//!
//! ## Examples
//!
//! - `finance/2024-01-report.md` → `finance/2024-01-report`
//! - `ai/llm/prompting.md` → `ai/llm/prompting`
//! - `ai/report/index.md` → `ai/report` (index files flatten into their directory)
//! - `reading\deep-work.md` → `reading/deep-work` (separators normalized)
//!
//! The slug is always the last segment: `ai/llm/prompting` → `prompting`.

/// Stem of a file that stands for its parent directory.
const INDEX_STEM: &str = "index";

/// Derive a document's `raw_path` from its path relative to the content root.
///
/// Only the last extension is stripped (`v1.2-notes.md` → `v1.2-notes`), empty
/// segments are dropped, and a trailing `index` segment collapses into its
/// parent directory when it has one. Returns an empty string for inputs with
/// no usable segments.
pub fn derive_raw_path(relative_path: &str) -> String {
    let normalized = relative_path.replace('\\', "/");
    let mut segments: Vec<&str> = normalized
        .split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect();

    if let Some(last) = segments.pop() {
        let stem = strip_extension(last);
        if !(stem == INDEX_STEM && !segments.is_empty()) && !stem.is_empty() {
            segments.push(stem);
        }
    }

    segments.join("/")
}

/// Strip the final `.ext` from a file name. Dotfiles keep their name.
fn strip_extension(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(0) | None => file_name,
        Some(dot) => &file_name[..dot],
    }
}

/// Last segment of a `raw_path`.
pub fn slug(raw_path: &str) -> &str {
    raw_path.rsplit('/').next().unwrap_or(raw_path)
}

/// Split a `raw_path` into its non-empty segments.
pub fn segments(raw_path: &str) -> Vec<&str> {
    raw_path.split('/').filter(|s| !s.is_empty()).collect()
}
