//! Front matter splitting.
//!
//! Turns a [`SourceFile`] into a [`ContentUnit`]: a metadata mapping, the body
//! text that follows it, and the tree-relative path. Only the block delimiting
//! lives here; type-checking the metadata is the parser's job.
//!
//! ```text
//! ---
//! title: Deep Work
//! date: 2024-02-01
//! tags: [focus, books]
//! ---
//! # Body starts here
//! ```
//!
//! The closing delimiter may be `---` or `...`. A leading byte-order mark is
//! tolerated. A file that does not open with `---` has no front matter and its
//! whole text is the body.

use crate::document::{ValidationError, ValidationReason};
use crate::scan::SourceFile;
use serde_json::Value;
use std::collections::BTreeMap;

/// Raw metadata as parsed from the front matter block.
pub type Metadata = BTreeMap<String, Value>;

/// One raw content unit, ready for the document parser.
#[derive(Debug, Clone)]
pub struct ContentUnit {
    pub metadata: Metadata,
    pub body: String,
    pub relative_path: String,
    pub content_hash: String,
}

impl ContentUnit {
    /// Split a source file into metadata and body.
    ///
    /// Malformed front matter is reported against the `frontmatter` field so it
    /// surfaces alongside every other per-document problem.
    pub fn from_source(file: &SourceFile) -> Result<Self, ValidationError> {
        let (metadata, body) = split(&file.text).map_err(|detail| {
            ValidationError::new(
                &file.relative_path,
                "frontmatter",
                ValidationReason::MalformedFrontMatter(detail),
            )
        })?;

        Ok(Self {
            metadata,
            body: body.to_string(),
            relative_path: file.relative_path.clone(),
            content_hash: file.content_hash.clone(),
        })
    }
}

/// Split `input` into its metadata mapping and the remaining body.
///
/// Returns an empty mapping and the full input when there is no opening
/// delimiter. Errors describe why an opened block could not be used.
pub fn split(input: &str) -> Result<(Metadata, &str), String> {
    let input = input.trim_start_matches('\u{feff}');

    let mut lines = input.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return Ok((Metadata::new(), input));
    };
    if first.trim_end() != "---" {
        return Ok((Metadata::new(), input));
    }

    let yaml_start = first.len();
    let mut offset = yaml_start;
    for line in lines {
        let trimmed = line.trim_end();
        if trimmed == "---" || trimmed == "..." {
            let yaml = &input[yaml_start..offset];
            let body = &input[offset + line.len()..];
            return Ok((parse_yaml(yaml)?, body));
        }
        offset += line.len();
    }

    Err("front matter block is never closed".to_string())
}

/// Parse a YAML block into JSON-compatible values.
///
/// An empty block is an empty mapping; anything other than a mapping is an
/// error.
fn parse_yaml(yaml: &str) -> Result<Metadata, String> {
    if yaml.trim().is_empty() {
        return Ok(Metadata::new());
    }

    let yaml_value: serde_yaml::Value = serde_yaml::from_str(yaml).map_err(|e| e.to_string())?;
    let json_value = serde_json::to_value(yaml_value).map_err(|e| e.to_string())?;

    match json_value {
        Value::Object(map) => Ok(map.into_iter().collect()),
        Value::Null => Ok(Metadata::new()),
        _ => Err("front matter must be a key/value mapping".to_string()),
    }
}
