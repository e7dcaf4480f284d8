//! Document parsing and validation.
//!
//! [`parse`] turns one [`ContentUnit`] into a validated [`Document`] or a
//! [`ValidationError`] naming the first offending field. It never builds a
//! partial document and has no side effects beyond calling the renderer.
//!
//! ## Metadata Schema
//!
//! | Field | Type | Required |
//! |-------|------|----------|
//! | `title` | non-empty string | yes |
//! | `date` | date or timestamp string | yes |
//! | `source` | string (external URL, not interpreted) | yes |
//! | `category` | string | yes |
//! | `status` | string (not interpreted) | yes |
//! | `subcategory`, `author`, `summary` | string | no |
//! | `tags`, `related` | list of strings | no |
//!
//! Unknown keys are ignored. A `null` value counts as absent.
//!
//! ## Dates
//!
//! Accepted forms, first match wins:
//!
//! ```text
//! 2024-03-01T09:30:00+08:00   RFC 3339
//! 2024-03-01T09:30:00         naive, read as UTC
//! 2024-03-01 09:30:00         naive, read as UTC
//! 2024-03-01                  midnight UTC
//! ```

use crate::frontmatter::{ContentUnit, Metadata};
use crate::naming;
use crate::render::Render;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Why a field failed validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationReason {
    #[error("required field is missing")]
    Missing,
    #[error("must not be empty")]
    Empty,
    #[error("expected {expected}")]
    WrongType { expected: &'static str },
    #[error("unparseable date {0:?}")]
    InvalidDate(String),
    #[error("malformed front matter: {0}")]
    MalformedFrontMatter(String),
    #[error("not valid UTF-8 (first bad byte at offset {offset})")]
    NotUtf8 { offset: usize },
}

/// A per-document failure: the file, the field, and the reason.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{file}: {field}: {reason}")]
pub struct ValidationError {
    /// Source file relative to the content root.
    pub file: String,
    pub field: String,
    pub reason: ValidationReason,
}

impl ValidationError {
    pub fn new(file: &str, field: &str, reason: ValidationReason) -> Self {
        Self {
            file: file.to_string(),
            field: field.to_string(),
            reason,
        }
    }
}

/// One validated content item.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub title: String,
    pub date: DateTime<Utc>,
    pub source: String,
    /// Raw category value. Checked against the registry by readers, never here.
    pub category: String,
    pub subcategory: Option<String>,
    pub tags: Vec<String>,
    pub status: String,
    pub author: Option<String>,
    pub summary: Option<String>,
    /// `raw_path`s of other documents. Not checked for existence.
    pub related: Vec<String>,
    /// Identity within the index, e.g. `finance/2024-01-report`.
    pub raw_path: String,
    /// Source file relative to the content root, e.g. `finance/2024-01-report.md`.
    pub relative_path: String,
    pub rendered_body: String,
    pub content_hash: String,
}

impl Document {
    /// Last segment of the `raw_path`.
    pub fn slug(&self) -> &str {
        naming::slug(&self.raw_path)
    }

    /// Date formatted as `YYYY-MM-DD`.
    pub fn display_date(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// Parse and validate one content unit.
pub fn parse(unit: &ContentUnit, renderer: &impl Render) -> Result<Document, ValidationError> {
    let fields = Fields {
        metadata: &unit.metadata,
        file: &unit.relative_path,
    };

    let raw_path = naming::derive_raw_path(&unit.relative_path);
    if raw_path.is_empty() {
        return Err(fields.error("path", ValidationReason::Empty));
    }

    let title = fields.required_string("title")?;
    if title.trim().is_empty() {
        return Err(fields.error("title", ValidationReason::Empty));
    }
    let date_value = fields.required_string("date")?;
    let date = parse_date(&date_value)
        .ok_or_else(|| fields.error("date", ValidationReason::InvalidDate(date_value)))?;
    let source = fields.required_string("source")?;
    let category = fields.required_string("category")?;
    let status = fields.required_string("status")?;

    let subcategory = fields.optional_string("subcategory")?;
    let author = fields.optional_string("author")?;
    let summary = fields.optional_string("summary")?;
    let tags = fields.string_list("tags")?;
    let related = fields.string_list("related")?;

    Ok(Document {
        title,
        date,
        source,
        category,
        subcategory,
        tags,
        status,
        author,
        summary,
        related,
        raw_path,
        relative_path: unit.relative_path.clone(),
        rendered_body: renderer.render(&unit.body),
        content_hash: unit.content_hash.clone(),
    })
}

/// Typed field access over one unit's metadata.
struct Fields<'a> {
    metadata: &'a Metadata,
    file: &'a str,
}

impl Fields<'_> {
    fn error(&self, field: &str, reason: ValidationReason) -> ValidationError {
        ValidationError::new(self.file, field, reason)
    }

    fn get(&self, field: &str) -> Option<&Value> {
        self.metadata.get(field).filter(|v| !v.is_null())
    }

    fn required_string(&self, field: &str) -> Result<String, ValidationError> {
        self.optional_string(field)?
            .ok_or_else(|| self.error(field, ValidationReason::Missing))
    }

    fn optional_string(&self, field: &str) -> Result<Option<String>, ValidationError> {
        match self.get(field) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(self.error(
                field,
                ValidationReason::WrongType { expected: "a string" },
            )),
        }
    }

    fn string_list(&self, field: &str) -> Result<Vec<String>, ValidationError> {
        let wrong_type = || {
            self.error(
                field,
                ValidationReason::WrongType {
                    expected: "a list of strings",
                },
            )
        };
        match self.get(field) {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| item.as_str().map(str::to_string).ok_or_else(wrong_type))
                .collect(),
            Some(_) => Err(wrong_type()),
        }
    }
}

fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Aggregate of every validation failure in one build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport(pub Vec<ValidationError>);

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} document(s) failed validation", self.0.len())?;
        for error in &self.0 {
            write!(f, "\n  {error}")?;
        }
        Ok(())
    }
}
