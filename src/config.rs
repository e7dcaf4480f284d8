//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. The file lives at
//! the content root and is read once per build; stock defaults are overridden
//! by whatever keys the file sets.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [build]
//! on_invalid = "report"          # "report" = skip bad notes, "abort" = fail the build
//!
//! [routes]
//! documents = "nested"           # "nested" or "category-slug"
//! document_prefix = "posts"      # /posts/<raw path>
//! category_prefix = "category"   # /category/<key>
//!
//! [processing]
//! max_processes = 4              # Max parallel parse workers (omit for auto = CPU cores)
//!
//! [[categories]]                 # Category registry, in display order
//! key = "finance"
//! name = "Finance"
//! icon = "💰"
//! color = "emerald"
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse: override just the values you want. Tables merge
//! key by key; arrays replace. Supplying `[[categories]]` replaces the whole
//! stock registry, so list every category the site should have.
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Per-document validation policy.
    pub build: BuildConfig,
    /// Route URL layout.
    pub routes: RoutesConfig,
    /// Parallel parsing settings.
    pub processing: ProcessingConfig,
    /// The category registry.
    pub categories: Vec<CategoryConfig>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            build: BuildConfig::default(),
            routes: RoutesConfig::default(),
            processing: ProcessingConfig::default(),
            categories: stock_categories(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for category in &self.categories {
            let key = category.key.as_str();
            if key.is_empty() {
                return Err(ConfigError::Validation(
                    "categories.key must not be empty".into(),
                ));
            }
            if key.contains('/') || key.chars().any(char::is_whitespace) {
                return Err(ConfigError::Validation(format!(
                    "categories.key {key:?} must not contain '/' or whitespace"
                )));
            }
            if !seen.insert(key) {
                return Err(ConfigError::Validation(format!(
                    "categories.key {key:?} is defined more than once"
                )));
            }
        }
        for (name, prefix) in [
            ("routes.document_prefix", &self.routes.document_prefix),
            ("routes.category_prefix", &self.routes.category_prefix),
        ] {
            if prefix.is_empty() || prefix.contains('/') {
                return Err(ConfigError::Validation(format!(
                    "{name} must be a single non-empty path segment"
                )));
            }
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// What to do with documents that fail validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationPolicy {
    /// Exclude invalid documents, build the rest, report every failure.
    #[default]
    Report,
    /// Collect every failure, then fail the build.
    Abort,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    pub on_invalid: ValidationPolicy,
}

/// How a document's `raw_path` maps onto its URL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentScheme {
    /// Every segment kept: `ai/llm/prompting` → `/posts/ai/llm/prompting`.
    #[default]
    Nested,
    /// First and last segment only: `ai/llm/prompting` → `/posts/ai/prompting`.
    CategorySlug,
}

impl std::fmt::Display for DocumentScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentScheme::Nested => write!(f, "nested"),
            DocumentScheme::CategorySlug => write!(f, "category-slug"),
        }
    }
}

/// Route URL layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RoutesConfig {
    pub documents: DocumentScheme,
    /// First URL segment of every document page.
    pub document_prefix: String,
    /// First URL segment of every category page.
    pub category_prefix: String,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            documents: DocumentScheme::default(),
            document_prefix: "posts".to_string(),
            category_prefix: "category".to_string(),
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel parse workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

/// One registry entry: machine key plus display attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryConfig {
    /// Value documents put in their `category` field.
    pub key: String,
    /// Display label.
    pub name: String,
    #[serde(default)]
    pub icon: String,
    /// Color token handed to the presentation layer.
    #[serde(default)]
    pub color: String,
}

impl CategoryConfig {
    pub fn new(key: &str, name: &str, icon: &str, color: &str) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            icon: icon.to_string(),
            color: color.to_string(),
        }
    }
}

fn stock_categories() -> Vec<CategoryConfig> {
    vec![
        CategoryConfig::new("finance", "Finance", "💰", "emerald"),
        CategoryConfig::new("travel", "Travel", "✈️", "blue"),
        CategoryConfig::new("ai", "AI", "🤖", "purple"),
        CategoryConfig::new("work", "Work", "💼", "amber"),
        CategoryConfig::new("thinking", "Thinking", "🧠", "pink"),
        CategoryConfig::new("reading", "Reading", "📚", "teal"),
        CategoryConfig::new("resource", "Resource", "📦", "indigo"),
        CategoryConfig::new("life", "Life", "🌱", "lime"),
    ]
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay (including arrays) replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the site config for a content root (stock defaults when no file exists).
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    resolve_config(load_raw_config(root)?)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
pub fn stock_config_toml() -> &'static str {
    r##"# Simple Notes Configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file at the content root. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Build policy
# ---------------------------------------------------------------------------

[build]
# What happens when a note fails validation (missing title, bad date, ...):
#   "report" - leave the note out, build everything else, list every problem
#   "abort"  - list every problem, then fail the build
on_invalid = "report"

# ---------------------------------------------------------------------------
# Routes
# ---------------------------------------------------------------------------

[routes]
# How a note's path maps onto its URL:
#   "nested"        - ai/llm/prompting.md -> /posts/ai/llm/prompting
#   "category-slug" - ai/llm/prompting.md -> /posts/ai/prompting
#                     (notes directly in the content root cannot be routed,
#                      and two notes sharing directory and file name collide)
documents = "nested"

# First URL segment of note pages.
document_prefix = "posts"

# First URL segment of category pages.
category_prefix = "category"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------

[processing]
# Maximum parallel parse workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4

# ---------------------------------------------------------------------------
# Categories
# ---------------------------------------------------------------------------
# The category registry, in display order. Every key gets a category page,
# even when no note uses it. Notes with a category not listed here are still
# built and reachable by URL, but appear on no category page.
#
# Defining [[categories]] replaces this whole list.

[[categories]]
key = "finance"
name = "Finance"
icon = "💰"
color = "emerald"

[[categories]]
key = "travel"
name = "Travel"
icon = "✈️"
color = "blue"

[[categories]]
key = "ai"
name = "AI"
icon = "🤖"
color = "purple"

[[categories]]
key = "work"
name = "Work"
icon = "💼"
color = "amber"

[[categories]]
key = "thinking"
name = "Thinking"
icon = "🧠"
color = "pink"

[[categories]]
key = "reading"
name = "Reading"
icon = "📚"
color = "teal"

[[categories]]
key = "resource"
name = "Resource"
icon = "📦"
color = "indigo"

[[categories]]
key = "life"
name = "Life"
icon = "🌱"
color = "lime"
"##
}
