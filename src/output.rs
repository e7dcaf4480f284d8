//! CLI output formatting for the build pass.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. Every document leads
//! with its positional index and title; source files, dates and URLs follow
//! as indented context lines. The output reads as a content inventory while
//! still tracing each entry back to the file it came from.
//!
//! # Output Format
//!
//! ## Build progress
//!
//! ```text
//! Scanned 6 files
//!     ai/2024-03-01-agents → Agents in practice
//!     ! drafts/untitled.md: date: required field is missing
//! Indexed 5 documents (1 rejected)
//! Routes: 8 category pages, 5 document pages
//! ```
//!
//! ## Index
//!
//! ```text
//! Categories
//! 001 💰 Finance (1 note)
//!     001 Yearly budget
//!         Source: finance/2024-01-10-budget.md
//!         Date: 2024-01-10
//!
//! Unrecognized categories
//!     misc (1 note)
//!         Scratch
//!
//! Problems
//!     drafts/untitled.md: date: required field is missing
//! ```
//!
//! ## Routes
//!
//! ```text
//! 001 /category/finance → category finance
//! 009 /posts/ai/2024-03-01-agents → document ai/2024-03-01-agents
//! ```
//!
//! # Architecture
//!
//! Every view has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::category::CategoryRegistry;
use crate::document::{Document, ValidationError};
use crate::pipeline::{BuildEvent, SiteBuild};
use crate::query::{self, CategoryCounts};
use crate::routes::{RouteSpec, RouteTable};

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// Format a category header: positional index, icon, name and note count.
///
/// ```text
/// 001 💰 Finance (3 notes)
/// 002 Travel (0 notes)        // no icon configured
/// ```
fn category_header(index: usize, icon: &str, name: &str, count: usize) -> String {
    let label = if icon.is_empty() {
        name.to_string()
    } else {
        format!("{icon} {name}")
    };
    format!(
        "{} {} ({})",
        format_index(index),
        label,
        plural(count, "note")
    )
}

/// Strip HTML tags from a string (simple angle-bracket stripping).
fn strip_html_tags(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }
    result
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        None => text.to_string(),
        Some((end, _)) => format!("{}...", &text[..end]),
    }
}

/// One-line preview: the summary when present, else the start of the body.
fn preview(document: &Document) -> String {
    let text = match &document.summary {
        Some(summary) => summary.clone(),
        None => strip_html_tags(&document.rendered_body),
    };
    let first_line = text.lines().map(str::trim).find(|l| !l.is_empty());
    truncate_desc(first_line.unwrap_or(""), 60)
}

/// A document entry: header line plus indented context lines.
fn document_lines(index: usize, document: &Document, depth: usize) -> Vec<String> {
    let base = indent(depth);
    let mut lines = vec![format!("{}{} {}", base, format_index(index), document.title)];
    lines.push(format!("{}    Source: {}", base, document.relative_path));
    lines.push(format!("{}    Date: {}", base, document.display_date()));
    let preview = preview(document);
    if !preview.is_empty() {
        lines.push(format!("{}    {}", base, preview));
    }
    lines
}

// ============================================================================
// Build progress
// ============================================================================

/// Format a single build progress event as display lines.
pub fn format_build_event(event: &BuildEvent) -> Vec<String> {
    match event {
        BuildEvent::Scanned { files } => vec![format!("Scanned {}", plural(*files, "file"))],
        BuildEvent::DocumentParsed { raw_path, title } => {
            vec![format!("    {} \u{2192} {}", raw_path, title)]
        }
        BuildEvent::DocumentRejected(error) => vec![format!("    ! {}", error)],
        BuildEvent::Indexed {
            documents,
            rejected,
        } => {
            let mut line = format!("Indexed {}", plural(*documents, "document"));
            if *rejected > 0 {
                line.push_str(&format!(" ({} rejected)", rejected));
            }
            vec![line]
        }
        BuildEvent::RoutesEnumerated {
            categories,
            documents,
        } => vec![format!(
            "Routes: {}, {}",
            plural(*categories, "category page"),
            plural(*documents, "document page")
        )],
    }
}

/// List every validation failure with its file and field.
pub fn format_validation_errors(errors: &[ValidationError]) -> Vec<String> {
    if errors.is_empty() {
        return Vec::new();
    }
    let mut lines = vec![format!(
        "{} failed validation",
        plural(errors.len(), "document")
    )];
    for error in errors {
        lines.push(format!("    {}", error));
    }
    lines
}

pub fn print_validation_errors(errors: &[ValidationError]) {
    for line in format_validation_errors(errors) {
        eprintln!("{}", line);
    }
}

// ============================================================================
// Index
// ============================================================================

/// Format the built index: registered categories with their notes, notes in
/// unrecognized categories, then every validation problem.
pub fn format_index_output(site: &SiteBuild) -> Vec<String> {
    let mut lines = vec!["Categories".to_string()];

    for (i, category) in site.registry.all().iter().enumerate() {
        let members = query::sorted_by_date(query::by_category(&site.index, &category.key));
        lines.push(category_header(
            i + 1,
            &category.icon,
            &category.name,
            members.len(),
        ));
        for (j, document) in members.iter().enumerate() {
            lines.extend(document_lines(j + 1, document, 1));
        }
    }

    let counts = query::count_by_category(&site.index, &site.registry);
    if !counts.unrecognized.is_empty() {
        lines.push(String::new());
        lines.push("Unrecognized categories".to_string());
        for (raw, count) in &counts.unrecognized {
            lines.push(format!("    {} ({})", raw, plural(*count, "note")));
            for document in query::sorted_by_date(query::by_category(&site.index, raw)) {
                lines.push(format!("        {}", document.title));
            }
        }
    }

    if !site.diagnostics.is_empty() {
        lines.push(String::new());
        lines.push("Problems".to_string());
        for error in &site.diagnostics {
            lines.push(format!("    {}", error));
        }
    }

    lines
}

pub fn print_index_output(site: &SiteBuild) {
    for line in format_index_output(site) {
        println!("{}", line);
    }
}

// ============================================================================
// Stats
// ============================================================================

/// Per-category document counts, registry order first.
pub fn format_category_counts(counts: &CategoryCounts, registry: &CategoryRegistry) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, (key, count)) in counts.known.iter().enumerate() {
        let (icon, name) = registry
            .get(key)
            .map(|c| (c.icon.as_str(), c.name.as_str()))
            .unwrap_or(("", key.as_str()));
        lines.push(category_header(i + 1, icon, name, *count));
    }
    if !counts.unrecognized.is_empty() {
        lines.push(format!(
            "Unrecognized ({})",
            plural(counts.unrecognized_total(), "note")
        ));
        for (raw, count) in &counts.unrecognized {
            lines.push(format!("    {}: {}", raw, count));
        }
    }
    lines.push(format!("Total: {}", plural(counts.total(), "note")));
    lines
}

pub fn print_category_counts(counts: &CategoryCounts, registry: &CategoryRegistry) {
    for line in format_category_counts(counts, registry) {
        println!("{}", line);
    }
}

// ============================================================================
// Routes
// ============================================================================

/// Every route with its URL, in enumeration order.
pub fn format_routes(table: &RouteTable) -> Vec<String> {
    table
        .entries()
        .enumerate()
        .map(|(i, (route, url))| {
            let target = match route {
                RouteSpec::Category { key } => format!("category {key}"),
                RouteSpec::Document { raw_path } => format!("document {raw_path}"),
            };
            format!("{} {} \u{2192} {}", format_index(i + 1), url, target)
        })
        .collect()
}

pub fn print_routes(table: &RouteTable) {
    for line in format_routes(table) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CategoryConfig, RoutesConfig};
    use crate::document::ValidationReason;
    use crate::index::ContentIndex;
    use crate::test_helpers::doc;

    fn site(documents: Vec<Document>, diagnostics: Vec<ValidationError>) -> SiteBuild {
        let index = ContentIndex::from_documents(documents).unwrap();
        let registry = CategoryRegistry::new(&[
            CategoryConfig::new("finance", "Finance", "💰", "emerald"),
            CategoryConfig::new("travel", "Travel", "", "blue"),
        ]);
        let routes = RouteTable::build(&index, &registry, &RoutesConfig::default()).unwrap();
        SiteBuild {
            index,
            registry,
            routes,
            diagnostics,
        }
    }

    #[test]
    fn format_index_pads_to_three_digits() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn truncate_desc_counts_characters() {
        assert_eq!(truncate_desc("short", 10), "short");
        assert_eq!(truncate_desc("abcdef", 3), "abc...");
        // Multi-byte characters must not be split
        assert_eq!(truncate_desc("日本語のメモ", 3), "日本語...");
    }

    #[test]
    fn strip_html_tags_keeps_text() {
        assert_eq!(strip_html_tags("<p>Hello <em>there</em></p>"), "Hello there");
    }

    #[test]
    fn build_events_format() {
        assert_eq!(
            format_build_event(&BuildEvent::Scanned { files: 1 }),
            vec!["Scanned 1 file"]
        );
        assert_eq!(
            format_build_event(&BuildEvent::DocumentParsed {
                raw_path: "ai/a".into(),
                title: "A".into()
            }),
            vec!["    ai/a \u{2192} A"]
        );
        assert_eq!(
            format_build_event(&BuildEvent::DocumentRejected(ValidationError::new(
                "ai/b.md",
                "date",
                ValidationReason::Missing
            ))),
            vec!["    ! ai/b.md: date: required field is missing"]
        );
        assert_eq!(
            format_build_event(&BuildEvent::Indexed {
                documents: 5,
                rejected: 0
            }),
            vec!["Indexed 5 documents"]
        );
        assert_eq!(
            format_build_event(&BuildEvent::Indexed {
                documents: 5,
                rejected: 2
            }),
            vec!["Indexed 5 documents (2 rejected)"]
        );
        assert_eq!(
            format_build_event(&BuildEvent::RoutesEnumerated {
                categories: 8,
                documents: 1
            }),
            vec!["Routes: 8 category pages, 1 document page"]
        );
    }

    #[test]
    fn validation_errors_list_file_and_field() {
        let lines = format_validation_errors(&[
            ValidationError::new("ai/a.md", "title", ValidationReason::Empty),
            ValidationError::new(
                "ai/b.md",
                "tags",
                ValidationReason::WrongType {
                    expected: "a list of strings",
                },
            ),
        ]);
        assert_eq!(lines[0], "2 documents failed validation");
        assert_eq!(lines[1], "    ai/a.md: title: must not be empty");
        assert!(lines[2].starts_with("    ai/b.md: tags: "));
        assert!(format_validation_errors(&[]).is_empty());
    }

    #[test]
    fn index_output_groups_by_category() {
        let mut budget = doc("finance/budget", "finance", "2024-01-10");
        budget.title = "Yearly budget".into();
        budget.summary = Some("Where the money goes.".into());
        let mut scratch = doc("misc/scratch", "misc", "2024-04-01");
        scratch.title = "Scratch".into();

        let lines = format_index_output(&site(
            vec![budget, scratch],
            vec![ValidationError::new(
                "drafts/untitled.md",
                "date",
                ValidationReason::Missing,
            )],
        ));

        assert_eq!(
            lines,
            vec![
                "Categories",
                "001 💰 Finance (1 note)",
                "    001 Yearly budget",
                "        Source: finance/budget.md",
                "        Date: 2024-01-10",
                "        Where the money goes.",
                "002 Travel (0 notes)",
                "",
                "Unrecognized categories",
                "    misc (1 note)",
                "        Scratch",
                "",
                "Problems",
                "    drafts/untitled.md: date: required field is missing",
            ]
        );
    }

    #[test]
    fn preview_falls_back_to_body_text() {
        let mut document = doc("finance/a", "finance", "2024-01-01");
        document.rendered_body = "<h1>Heading</h1>\n<p>Body</p>".into();
        assert_eq!(preview(&document), "Heading");
    }

    #[test]
    fn category_counts_format() {
        let built = site(
            vec![
                doc("finance/a", "finance", "2024-01-01"),
                doc("misc/b", "misc", "2024-01-01"),
            ],
            Vec::new(),
        );
        let counts = query::count_by_category(&built.index, &built.registry);
        assert_eq!(
            format_category_counts(&counts, &built.registry),
            vec![
                "001 💰 Finance (1 note)",
                "002 Travel (0 notes)",
                "Unrecognized (1 note)",
                "    misc: 1",
                "Total: 2 notes",
            ]
        );
    }

    #[test]
    fn routes_format_in_order() {
        let built = site(vec![doc("finance/a", "finance", "2024-01-01")], Vec::new());
        assert_eq!(
            format_routes(&built.routes),
            vec![
                "001 /category/finance \u{2192} category finance",
                "002 /category/travel \u{2192} category travel",
                "003 /posts/finance/a \u{2192} document finance/a",
            ]
        );
    }
}
