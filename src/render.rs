//! Markdown body rendering.
//!
//! The parser hands each body to a [`Render`] implementation and stores the
//! result as an opaque string. Sanitization is the renderer's contract: the
//! default [`MarkdownRenderer`] runs every document through `ammonia` after
//! `pulldown-cmark`, so raw HTML in a note cannot inject scripts into the site.

use pulldown_cmark::{Options, Parser, html};

/// Body-to-HTML conversion.
///
/// `Sync` because documents are parsed in parallel with one shared renderer.
pub trait Render: Sync {
    fn render(&self, body: &str) -> String;
}

/// GitHub-flavored markdown rendered to sanitized HTML.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

impl Render for MarkdownRenderer {
    fn render(&self, body: &str) -> String {
        render_markdown(body)
    }
}

/// Render markdown to sanitized HTML.
///
/// Supports tables, footnotes, strikethrough and task lists.
pub fn render_markdown(raw: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS;

    let parser = Parser::new_ext(raw, options);
    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);
    ammonia::clean(&html_output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_paragraph() {
        assert_eq!(render_markdown("Hello, world!").trim(), "<p>Hello, world!</p>");
    }

    #[test]
    fn heading() {
        assert_eq!(render_markdown("# Title").trim(), "<h1>Title</h1>");
    }

    #[test]
    fn emphasis() {
        let result = render_markdown("**bold** and *italic*");
        assert!(result.contains("<strong>bold</strong>"));
        assert!(result.contains("<em>italic</em>"));
    }

    #[test]
    fn table() {
        let result = render_markdown("| A | B |\n|---|---|\n| 1 | 2 |");
        assert!(result.contains("<table>"));
        assert!(result.contains("<td>1</td>"));
    }

    #[test]
    fn strikethrough() {
        assert!(render_markdown("~~gone~~").contains("<del>gone</del>"));
    }

    #[test]
    fn script_tags_are_stripped() {
        let result = render_markdown("Hi <script>alert(1)</script> there");
        assert!(!result.contains("<script"));
        assert!(!result.contains("alert(1)"));
    }

    #[test]
    fn event_handlers_are_stripped() {
        let result = render_markdown("<img src=\"x.png\" onerror=\"alert(1)\">");
        assert!(!result.contains("onerror"));
    }

    #[test]
    fn links_survive_sanitization() {
        let result = render_markdown("[source](https://example.com)");
        assert!(result.contains("href=\"https://example.com\""));
    }

    #[test]
    fn empty_input() {
        assert_eq!(render_markdown(""), "");
    }

    #[test]
    fn renderer_trait_delegates() {
        assert_eq!(MarkdownRenderer.render("# T"), render_markdown("# T"));
    }
}
