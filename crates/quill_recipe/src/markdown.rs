//! Markdown to HTML rendering with pulldown-cmark.

use pulldown_cmark::{Options, Parser, html};
use quill_interface::MarkdownRenderer;

/// CommonMark renderer with tables, strikethrough and task lists enabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl HtmlRenderer {
    fn options() -> Options {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options
    }
}

impl MarkdownRenderer for HtmlRenderer {
    fn to_html(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, Self::options());
        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, parser);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_headings_and_emphasis() {
        let html = HtmlRenderer.to_html("# Oslo\n\nA *fjord* city.");
        assert!(html.contains("<h1>Oslo</h1>"));
        assert!(html.contains("<em>fjord</em>"));
    }

    #[test]
    fn test_renders_tables() {
        let html = HtmlRenderer.to_html("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"));
    }
}
