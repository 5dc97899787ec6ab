//! Markdown rendering seam.

/// Converts markdown text to HTML.
pub trait MarkdownRenderer: Send + Sync {
    /// Render markdown to an HTML fragment.
    fn to_html(&self, markdown: &str) -> String;
}
