//! Markdown-subset to HTML rendering
//!
//! Supports headings, paragraphs, unordered and ordered lists, fenced code
//! blocks, bold, italic, code spans, links and bare URLs. Input is HTML-escaped
//! before any tag is generated, and every link target goes through
//! [`normalize_url`](crate::normalize_url) and must end up http(s).
//!
//! Tables, blockquotes, footnotes and nested lists are rendered as plain
//! paragraphs.

mod block;
mod inline;

pub use block::{BlockContext, RenderState, heading_size_step};

/// Render Markdown to sanitized HTML.
///
/// Stateless between calls and infallible: unterminated code fences and lists
/// are closed at the end of input.
///
/// # Examples
///
/// ```
/// use kodegen_tools_citerender::render;
///
/// let html = render("<script>alert(1)</script>");
/// assert!(html.contains("&lt;script&gt;"));
/// assert!(!html.contains("<script>"));
/// ```
#[must_use]
pub fn render(markdown: &str) -> String {
    if markdown.is_empty() {
        return String::new();
    }

    let normalized = markdown.replace("\r\n", "\n").replace('\r', "\n");
    let mut state = RenderState::with_capacity(normalized.len() * 2);
    for line in normalized.split('\n') {
        state.push_line(line);
    }
    state.finish()
}
