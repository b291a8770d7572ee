//! Line-oriented block parsing
//!
//! The renderer walks the document once, line by line, carrying an explicit
//! [`RenderState`]. Only one block context can be open at a time.

use std::sync::LazyLock;

use regex::Regex;

use super::inline::render_inline;

const UNORDERED_LIST_OPEN: &str = r#"<ul class="list-disc pl-6 space-y-1">"#;
const ORDERED_LIST_OPEN: &str = r#"<ol class="list-decimal pl-6 space-y-1">"#;
const CODE_BLOCK_OPEN: &str = r#"<pre class="overflow-auto rounded bg-gray-100 p-3 text-sm"><code>"#;
const CODE_BLOCK_CLOSE: &str = "</code></pre>";
const PARAGRAPH_OPEN: &str = r#"<p class="mt-3">"#;

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.*)$").expect("heading pattern is valid"));

static BULLET_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-*]\s+(.*)$").expect("bullet pattern is valid"));

static NUMBERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\.\s+(.*)$").expect("numbered pattern is valid"));

/// Open block context. Mutually exclusive by construction.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum BlockContext {
    #[default]
    None,
    UnorderedList,
    OrderedList,
    CodeBlock,
}

/// Classification of a single source line outside a code block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Line<'a> {
    Blank,
    Heading { level: usize, text: &'a str },
    Bullet(&'a str),
    Numbered(&'a str),
    Paragraph(&'a str),
}

impl<'a> Line<'a> {
    fn classify(line: &'a str) -> Self {
        if line.trim().is_empty() {
            return Line::Blank;
        }
        if let Some(caps) = HEADING.captures(line) {
            let (Some(hashes), Some(text)) = (caps.get(1), caps.get(2)) else {
                return Line::Paragraph(line);
            };
            return Line::Heading {
                level: hashes.as_str().len(),
                text: text.as_str(),
            };
        }
        if let Some(text) = BULLET_ITEM.captures(line).and_then(|caps| caps.get(1)) {
            return Line::Bullet(text.as_str());
        }
        if let Some(text) = NUMBERED_ITEM.captures(line).and_then(|caps| caps.get(2)) {
            return Line::Numbered(text.as_str());
        }
        Line::Paragraph(line)
    }
}

fn is_fence(line: &str) -> bool {
    line.starts_with("```")
}

/// Size step used in the heading's `text-Nxl` class.
///
/// Level 1 gets the largest step; deeper headings shrink, never below 1.
#[must_use]
pub fn heading_size_step(level: usize) -> usize {
    7usize.saturating_sub(level).max(1)
}

fn escape_and_inline(text: &str) -> String {
    render_inline(&html_escape::encode_text(text))
}

/// Transient parser state for one `render` call.
#[derive(Debug, Default)]
pub struct RenderState {
    context: BlockContext,
    code_lines: Vec<String>,
    html: String,
}

impl RenderState {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            html: String::with_capacity(capacity),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn context(&self) -> BlockContext {
        self.context
    }

    fn close_lists(&mut self) {
        match self.context {
            BlockContext::UnorderedList => self.html.push_str("</ul>"),
            BlockContext::OrderedList => self.html.push_str("</ol>"),
            BlockContext::None | BlockContext::CodeBlock => return,
        }
        self.context = BlockContext::None;
    }

    fn open_list(&mut self, kind: BlockContext) {
        if self.context == kind {
            return;
        }
        self.close_lists();
        self.html.push_str(match kind {
            BlockContext::OrderedList => ORDERED_LIST_OPEN,
            _ => UNORDERED_LIST_OPEN,
        });
        self.context = kind;
    }

    fn flush_code_block(&mut self) {
        let code = self.code_lines.join("\n");
        self.html.push_str(CODE_BLOCK_OPEN);
        self.html.push_str(&html_escape::encode_text(&code));
        self.html.push_str(CODE_BLOCK_CLOSE);
        self.code_lines.clear();
        self.context = BlockContext::None;
    }

    /// Feed one line (without its terminator).
    pub fn push_line(&mut self, raw: &str) {
        if is_fence(raw) {
            if self.context == BlockContext::CodeBlock {
                self.flush_code_block();
            } else {
                self.close_lists();
                self.code_lines.clear();
                self.context = BlockContext::CodeBlock;
            }
            return;
        }

        if self.context == BlockContext::CodeBlock {
            self.code_lines.push(raw.to_string());
            return;
        }

        match Line::classify(raw.trim_end()) {
            Line::Blank => self.close_lists(),
            Line::Heading { level, text } => {
                self.close_lists();
                self.html.push_str(&format!(
                    r#"<h{level} class="mt-4 font-semibold text-{}xl">{}</h{level}>"#,
                    heading_size_step(level),
                    escape_and_inline(text)
                ));
            }
            Line::Bullet(text) => {
                self.open_list(BlockContext::UnorderedList);
                self.html.push_str(&format!("<li>{}</li>", escape_and_inline(text)));
            }
            Line::Numbered(text) => {
                self.open_list(BlockContext::OrderedList);
                self.html.push_str(&format!("<li>{}</li>", escape_and_inline(text)));
            }
            Line::Paragraph(text) => {
                self.close_lists();
                self.html.push_str(PARAGRAPH_OPEN);
                self.html.push_str(&escape_and_inline(text));
                self.html.push_str("</p>");
            }
        }
    }

    /// Close whatever is still open and return the HTML.
    ///
    /// An unterminated fence is emitted as a complete code block.
    #[must_use]
    pub fn finish(mut self) -> String {
        if self.context == BlockContext::CodeBlock {
            self.flush_code_block();
        }
        self.close_lists();
        self.html
    }
}
