//! Inline formatting: emphasis, code spans and links
//!
//! Runs on text that has already been HTML-escaped, so every tag produced here
//! is the only markup in the output. Generated fragments (code spans, anchors)
//! are parked in a [`Stash`] behind private-use placeholders while later rules
//! run, which keeps link text from being auto-linked twice and code from being
//! formatted.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::canonicalize::normalize_url;
use crate::utils::is_http_url;

const STASH_OPEN: char = '\u{E000}';
const STASH_CLOSE: char = '\u{E001}';

pub(crate) const CODE_SPAN_CLASS: &str = "px-1 py-0.5 bg-gray-100 rounded";
pub(crate) const LINK_CLASS: &str = "underline";

static BOLD_ITALIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*\*\*([^*]+?)\*\*\*").expect("bold italic pattern is valid")
});

static BOLD: LazyLock<Regex> = LazyLock::new(|| {
    // APPROVED: constant pattern
    Regex::new(r"\*\*(.+?)\*\*").expect("bold pattern is valid")
});

// Needs look-ahead so a lone `*` next to a bold marker is not treated as italic.
static ITALIC: LazyLock<fancy_regex::Regex> = LazyLock::new(|| {
    fancy_regex::Regex::new(r"(^|[^*])\*(?!\s)([^*]+?)\*(?!\*)").expect("italic pattern is valid")
});

static CODE_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`]+?)`").expect("code span pattern is valid"));

static LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("link pattern is valid")
});

// `<`, `>` and `&` only survive escaping as entities; `&amp;` may sit inside a
// query string but `&lt;` / `&gt;` end the URL.
static BARE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(^|\s)(https?://(?:[^\s<&]|&amp;)+)").expect("bare url pattern is valid")
});

static STASH_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("\u{E000}(\\d+)\u{E001}").expect("stash token pattern is valid"));

/// Rendered fragments hidden from the remaining inline rules.
#[derive(Debug, Default)]
struct Stash {
    items: Vec<String>,
}

impl Stash {
    fn put(&mut self, html: String) -> String {
        let token = format!("{STASH_OPEN}{}{STASH_CLOSE}", self.items.len());
        self.items.push(html);
        token
    }

    /// Substitute every placeholder, including placeholders nested in stashed
    /// fragments. An item can only reference items stashed before it.
    fn restore(&self, text: &str) -> String {
        STASH_TOKEN
            .replace_all(text, |caps: &Captures| {
                caps[1]
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| self.items.get(index))
                    .map(|item| self.restore(item))
                    .unwrap_or_default()
            })
            .into_owned()
    }
}

/// Build an anchor that opens in a new browsing context without `window.opener`.
pub(crate) fn anchor(href: &str, text_html: &str) -> String {
    format!(
        r#"<a href="{}" target="_blank" rel="noopener noreferrer" class="{LINK_CLASS}">{text_html}</a>"#,
        html_escape::encode_double_quoted_attribute(href)
    )
}

/// Split trailing sentence punctuation off an auto-detected URL.
fn split_trailing_punctuation(url: &str) -> (&str, &str) {
    let mut end = url.len();
    loop {
        let Some(last) = url[..end].chars().next_back() else {
            break;
        };
        let unbalanced_paren = last == ')' && !url[..end].contains('(');
        if matches!(last, '.' | ',' | ';' | ':' | '!' | '?') || unbalanced_paren {
            end -= last.len_utf8();
        } else {
            break;
        }
    }
    url.split_at(end)
}

/// Apply inline Markdown rules to an already-escaped line.
pub(crate) fn render_inline(escaped: &str) -> String {
    let mut stash = Stash::default();

    let text: Cow<'_, str> = if escaped.contains([STASH_OPEN, STASH_CLOSE]) {
        Cow::Owned(escaped.replace([STASH_OPEN, STASH_CLOSE], ""))
    } else {
        Cow::Borrowed(escaped)
    };

    let text = CODE_SPAN.replace_all(&text, |caps: &Captures| {
        stash.put(format!(r#"<code class="{CODE_SPAN_CLASS}">{}</code>"#, &caps[1]))
    });

    let text = BOLD_ITALIC.replace_all(&text, "<strong><em>${1}</em></strong>");
    let text = BOLD.replace_all(&text, "<strong>${1}</strong>");
    // On a matcher error the line keeps its asterisks.
    let text = match ITALIC.try_replacen(&text, 0, "${1}<em>${2}</em>") {
        Ok(replaced) => replaced,
        Err(_) => Cow::Borrowed(text.as_ref()),
    };

    let text = LINK.replace_all(&text, |caps: &Captures| {
        let label = &caps[1];
        let target = html_escape::decode_html_entities(caps[2].trim());
        let normalized = normalize_url(&target);
        if is_http_url(&normalized) {
            stash.put(anchor(&normalized, label))
        } else {
            label.to_string()
        }
    });

    let text = BARE_URL.replace_all(&text, |caps: &Captures| {
        let (url, trailing) = split_trailing_punctuation(&caps[2]);
        let normalized = normalize_url(&html_escape::decode_html_entities(url));
        let shown = html_escape::encode_text(&normalized).into_owned();
        format!("{}{}{trailing}", &caps[1], stash.put(anchor(&normalized, &shown)))
    });

    stash.restore(&text)
}
