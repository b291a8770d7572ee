//! Destination hints extracted from HTML and decoded payloads
//!
//! Pure functions over response text. `scraper` documents are not `Send`, so
//! every function parses, extracts owned strings and drops the document before
//! returning to async code.

use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;

use crate::utils::points_at_domain;

static META_REFRESH: LazyLock<Selector> = LazyLock::new(|| {
    // APPROVED: constant selector
    Selector::parse("meta[http-equiv]").expect("meta selector is valid")
});

static META_OG_URL: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"meta[property="og:url"]"#).expect("og:url selector is valid")
});

static LINK_REL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("link[rel][href]").expect("link selector is valid"));

static ANCHOR_HREF: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("anchor selector is valid"));

static REFRESH_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)url\s*=\s*['"]?([^'";>]+)"#).expect("refresh url pattern is valid")
});

static NOT_FOUND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)404|not\s+found|page\s+not\s+found").expect("not-found pattern is valid")
});

// Stops at whitespace, quotes, angle brackets, closing parens, control bytes
// and anything non-ASCII (lossy-decoded binary shows up as U+FFFD).
static EMBEDDED_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)https?://[^\s"'<>)\x00-\x1f\x7f-\x{10FFFF}]+"#)
        .expect("embedded url pattern is valid")
});

/// Target of a `<meta http-equiv="refresh" content="0; url=...">` tag
#[must_use]
pub fn meta_refresh_target(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    document
        .select(&META_REFRESH)
        .filter(|meta| {
            meta.value()
                .attr("http-equiv")
                .is_some_and(|value| value.trim().eq_ignore_ascii_case("refresh"))
        })
        .filter_map(|meta| meta.value().attr("content"))
        .find_map(|content| {
            REFRESH_URL
                .captures(content)
                .and_then(|caps| caps.get(1))
                .map(|target| target.as_str().trim().to_string())
                .filter(|target| !target.is_empty())
        })
}

/// Every anchor `href`, in document order
#[must_use]
pub fn anchor_hrefs(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    document
        .select(&ANCHOR_HREF)
        .filter_map(|anchor| anchor.value().attr("href"))
        .map(|href| href.trim().to_string())
        .filter(|href| !href.is_empty())
        .collect()
}

/// First absolute http(s) anchor that does not point at `excluded_domain`
#[must_use]
pub fn first_external_anchor(html: &str, excluded_domain: &str) -> Option<String> {
    anchor_hrefs(html).into_iter().find(|href| {
        crate::utils::is_http_url(href) && !points_at_domain(href, excluded_domain)
    })
}

/// `href` of `<link rel="canonical">`
#[must_use]
pub fn canonical_link(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    document
        .select(&LINK_REL)
        .filter(|link| {
            link.value().attr("rel").is_some_and(|rel| {
                rel.split_ascii_whitespace()
                    .any(|token| token.eq_ignore_ascii_case("canonical"))
            })
        })
        .filter_map(|link| link.value().attr("href"))
        .map(|href| href.trim().to_string())
        .find(|href| !href.is_empty())
}

/// `content` of `<meta property="og:url">`
#[must_use]
pub fn og_url(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    document
        .select(&META_OG_URL)
        .filter_map(|meta| meta.value().attr("content"))
        .map(|content| content.trim().to_string())
        .find(|content| !content.is_empty())
}

/// Canonical link if present, otherwise `og:url`
#[must_use]
pub fn canonical_hint(html: &str) -> Option<String> {
    canonical_link(html).or_else(|| og_url(html))
}

/// Heuristic for soft-404 pages that answer 200
#[must_use]
pub fn looks_not_found(html: &str) -> bool {
    NOT_FOUND.is_match(html)
}

/// First absolute http(s) URL in `text` that does not point at `excluded_domain`
#[must_use]
pub fn find_embedded_url(text: &str, excluded_domain: &str) -> Option<String> {
    EMBEDDED_URL
        .find_iter(text)
        .map(|found| found.as_str())
        .find(|candidate| !points_at_domain(candidate, excluded_domain))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_meta_refresh_target() {
        let html = r#"<html><head><meta http-equiv="Refresh" content="0; URL='https://pub.example.com/a'"></head></html>"#;
        assert_eq!(
            meta_refresh_target(html).as_deref(),
            Some("https://pub.example.com/a")
        );
    }

    #[test]
    fn skips_anchors_on_excluded_domain() {
        let html = r#"<a href="/help">help</a>
            <a href="https://vertexaisearch.cloud.google.com/x">self</a>
            <a href="https://pub.example.com/recipe">go</a>"#;
        assert_eq!(
            first_external_anchor(html, "vertexaisearch.cloud.google.com").as_deref(),
            Some("https://pub.example.com/recipe")
        );
    }

    #[test]
    fn canonical_preferred_over_og_url() {
        let html = r#"<head>
            <meta property="og:url" content="https://example.com/og">
            <link rel="canonical" href="https://example.com/canonical">
        </head>"#;
        assert_eq!(canonical_hint(html).as_deref(), Some("https://example.com/canonical"));
        let og_only = r#"<head><meta property="og:url" content="/og"></head>"#;
        assert_eq!(canonical_hint(og_only).as_deref(), Some("/og"));
    }

    #[test]
    fn rel_with_several_tokens_still_counts_as_canonical() {
        let html = r#"<link rel="alternate canonical" href="https://example.com/c">"#;
        assert_eq!(canonical_link(html).as_deref(), Some("https://example.com/c"));
    }

    #[test]
    fn detects_soft_not_found_pages() {
        assert!(looks_not_found("<h1>Page Not   Found</h1>"));
        assert!(looks_not_found("Error 404"));
        assert!(!looks_not_found("<h1>Chicken soup</h1>"));
    }

    #[test]
    fn embedded_url_stops_at_binary_noise() {
        let text = "\u{12}\u{fffd}https://vertexaisearch.cloud.google.com/x\u{0}\u{8}https://www.example.org/soup?x=1\u{fffd}\u{1a}";
        assert_eq!(
            find_embedded_url(text, "vertexaisearch.cloud.google.com").as_deref(),
            Some("https://www.example.org/soup?x=1")
        );
    }
}
