//! Link rewriting for generated text
//!
//! Rewrites every URL in a Markdown text to its direct publisher form in three
//! passes:
//! 1. pure normalization of link targets and bare URLs
//! 2. resolution of grounding redirect URLs (concurrent)
//! 3. verification of the first few distinct URLs (concurrent, optional)
//!
//! Substitution replaces whole URL tokens only, so a URL that is a prefix of a
//! longer one is never rewritten inside it.

use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::canonicalize::normalize_url;
use crate::resolver::LinkResolver;

static MARKDOWN_LINK: LazyLock<Regex> = LazyLock::new(|| {
    // APPROVED: constant pattern
    Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("markdown link pattern is valid")
});

static URL_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[^\s)\]]+").expect("url token pattern is valid"));

/// Counts of URLs changed by each pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteStats {
    /// URL occurrences changed by pure normalization
    pub normalized: usize,
    /// Distinct wrapper URLs replaced by a publisher URL
    pub wrappers_resolved: usize,
    /// Distinct URLs replaced after destination verification
    pub destinations_improved: usize,
    /// Set when cancellation cut the pipeline short
    pub cancelled: bool,
}

/// Rewrite every link in `text` to its direct destination.
///
/// Never fails. Unresolvable URLs stay as they are; if the resolver's cancel
/// signal fires, the text is returned as of the last completed pass.
pub async fn rewrite_links_to_direct(text: &str, resolver: &LinkResolver) -> String {
    rewrite_links_with_stats(text, resolver).await.0
}

/// [`rewrite_links_to_direct`], also reporting what each pass changed.
pub async fn rewrite_links_with_stats(
    text: &str,
    resolver: &LinkResolver,
) -> (String, RewriteStats) {
    let mut stats = RewriteStats::default();
    if text.is_empty() {
        return (String::new(), stats);
    }

    let (mut out, normalized) = normalize_links(text);
    stats.normalized = normalized;

    if resolver.is_cancelled() {
        log::debug!("Link rewrite cancelled before wrapper resolution");
        stats.cancelled = true;
        return (out, stats);
    }

    let wrappers: Vec<String> = distinct_urls(&out)
        .into_iter()
        .filter(|url| resolver.is_wrapper_url(url))
        .collect();
    if !wrappers.is_empty() {
        let total = wrappers.len();
        let resolved = resolver.resolve_wrappers(&wrappers).await;
        let replacements = changed_pairs(wrappers, resolved);
        stats.wrappers_resolved = replacements.len();
        out = substitute_urls(&out, &replacements);
        log::debug!(
            "Resolved {}/{} grounding redirect URLs",
            stats.wrappers_resolved,
            total
        );
    }

    if !resolver.config().verify_destinations() {
        return (out, stats);
    }
    if resolver.is_cancelled() {
        log::debug!("Link rewrite cancelled before destination verification");
        stats.cancelled = true;
        return (out, stats);
    }

    let mut candidates = distinct_urls(&out);
    candidates.truncate(resolver.config().max_verified_urls());
    if !candidates.is_empty() {
        let verified = resolver.verify_all(&candidates).await;
        let replacements = changed_pairs(candidates, verified);
        stats.destinations_improved = replacements.len();
        out = substitute_urls(&out, &replacements);
    }

    stats.cancelled = resolver.is_cancelled();
    log::info!(
        "Link rewrite finished: {} normalized, {} wrappers resolved, {} destinations improved",
        stats.normalized,
        stats.wrappers_resolved,
        stats.destinations_improved
    );
    (out, stats)
}

/// Normalize Markdown link targets, then bare URLs. Returns the count of changed occurrences.
fn normalize_links(text: &str) -> (String, usize) {
    let mut changed = 0;

    let linked = MARKDOWN_LINK.replace_all(text, |caps: &Captures| {
        let target = &caps[2];
        let normalized = normalize_url(target);
        if normalized != target {
            changed += 1;
        }
        format!("[{}]({normalized})", &caps[1])
    });

    let bare = URL_TOKEN.replace_all(&linked, |caps: &Captures| {
        let url = &caps[0];
        let normalized = normalize_url(url);
        if normalized != url {
            changed += 1;
        }
        normalized
    });

    (bare.into_owned(), changed)
}

/// URL tokens in order of first appearance, without duplicates
fn distinct_urls(text: &str) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for found in URL_TOKEN.find_iter(text) {
        let url = found.as_str();
        if !seen.iter().any(|existing| existing == url) {
            seen.push(url.to_string());
        }
    }
    seen
}

fn changed_pairs(originals: Vec<String>, results: Vec<String>) -> HashMap<String, String> {
    originals
        .into_iter()
        .zip(results)
        .filter(|(from, to)| !to.is_empty() && from != to)
        .collect()
}

/// Replace every URL token that has an entry in `replacements`
fn substitute_urls(text: &str, replacements: &HashMap<String, String>) -> String {
    if replacements.is_empty() {
        return text.to_string();
    }
    URL_TOKEN
        .replace_all(text, |caps: &Captures| {
            let url = &caps[0];
            replacements
                .get(url)
                .cloned()
                .unwrap_or_else(|| url.to_string())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_link_targets_and_bare_urls() {
        let text = "See [soup](https://a.example/s?utm_source=x) or https://b.example/?fbclid=1&k=v.";
        let (out, changed) = normalize_links(text);
        assert_eq!(
            out,
            "See [soup](https://a.example/s) or https://b.example/?k=v."
        );
        assert_eq!(changed, 2);
    }

    #[test]
    fn substitution_only_touches_whole_tokens() {
        let mut replacements = HashMap::new();
        replacements.insert(
            "https://a.example/x".to_string(),
            "https://direct.example/".to_string(),
        );
        let text = "https://a.example/x and https://a.example/x/longer";
        assert_eq!(
            substitute_urls(text, &replacements),
            "https://direct.example/ and https://a.example/x/longer"
        );
    }

    #[test]
    fn distinct_urls_keep_first_seen_order() {
        let text = "https://b.example/ https://a.example/ (https://b.example/)";
        assert_eq!(
            distinct_urls(text),
            vec!["https://b.example/".to_string(), "https://a.example/".to_string()]
        );
    }
}
