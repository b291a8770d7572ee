//! Trusted "Sources" lists built from grounding metadata
//!
//! URLs written by the generator may be invented; the grounding metadata lists
//! the pages that were actually retrieved. This module turns that metadata into
//! a short, deduplicated list of direct publisher links.

pub mod types;

pub use types::{GroundedSource, GroundingChunk, GroundingMetadata, GroundingSupport, WebChunk};

use crate::canonicalize::normalize_url;
use crate::resolver::LinkResolver;
use crate::utils::is_http_url;

/// Heading placed above the list by [`append_sources_section`]
pub const SOURCES_HEADING: &str = "### Sources";

/// Normalize, drop non-http(s) URLs, deduplicate by normalized URL and cap at `max`.
///
/// First-seen order is kept. A duplicate only contributes its title when the
/// first occurrence had none.
#[must_use]
pub fn select_sources(candidates: &[GroundedSource], max: usize) -> Vec<GroundedSource> {
    let mut selected: Vec<GroundedSource> = Vec::with_capacity(max.min(candidates.len()));
    for candidate in candidates {
        let url = normalize_url(&candidate.url);
        if !is_http_url(&url) {
            log::debug!("Dropping non-http source: {}", candidate.url);
            continue;
        }
        if let Some(existing) = selected.iter_mut().find(|s| s.url == url) {
            if existing.title.is_none() {
                existing.title.clone_from(&candidate.title);
            }
            continue;
        }
        if selected.len() == max {
            // Keep scanning: later duplicates may still fill a missing title.
            continue;
        }
        selected.push(GroundedSource::new(url, candidate.title.clone()));
    }
    selected
}

/// Build the sources list for a generated answer.
///
/// Grounding URIs are usually redirect wrappers; they are resolved concurrently
/// before selection so deduplication sees publisher URLs.
pub async fn extract_grounded_sources(
    metadata: &GroundingMetadata,
    resolver: &LinkResolver,
) -> Vec<GroundedSource> {
    let candidates = metadata.candidates();
    if candidates.is_empty() {
        return Vec::new();
    }

    let urls: Vec<&str> = candidates.iter().map(|c| c.url.as_str()).collect();
    let resolved = resolver.resolve_wrappers(&urls).await;

    let direct: Vec<GroundedSource> = candidates
        .into_iter()
        .zip(resolved)
        .map(|(candidate, url)| GroundedSource::new(url, candidate.title))
        .collect();

    let selected = select_sources(&direct, resolver.config().max_sources());
    log::info!(
        "Selected {} grounded sources from {} chunks",
        selected.len(),
        metadata.grounding_chunks.len()
    );
    selected
}

/// One Markdown bullet per source: `- [title](url)` or `- url`
#[must_use]
pub fn format_sources_markdown(sources: &[GroundedSource]) -> String {
    sources
        .iter()
        .map(|source| match &source.title {
            Some(title) => format!("- [{}]({})", escape_link_text(title), source.url),
            None => format!("- {}", source.url),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Append a sources section to `text`; returns `text` unchanged when `sources` is empty.
#[must_use]
pub fn append_sources_section(text: &str, sources: &[GroundedSource]) -> String {
    if sources.is_empty() {
        return text.to_string();
    }
    let body = text.trim_end();
    let list = format_sources_markdown(sources);
    if body.is_empty() {
        format!("{SOURCES_HEADING}\n{list}\n")
    } else {
        format!("{body}\n\n{SOURCES_HEADING}\n{list}\n")
    }
}

// Square brackets in a title would end the link label early.
fn escape_link_text(title: &str) -> String {
    title.replace('[', "(").replace(']', ")")
}
