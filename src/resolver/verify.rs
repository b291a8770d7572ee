//! Destination verification
//!
//! Checks that a cited page exists and prefers the URL the publisher declares
//! for it. Pages that look dead are recovered by probing nearby slugs and, for
//! hosts with a known search endpoint, by searching the site.

use url::Url;

use super::errors::{ResolveError, ResolveResult};
use super::html_hints::{canonical_hint, canonical_link, looks_not_found};
use super::http::HttpFetcher;
use super::site_search::search_site;
use super::slug::{path_tokens, slug_candidates};
use crate::canonicalize::normalize_url;
use crate::config::ResolverConfig;
use crate::runtime::CancelSignal;
use crate::utils::is_http_url;
use crate::utils::url_utils::origin_of;

/// Verify `url` and return a better destination, or `url` unchanged.
pub(crate) async fn verify_destination(
    url: &str,
    config: &ResolverConfig,
    cancel: &CancelSignal,
) -> String {
    if !is_http_url(url) || cancel.is_cancelled() {
        return url.to_string();
    }

    match improve(url, config, cancel).await {
        Ok(Some(improved)) => {
            if improved != url {
                tracing::debug!(url = %url, improved = %improved, "Destination improved");
            }
            improved
        }
        Ok(None) => url.to_string(),
        Err(e) => {
            tracing::debug!(
                url = %url,
                error = %e,
                transient = e.is_transient(),
                "Destination verification failed"
            );
            url.to_string()
        }
    }
}

async fn improve(
    url: &str,
    config: &ResolverConfig,
    cancel: &CancelSignal,
) -> ResolveResult<Option<String>> {
    let requested = Url::parse(url)?;
    let fetcher = HttpFetcher::new(config, cancel)?;
    let page = fetcher.get(url, config.request_timeout()).await?;

    if page.final_url != requested {
        return Ok(Some(normalize_url(page.final_url.as_str())));
    }

    let declared = canonical_hint(&page.body)
        .and_then(|hint| requested.join(&hint).ok())
        .filter(|declared| is_http_url(declared.as_str()));
    if let Some(declared) = declared {
        return Ok(Some(normalize_url(declared.as_str())));
    }

    let looks_dead = !page.status.is_success() || looks_not_found(&page.body);
    if !looks_dead {
        return Ok(None);
    }
    tracing::debug!(url = %url, status = %page.status, "Destination looks like a dead page");

    if let Some(found) = probe_slugs(&fetcher, config, &requested).await? {
        return Ok(Some(found));
    }

    let tokens = path_tokens(requested.path());
    match search_site(&fetcher, config, &requested, &tokens).await {
        Ok(found) => Ok(found),
        Err(ResolveError::Cancelled) => Err(ResolveError::Cancelled),
        Err(e) => {
            tracing::debug!(url = %url, error = %e, "Site search failed");
            Ok(None)
        }
    }
}

/// Try `origin/<slug>/` for each slug candidate; first success wins.
async fn probe_slugs(
    fetcher: &HttpFetcher,
    config: &ResolverConfig,
    requested: &Url,
) -> ResolveResult<Option<String>> {
    let origin = origin_of(requested);
    for slug in slug_candidates(requested.path()) {
        let candidate = format!("{origin}/{slug}/");
        match probe_one(fetcher, config, &candidate).await {
            Ok(Some(found)) => {
                tracing::debug!(candidate = %candidate, found = %found, "Slug probe succeeded");
                return Ok(Some(found));
            }
            Ok(None) => {}
            Err(ResolveError::Cancelled) => return Err(ResolveError::Cancelled),
            Err(e) => {
                tracing::debug!(candidate = %candidate, error = %e, "Slug probe failed");
            }
        }
    }
    Ok(None)
}

async fn probe_one(
    fetcher: &HttpFetcher,
    config: &ResolverConfig,
    candidate: &str,
) -> ResolveResult<Option<String>> {
    match fetcher.head(candidate, config.probe_timeout()).await {
        Ok(head) if head.status.is_success() => {
            return Ok(Some(normalize_url(head.final_url.as_str())));
        }
        Ok(_) => {}
        Err(ResolveError::Cancelled) => return Err(ResolveError::Cancelled),
        Err(e) => {
            tracing::debug!(candidate = %candidate, error = %e, "HEAD probe failed, trying GET");
        }
    }

    let page = fetcher.get(candidate, config.request_timeout()).await?;
    if !page.status.is_success() {
        return Ok(None);
    }
    let declared = canonical_link(&page.body)
        .and_then(|hint| page.final_url.join(&hint).ok())
        .filter(|declared| is_http_url(declared.as_str()))
        .unwrap_or(page.final_url);
    Ok(Some(normalize_url(declared.as_str())))
}
