//! Host-specific site search for dead article URLs

use url::Url;

use super::errors::ResolveResult;
use super::html_hints::anchor_hrefs;
use super::http::HttpFetcher;
use super::slug::pick_best_by_tokens;
use crate::canonicalize::normalize_url;
use crate::config::ResolverConfig;
use crate::utils::url_utils::origin_of;

/// Search the host of `url` for a page matching `tokens`.
///
/// Returns the highest-scoring result link; when no link shares a token with
/// the requested path the first result wins. `Ok(None)` means no rule covers
/// the host, the query is empty, or the page lists no result links.
pub(crate) async fn search_site(
    fetcher: &HttpFetcher,
    config: &ResolverConfig,
    url: &Url,
    tokens: &[String],
) -> ResolveResult<Option<String>> {
    let Some(host) = url.host_str() else {
        return Ok(None);
    };
    let Some(rule) = config.site_search_for(host) else {
        return Ok(None);
    };
    if tokens.is_empty() {
        return Ok(None);
    }

    let origin = origin_of(url);
    let query = urlencoding::encode(&tokens.join(" ")).into_owned();
    let search_url = Url::parse(&rule.search_url_for(&origin, &query))?;
    let result_prefix = rule.result_prefix_for(&origin);

    tracing::debug!(url = %url, search = %search_url, "Querying site search");
    let page = fetcher.get(search_url.as_str(), config.request_timeout()).await?;

    let mut results: Vec<String> = Vec::new();
    for href in anchor_hrefs(&page.body) {
        let Ok(absolute) = search_url.join(&href) else {
            continue;
        };
        let absolute = absolute.to_string();
        if absolute.starts_with(&result_prefix)
            && absolute.len() > result_prefix.len()
            && !absolute.contains('#')
            && !results.contains(&absolute)
        {
            results.push(absolute);
        }
    }

    let best =
        pick_best_by_tokens(&results, tokens, &search_url).map(|(found, _)| normalize_url(&found));

    tracing::debug!(
        url = %url,
        candidates = results.len(),
        found = best.is_some(),
        "Site search finished"
    );
    Ok(best)
}
