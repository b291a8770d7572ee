//! Tracking parameter stripping and redirect parameter extraction

use url::Url;

use crate::utils::is_http_url;

/// Analytics and search-engine bookkeeping parameters removed from every URL
pub const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "utm_id",
    "gclid",
    "fbclid",
    "mc_eid",
    "mc_cid",
    "igshid",
    "ved",
    "ei",
    "oq",
    "sclient",
    "sa",
    "source",
    "sca_esv",
    "rlz",
    "bih",
    "biw",
    "usg",
    "opi",
];

/// Query parameters that commonly carry the real destination of a redirector,
/// in lookup order. Matched case-insensitively.
pub const REDIRECT_PARAMS: &[&str] = &[
    "url",
    "q",
    "u",
    "target",
    "dest",
    "destination",
    "to",
    "redirect",
    "r",
    "link",
    "ru",
];

/// Search-engine hosts whose `/url` endpoint is a click-through redirector
const SEARCH_REDIRECT_DOMAINS: &[&str] = &["google.com", "googleusercontent.com"];

/// Remove every tracking parameter from the query string.
///
/// Any existing query is re-serialized as `application/x-www-form-urlencoded`,
/// which keeps the output stable under repeated normalization. A query left
/// empty is dropped entirely.
pub fn strip_tracking_params(url: &mut Url) {
    if url.query().is_none() {
        return;
    }

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !TRACKING_PARAMS.contains(&key.as_ref()))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    if kept.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(kept);
    }
}

/// Decode a parameter value one more time, keeping the input when it is not
/// valid percent-encoding.
fn decode_safe(value: &str) -> String {
    urlencoding::decode(value)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| value.to_string())
}

fn query_value(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, value)| key.eq_ignore_ascii_case(name) && !value.is_empty())
        .map(|(_, value)| value.into_owned())
}

/// Find a nested absolute http(s) URL carried in a redirect parameter.
pub fn extract_redirect_target(url: &Url) -> Option<String> {
    for name in REDIRECT_PARAMS {
        let Some(raw) = query_value(url, name) else {
            continue;
        };
        let decoded = decode_safe(&raw);
        if is_http_url(&decoded) {
            return Some(decoded);
        }
    }

    let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
    let is_search_redirect = SEARCH_REDIRECT_DOMAINS
        .iter()
        .any(|domain| host.ends_with(domain))
        && url.path().starts_with("/url");
    if is_search_redirect {
        let decoded = query_value(url, "q")
            .or_else(|| query_value(url, "url"))
            .map(|raw| decode_safe(&raw))?;
        if is_http_url(&decoded) {
            return Some(decoded);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_only_tracking_params() {
        let mut url = Url::parse("https://example.com/a?utm_source=x&id=7&fbclid=abc").unwrap();
        strip_tracking_params(&mut url);
        assert_eq!(url.as_str(), "https://example.com/a?id=7");
    }

    #[test]
    fn drops_query_left_empty() {
        let mut url = Url::parse("https://example.com/a?utm_medium=email&gclid=1").unwrap();
        strip_tracking_params(&mut url);
        assert_eq!(url.as_str(), "https://example.com/a");
    }

    #[test]
    fn redirect_keys_match_case_insensitively() {
        let url = Url::parse("https://r.example.net/click?RU=https%3A%2F%2Fdest.example.org%2F").unwrap();
        assert_eq!(
            extract_redirect_target(&url).as_deref(),
            Some("https://dest.example.org/")
        );
    }

    #[test]
    fn non_url_redirect_values_are_ignored() {
        let url = Url::parse("https://example.com/search?q=chicken+soup").unwrap();
        assert_eq!(extract_redirect_target(&url), None);
    }
}
