//! URL helper predicates shared by the canonicalizer, resolver and renderer.

use url::Url;

/// Check whether a string starts with an absolute `http://` or `https://` scheme.
///
/// Case-insensitive and purely syntactic: the rest of the string is not parsed.
#[must_use]
pub fn is_http_url(candidate: &str) -> bool {
    let bytes = candidate.as_bytes();
    let has_prefix = |prefix: &str| {
        bytes.len() >= prefix.len() && bytes[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
    };
    has_prefix("http://") || has_prefix("https://")
}

/// Check whether `host` equals `domain` or is one of its subdomains.
///
/// Both sides are compared case-insensitively.
#[must_use]
pub fn host_matches_domain(host: &str, domain: &str) -> bool {
    let host = host.trim_end_matches('.');
    if host.eq_ignore_ascii_case(domain) {
        return true;
    }
    host.len() > domain.len()
        && host.as_bytes()[host.len() - domain.len() - 1] == b'.'
        && host
            .get(host.len() - domain.len()..)
            .is_some_and(|tail| tail.eq_ignore_ascii_case(domain))
}

/// Check whether an absolute URL string points at `domain` (or a subdomain).
///
/// Unparseable strings fall back to a case-insensitive substring test so that
/// fragments cut out of binary payloads are still recognised.
#[must_use]
pub fn points_at_domain(url: &str, domain: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => parsed
            .host_str()
            .is_some_and(|host| host_matches_domain(host, domain)),
        Err(_) => url.to_ascii_lowercase().contains(&domain.to_ascii_lowercase()),
    }
}

/// Scheme + host + port of a URL, e.g. `https://example.com:8443`
#[must_use]
pub fn origin_of(url: &Url) -> String {
    url.origin().ascii_serialization()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_prefix_is_case_insensitive() {
        assert!(is_http_url("HTTPS://example.com"));
        assert!(is_http_url("http://x"));
        assert!(!is_http_url("ftp://example.com"));
        assert!(!is_http_url("https:/example.com"));
        assert!(!is_http_url("htt"));
    }

    #[test]
    fn domain_matching_respects_label_boundaries() {
        assert!(host_matches_domain("vertexaisearch.cloud.google.com", "vertexaisearch.cloud.google.com"));
        assert!(host_matches_domain("eu.vertexaisearch.cloud.google.com", "vertexaisearch.cloud.google.com"));
        assert!(!host_matches_domain("notvertexaisearch.cloud.google.com", "vertexaisearch.cloud.google.com"));
        assert!(host_matches_domain("www.google.com", "google.com"));
    }
}
