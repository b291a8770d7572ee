//! Grounding redirect resolution
//!
//! A wrapper URL is resolved by an ordered chain of strategies. Each one either
//! finds the publisher URL, finds nothing (`Ok(None)`), or fails; failures are
//! logged and the chain moves on, except cancellation which stops it.

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use url::Url;

use super::errors::{ResolveError, ResolveResult};
use super::html_hints::{find_embedded_url, first_external_anchor, meta_refresh_target};
use super::http::HttpFetcher;
use crate::canonicalize::normalize_url;
use crate::config::ResolverConfig;
use crate::runtime::CancelSignal;
use crate::utils::is_http_url;

/// Standard alphabet, but tolerant of the non-zero trailing bits that
/// truncated payloads leave behind
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::RequireCanonical),
);

/// Ways of recovering the destination of a wrapper URL, tried in [`WrapperStrategy::ORDER`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapperStrategy {
    /// Decode the base64 payload after the marker segment; no network
    EmbeddedPayload,
    /// Follow HTTP redirects to the final response and keep it if it left the wrapper host
    HttpRedirect,
    /// Read the wrapper page for a meta refresh or an outbound anchor
    HtmlBody,
}

impl WrapperStrategy {
    pub const ORDER: [WrapperStrategy; 3] = [
        WrapperStrategy::EmbeddedPayload,
        WrapperStrategy::HttpRedirect,
        WrapperStrategy::HtmlBody,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            WrapperStrategy::EmbeddedPayload => "embedded_payload",
            WrapperStrategy::HttpRedirect => "http_redirect",
            WrapperStrategy::HtmlBody => "html_body",
        }
    }

    async fn attempt(
        self,
        url: &str,
        config: &ResolverConfig,
        cancel: &CancelSignal,
    ) -> ResolveResult<Option<String>> {
        match self {
            WrapperStrategy::EmbeddedPayload => Ok(decode_embedded_payload(url, config)),
            WrapperStrategy::HttpRedirect => follow_http_redirect(url, config, cancel).await,
            WrapperStrategy::HtmlBody => inspect_html_body(url, config, cancel).await,
        }
    }
}

/// Resolve a grounding redirect to its publisher URL.
///
/// Returns `url` unchanged when it is not a wrapper URL, when every strategy
/// comes up empty, or when `cancel` fires.
pub(crate) async fn resolve_wrapper(
    url: &str,
    config: &ResolverConfig,
    cancel: &CancelSignal,
) -> String {
    if !config.is_wrapper_url(url) {
        return url.to_string();
    }

    for strategy in WrapperStrategy::ORDER {
        if cancel.is_cancelled() {
            break;
        }
        match strategy.attempt(url, config, cancel).await {
            Ok(Some(destination)) => {
                tracing::debug!(
                    url = %url,
                    strategy = strategy.name(),
                    destination = %destination,
                    "Resolved grounding redirect"
                );
                return destination;
            }
            Ok(None) => {
                tracing::debug!(url = %url, strategy = strategy.name(), "Strategy found nothing");
            }
            Err(ResolveError::Cancelled) => {
                tracing::debug!(url = %url, strategy = strategy.name(), "Resolution cancelled");
                break;
            }
            Err(e) => {
                tracing::debug!(
                    url = %url,
                    strategy = strategy.name(),
                    error = %e,
                    transient = e.is_transient(),
                    "Strategy failed"
                );
            }
        }
    }

    url.to_string()
}

/// Payload text following the marker segment of a wrapper path
fn payload_after_marker<'a>(path: &'a str, marker: &str) -> Option<&'a str> {
    let start = path.find(marker)? + marker.len();
    path.get(start..).filter(|payload| !payload.is_empty())
}

/// Decode URL-safe, possibly unpadded base64 into lossy UTF-8.
///
/// Characters outside the base64 alphabet are skipped and a dangling single
/// character is dropped, so a damaged payload still yields whatever it holds.
pub(crate) fn decode_lenient_base64(payload: &str) -> ResolveResult<String> {
    let mut normalized: String = payload
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .filter(|c| c.is_ascii_alphanumeric() || *c == '+' || *c == '/')
        .collect();
    if normalized.len() % 4 == 1 {
        normalized.pop();
    }
    let padding = (4 - normalized.len() % 4) % 4;
    normalized.extend(std::iter::repeat_n('=', padding));

    let bytes = PAYLOAD_ENGINE.decode(normalized.as_bytes())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn decode_embedded_payload(url: &str, config: &ResolverConfig) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let payload = payload_after_marker(parsed.path(), config.wrapper_marker())?;

    let raw = decode_lenient_base64(payload).unwrap_or_default();
    let unescaped = urlencoding::decode(payload)
        .ok()
        .and_then(|decoded| decode_lenient_base64(&decoded).ok())
        .unwrap_or_default();
    let decoded = if raw.len() >= unescaped.len() { raw } else { unescaped };
    if decoded.is_empty() {
        return None;
    }

    find_embedded_url(&decoded, config.wrapper_host()).map(|found| normalize_url(&found))
}

async fn follow_http_redirect(
    url: &str,
    config: &ResolverConfig,
    cancel: &CancelSignal,
) -> ResolveResult<Option<String>> {
    let fetcher = HttpFetcher::new(config, cancel)?;
    let fetched = fetcher.head_or_get(url, config.request_timeout()).await?;
    let destination = &fetched.final_url;

    let left_wrapper = destination
        .host_str()
        .is_some_and(|host| !config.is_wrapper_host(host));
    if left_wrapper && is_http_url(destination.as_str()) {
        Ok(Some(normalize_url(destination.as_str())))
    } else {
        Ok(None)
    }
}

async fn inspect_html_body(
    url: &str,
    config: &ResolverConfig,
    cancel: &CancelSignal,
) -> ResolveResult<Option<String>> {
    let fetcher = HttpFetcher::new(config, cancel)?;
    let fetched = fetcher.get(url, config.request_timeout()).await?;

    let refresh = meta_refresh_target(&fetched.body)
        .and_then(|target| fetched.final_url.join(&target).ok())
        .filter(|target| {
            is_http_url(target.as_str())
                && target
                    .host_str()
                    .is_some_and(|host| !config.is_wrapper_host(host))
        });
    if let Some(target) = refresh {
        return Ok(Some(normalize_url(target.as_str())));
    }

    Ok(first_external_anchor(&fetched.body, config.wrapper_host())
        .map(|anchor| normalize_url(&anchor)))
}
