//! HTTP access for resolution steps
//!
//! A fresh [`HttpFetcher`] is built for every URL being resolved, so nothing
//! (connections, cookies) is shared between resolutions. Every request is
//! bounded by the configured timeout and races the caller's cancel signal.

use futures::StreamExt;
use reqwest::header::ACCEPT;
use reqwest::redirect::Policy;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

use super::errors::{ResolveError, ResolveResult};
use crate::config::ResolverConfig;
use crate::runtime::{CancelSignal, guarded};

const HTML_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Outcome of a single request after redirects
#[derive(Debug, Clone)]
pub(crate) struct Fetched {
    /// URL of the last response (after any redirects that were followed)
    pub final_url: Url,
    pub status: StatusCode,
    /// Body text, empty for HEAD requests; cut at the configured byte limit
    pub body: String,
}

pub(crate) struct HttpFetcher {
    client: Client,
    cancel: CancelSignal,
    max_body_bytes: usize,
}

impl HttpFetcher {
    /// Fetcher that follows up to `max_redirects` hops anywhere
    pub fn new(config: &ResolverConfig, cancel: &CancelSignal) -> ResolveResult<Self> {
        let client = Client::builder()
            .redirect(Policy::limited(config.max_redirects()))
            .user_agent(config.user_agent())
            .build()?;
        Ok(Self {
            client,
            cancel: cancel.clone(),
            max_body_bytes: config.max_body_bytes(),
        })
    }

    pub async fn head(&self, url: &str, timeout: Duration) -> ResolveResult<Fetched> {
        let request = self.client.head(url).timeout(timeout).header(ACCEPT, HTML_ACCEPT);
        guarded(
            async move {
                let response = request.send().await?;
                Ok(Self::describe(&response, String::new()))
            },
            timeout,
            "HEAD request",
            &self.cancel,
        )
        .await
    }

    pub async fn get(&self, url: &str, timeout: Duration) -> ResolveResult<Fetched> {
        let request = self.client.get(url).timeout(timeout).header(ACCEPT, HTML_ACCEPT);
        let limit = self.max_body_bytes;
        guarded(
            async move {
                let response = request.send().await?;
                let mut fetched = Self::describe(&response, String::new());
                fetched.body = read_body_limited(response, limit).await?;
                Ok(fetched)
            },
            timeout,
            "GET request",
            &self.cancel,
        )
        .await
    }

    /// HEAD first; servers that reject HEAD (or fail it) get a GET.
    pub async fn head_or_get(&self, url: &str, timeout: Duration) -> ResolveResult<Fetched> {
        match self.head(url, timeout).await {
            Ok(fetched) if !fetched.status.is_client_error() && !fetched.status.is_server_error() => {
                Ok(fetched)
            }
            Ok(fetched) => {
                tracing::debug!(url = %url, status = %fetched.status, "HEAD rejected, retrying with GET");
                self.get(url, timeout).await
            }
            Err(ResolveError::Cancelled) => Err(ResolveError::Cancelled),
            Err(e) => {
                tracing::debug!(url = %url, error = %e, "HEAD failed, retrying with GET");
                self.get(url, timeout).await
            }
        }
    }

    fn describe(response: &reqwest::Response, body: String) -> Fetched {
        Fetched {
            final_url: response.url().clone(),
            status: response.status(),
            body,
        }
    }
}

/// Stream the body, stopping at `limit` bytes.
///
/// Canonical links and refresh tags live in the document head, so a cut-off
/// body is still useful and is not treated as an error.
async fn read_body_limited(response: reqwest::Response, limit: usize) -> ResolveResult<String> {
    let expected = response.content_length().unwrap_or(0) as usize;
    let mut buffer = Vec::with_capacity(expected.min(limit));
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        let remaining = limit - buffer.len();
        if chunk.len() >= remaining {
            buffer.extend_from_slice(&chunk[..remaining]);
            tracing::debug!(limit, "Response body truncated at read limit");
            break;
        }
        buffer.extend_from_slice(&chunk);
    }

    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
