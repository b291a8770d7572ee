//! Network-assisted URL resolution
//!
//! [`LinkResolver`] turns grounding redirect URLs into publisher URLs and
//! checks that cited destinations exist. Every operation is best-effort: the
//! worst outcome is the input URL handed back unchanged.

pub mod errors;
pub mod html_hints;
mod http;
mod site_search;
pub mod slug;
pub mod verify;
pub mod wrapper;

use futures::future::join_all;
use std::sync::Arc;

pub use errors::{ResolveError, ResolveResult};
pub use wrapper::WrapperStrategy;

use crate::config::ResolverConfig;
use crate::runtime::CancelSignal;

/// Resolves and verifies URLs under one configuration and cancel signal
///
/// Cloning is cheap; clones share the configuration and the cancel signal.
#[derive(Debug, Clone, Default)]
pub struct LinkResolver {
    config: Arc<ResolverConfig>,
    cancel: CancelSignal,
}

impl LinkResolver {
    #[must_use]
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            config: Arc::new(config),
            cancel: CancelSignal::new(),
        }
    }

    /// Use a caller-owned cancel signal (e.g. fired on client disconnect)
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelSignal) -> Self {
        self.cancel = cancel;
        self
    }

    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    #[must_use]
    pub fn cancel_signal(&self) -> &CancelSignal {
        &self.cancel
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Check whether `url` is a grounding redirect this resolver would unwrap
    #[must_use]
    pub fn is_wrapper_url(&self, url: &str) -> bool {
        self.config.is_wrapper_url(url)
    }

    /// Resolve a grounding redirect to its publisher URL, or return `url` unchanged.
    pub async fn resolve_wrapper(&self, url: &str) -> String {
        wrapper::resolve_wrapper(url, &self.config, &self.cancel).await
    }

    /// Verify a destination and return a better URL for it, or `url` unchanged.
    pub async fn verify_or_improve(&self, url: &str) -> String {
        verify::verify_destination(url, &self.config, &self.cancel).await
    }

    /// Resolve every URL concurrently. Output order matches input order.
    pub async fn resolve_wrappers<S: AsRef<str>>(&self, urls: &[S]) -> Vec<String> {
        join_all(urls.iter().map(|url| self.resolve_wrapper(url.as_ref()))).await
    }

    /// Verify every URL concurrently. Output order matches input order.
    pub async fn verify_all<S: AsRef<str>>(&self, urls: &[S]) -> Vec<String> {
        join_all(urls.iter().map(|url| self.verify_or_improve(url.as_ref()))).await
    }
}

/// Resolve a grounding redirect with the default configuration.
///
/// Never fails: when the URL is not a wrapper or cannot be resolved, it is
/// returned unchanged.
pub async fn resolve_wrapper_url(url: &str) -> String {
    LinkResolver::default().resolve_wrapper(url).await
}

/// Verify a destination with the default configuration.
///
/// Never fails: when nothing better is found, the URL is returned unchanged.
pub async fn verify_or_improve(url: &str) -> String {
    LinkResolver::default().verify_or_improve(url).await
}
