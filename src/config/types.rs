//! Core configuration types for link resolution
//!
//! This module contains the main `ResolverConfig` struct and its associated
//! types that define timeouts, caps and host-specific rules used while
//! resolving and verifying URLs.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::utils::{
    CHROME_USER_AGENT, DEFAULT_MAX_BODY_BYTES, DEFAULT_MAX_REDIRECTS, DEFAULT_MAX_SOURCES,
    DEFAULT_MAX_VERIFIED_URLS, DEFAULT_WRAPPER_HOST, DEFAULT_WRAPPER_MARKER, host_matches_domain,
};

/// Where the pipeline runs, which decides how long a single request may take
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentMode {
    /// Short-lived edge functions with a tight wall-clock budget: 3s per request
    Edge,
    /// Regular server process: 7s per request, 5s per slug probe
    #[default]
    Server,
}

impl DeploymentMode {
    #[must_use]
    pub fn request_timeout(self) -> Duration {
        match self {
            DeploymentMode::Edge => Duration::from_secs(3),
            DeploymentMode::Server => Duration::from_secs(7),
        }
    }

    #[must_use]
    pub fn probe_timeout(self) -> Duration {
        match self {
            DeploymentMode::Edge => Duration::from_secs(3),
            DeploymentMode::Server => Duration::from_secs(5),
        }
    }
}

/// How a site-search rule selects hosts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "match", content = "host", rename_all = "snake_case")]
pub enum HostMatch {
    /// Host must equal this value (case-insensitive)
    Exact(String),
    /// Host must equal this domain or be one of its subdomains
    Suffix(String),
}

impl HostMatch {
    #[must_use]
    pub fn matches(&self, host: &str) -> bool {
        match self {
            HostMatch::Exact(expected) => host.eq_ignore_ascii_case(expected),
            HostMatch::Suffix(domain) => host_matches_domain(host, domain),
        }
    }
}

/// Host-specific search endpoint used to recover from a dead article URL
///
/// `search_url` may contain `{origin}` and `{query}`; `result_prefix` may
/// contain `{origin}`. Result links are the absolute `href` values in the
/// search page that start with the expanded `result_prefix`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteSearchRule {
    pub host: HostMatch,
    pub search_url: String,
    pub result_prefix: String,
}

impl SiteSearchRule {
    /// WordPress sites answer `/?s=<terms>` with a list of matching posts.
    #[must_use]
    pub fn wordpress(domain: impl Into<String>) -> Self {
        Self {
            host: HostMatch::Suffix(domain.into()),
            search_url: "{origin}/?s={query}".to_string(),
            result_prefix: "{origin}".to_string(),
        }
    }

    /// food.com keeps recipes under `/recipe/` and searches under `/search/<terms>`.
    #[must_use]
    pub fn food_com() -> Self {
        Self {
            host: HostMatch::Exact("www.food.com".to_string()),
            search_url: "https://www.food.com/search/{query}".to_string(),
            result_prefix: "https://www.food.com/recipe/".to_string(),
        }
    }

    /// Expand the search URL template. `encoded_query` must already be percent-encoded.
    #[must_use]
    pub fn search_url_for(&self, origin: &str, encoded_query: &str) -> String {
        self.search_url
            .replace("{origin}", origin)
            .replace("{query}", encoded_query)
    }

    #[must_use]
    pub fn result_prefix_for(&self, origin: &str) -> String {
        self.result_prefix.replace("{origin}", origin)
    }
}

/// Main configuration struct for link resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub(crate) deployment_mode: DeploymentMode,

    /// Per-request timeout override in seconds
    ///
    /// Default: derived from `deployment_mode` (3s edge, 7s server)
    pub(crate) request_timeout_secs: Option<u64>,

    /// Timeout override in seconds for HEAD probes of corrected slugs
    ///
    /// Default: derived from `deployment_mode` (3s edge, 5s server)
    pub(crate) probe_timeout_secs: Option<u64>,

    /// Host of the grounding redirect service (subdomains included)
    pub(crate) wrapper_host: String,

    /// Path segment that marks a grounding redirect URL
    pub(crate) wrapper_marker: String,

    /// Number of distinct URLs per text sent through destination verification
    ///
    /// Default: 5
    pub(crate) max_verified_urls: usize,

    /// Maximum number of grounded sources kept
    ///
    /// Default: 3
    pub(crate) max_sources: usize,

    /// Maximum redirect hops per request
    ///
    /// Default: 10
    pub(crate) max_redirects: usize,

    /// Maximum number of body bytes read from any response
    ///
    /// Default: 2MB
    pub(crate) max_body_bytes: usize,

    pub(crate) user_agent: String,

    /// Run destination verification in the rewrite pipeline
    ///
    /// Default: true
    pub(crate) verify_destinations: bool,

    /// Host-specific search endpoints tried when a destination looks like a 404
    pub(crate) site_search: Vec<SiteSearchRule>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            deployment_mode: DeploymentMode::default(),
            request_timeout_secs: None,
            probe_timeout_secs: None,
            wrapper_host: DEFAULT_WRAPPER_HOST.to_string(),
            wrapper_marker: DEFAULT_WRAPPER_MARKER.to_string(),
            max_verified_urls: DEFAULT_MAX_VERIFIED_URLS,
            max_sources: DEFAULT_MAX_SOURCES,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            user_agent: CHROME_USER_AGENT.to_string(),
            verify_destinations: true,
            site_search: vec![
                SiteSearchRule::wordpress("thenewbaguette.com"),
                SiteSearchRule::food_com(),
            ],
        }
    }
}
