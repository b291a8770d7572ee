//! Getter methods for `ResolverConfig`
//!
//! This module provides all the accessor methods for retrieving configuration
//! values from a `ResolverConfig` instance.

use std::time::Duration;

use super::types::{DeploymentMode, ResolverConfig, SiteSearchRule};

impl ResolverConfig {
    #[must_use]
    pub fn deployment_mode(&self) -> DeploymentMode {
        self.deployment_mode
    }

    /// Time budget for a single request, including reading its body
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout_secs
            .map_or_else(|| self.deployment_mode.request_timeout(), Duration::from_secs)
    }

    /// Time budget for HEAD probes of corrected slugs
    #[must_use]
    pub fn probe_timeout(&self) -> Duration {
        self.probe_timeout_secs
            .map_or_else(|| self.deployment_mode.probe_timeout(), Duration::from_secs)
    }

    #[must_use]
    pub fn wrapper_host(&self) -> &str {
        &self.wrapper_host
    }

    #[must_use]
    pub fn wrapper_marker(&self) -> &str {
        &self.wrapper_marker
    }

    #[must_use]
    pub fn max_verified_urls(&self) -> usize {
        self.max_verified_urls
    }

    #[must_use]
    pub fn max_sources(&self) -> usize {
        self.max_sources
    }

    #[must_use]
    pub fn max_redirects(&self) -> usize {
        self.max_redirects
    }

    #[must_use]
    pub fn max_body_bytes(&self) -> usize {
        self.max_body_bytes
    }

    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    #[must_use]
    pub fn verify_destinations(&self) -> bool {
        self.verify_destinations
    }

    #[must_use]
    pub fn site_search(&self) -> &[SiteSearchRule] {
        &self.site_search
    }
}
