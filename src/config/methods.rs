//! Validation, loading and host predicates for `ResolverConfig`

use anyhow::{Context, Result, bail};
use url::Url;

use super::types::{ResolverConfig, SiteSearchRule};
use crate::utils::host_matches_domain;

impl ResolverConfig {
    /// Load a configuration from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the result fails validation.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).context("Failed to parse resolver configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants the resolver relies on
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.request_timeout_secs == Some(0) {
            bail!("request_timeout_secs must be greater than zero");
        }
        if self.probe_timeout_secs == Some(0) {
            bail!("probe_timeout_secs must be greater than zero");
        }
        if self.max_verified_urls == 0 {
            bail!("max_verified_urls must be greater than zero (disable verify_destinations instead)");
        }
        if self.max_sources == 0 {
            bail!("max_sources must be greater than zero");
        }
        if self.max_body_bytes == 0 {
            bail!("max_body_bytes must be greater than zero");
        }
        if self.wrapper_host.trim().is_empty() {
            bail!("wrapper_host cannot be empty");
        }
        if self.wrapper_marker.len() < 3
            || !self.wrapper_marker.starts_with('/')
            || !self.wrapper_marker.ends_with('/')
        {
            bail!(
                "wrapper_marker '{}' must be a path segment like '/grounding-api-redirect/'",
                self.wrapper_marker
            );
        }
        for rule in &self.site_search {
            if !rule.search_url.contains("{query}") {
                bail!("site search URL '{}' has no {{query}} placeholder", rule.search_url);
            }
        }
        Ok(())
    }

    /// Check whether a URL is a grounding redirect: wrapper host (or subdomain)
    /// and the marker segment in its path.
    #[must_use]
    pub fn is_wrapper_url(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };
        parsed
            .host_str()
            .is_some_and(|host| host_matches_domain(host, &self.wrapper_host))
            && parsed.path().contains(self.wrapper_marker.as_str())
    }

    /// Check whether a host belongs to the wrapper service
    #[must_use]
    pub fn is_wrapper_host(&self, host: &str) -> bool {
        host_matches_domain(host, &self.wrapper_host)
    }

    /// First site-search rule matching `host`
    #[must_use]
    pub fn site_search_for(&self, host: &str) -> Option<&SiteSearchRule> {
        self.site_search.iter().find(|rule| rule.host.matches(host))
    }
}
