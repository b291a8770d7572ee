//! Builder for `ResolverConfig`
//!
//! Every field has a default, so the builder only exists to override values
//! and to validate the result before it reaches the resolver.

use anyhow::Result;

use super::types::{DeploymentMode, ResolverConfig, SiteSearchRule};

#[derive(Debug, Clone, Default)]
pub struct ResolverConfigBuilder {
    config: ResolverConfig,
}

impl ResolverConfig {
    /// Create a builder starting from the default configuration
    #[must_use]
    pub fn builder() -> ResolverConfigBuilder {
        ResolverConfigBuilder::default()
    }
}

impl ResolverConfigBuilder {
    /// Select the timeout profile
    ///
    /// Explicit `request_timeout_secs` / `probe_timeout_secs` overrides still win.
    ///
    /// # Example
    /// ```rust
    /// # use kodegen_tools_citerender::config::{DeploymentMode, ResolverConfig};
    /// # fn main() -> anyhow::Result<()> {
    /// let config = ResolverConfig::builder()
    ///     .deployment_mode(DeploymentMode::Edge)
    ///     .build()?;
    /// assert_eq!(config.request_timeout().as_secs(), 3);
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn deployment_mode(mut self, mode: DeploymentMode) -> Self {
        self.config.deployment_mode = mode;
        self
    }

    #[must_use]
    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = Some(secs);
        self
    }

    #[must_use]
    pub fn probe_timeout_secs(mut self, secs: u64) -> Self {
        self.config.probe_timeout_secs = Some(secs);
        self
    }

    #[must_use]
    pub fn wrapper_host(mut self, host: impl Into<String>) -> Self {
        self.config.wrapper_host = host.into();
        self
    }

    #[must_use]
    pub fn wrapper_marker(mut self, marker: impl Into<String>) -> Self {
        self.config.wrapper_marker = marker.into();
        self
    }

    #[must_use]
    pub fn max_verified_urls(mut self, max: usize) -> Self {
        self.config.max_verified_urls = max;
        self
    }

    #[must_use]
    pub fn max_sources(mut self, max: usize) -> Self {
        self.config.max_sources = max;
        self
    }

    #[must_use]
    pub fn max_redirects(mut self, max: usize) -> Self {
        self.config.max_redirects = max;
        self
    }

    #[must_use]
    pub fn max_body_bytes(mut self, max: usize) -> Self {
        self.config.max_body_bytes = max;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Enable or disable destination verification in the rewrite pipeline
    #[must_use]
    pub fn verify_destinations(mut self, enabled: bool) -> Self {
        self.config.verify_destinations = enabled;
        self
    }

    /// Replace the site-search rules
    #[must_use]
    pub fn site_search(mut self, rules: Vec<SiteSearchRule>) -> Self {
        self.config.site_search = rules;
        self
    }

    #[must_use]
    pub fn add_site_search(mut self, rule: SiteSearchRule) -> Self {
        self.config.site_search.push(rule);
        self
    }

    /// Validate and return the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a timeout or cap is zero, the wrapper host is empty,
    /// or the wrapper marker is not a `/`-delimited path segment.
    pub fn build(self) -> Result<ResolverConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
