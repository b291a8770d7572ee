//! Configuration module for link resolution
//!
//! This module provides the `ResolverConfig` struct and its builder for
//! configuring timeouts, caps and host rules with validation and sensible
//! defaults.

// Sub-modules
pub mod builder;
pub mod getters;
pub mod methods;
pub mod types;

// Re-exports for public API
pub use builder::ResolverConfigBuilder;
pub use types::{DeploymentMode, HostMatch, ResolverConfig, SiteSearchRule};
