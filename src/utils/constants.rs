//! Shared configuration constants for citerender
//!
//! This module contains default values and configuration constants used
//! throughout the codebase to ensure consistency and avoid magic numbers.

/// Maximum number of nested redirect layers unwrapped by pure normalization
///
/// Generated text occasionally contains a tracker wrapping a search redirect
/// wrapping the publisher URL. Three layers covers every case seen in practice
/// while keeping normalization bounded.
pub const MAX_UNWRAP_DEPTH: usize = 3;

/// Default number of distinct URLs verified per text
///
/// Destination verification costs at least one GET per URL, so only the first
/// few URLs in a text are checked to keep response latency predictable.
pub const DEFAULT_MAX_VERIFIED_URLS: usize = 5;

/// Default number of grounded sources kept in a "Sources" list
pub const DEFAULT_MAX_SOURCES: usize = 3;

/// Maximum number of slug candidates probed when a page looks like a 404
pub const MAX_SLUG_CANDIDATES: usize = 3;

/// Default number of redirect hops followed per request
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// Default maximum body size read during resolution: 2MB
///
/// Redirect interstitials and article pages are far below this. Larger bodies
/// are cut off rather than buffered.
pub const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Host of the grounding redirect service
pub const DEFAULT_WRAPPER_HOST: &str = "vertexaisearch.cloud.google.com";

/// Path segment marking a grounding redirect URL
pub const DEFAULT_WRAPPER_MARKER: &str = "/grounding-api-redirect/";

/// Chrome user agent string sent with resolution requests
///
/// Several publishers answer bare HTTP clients with 403 or an interstitial,
/// so requests identify as a current stable Chrome.
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";
