//! Shared constants and URL helpers

pub mod constants;
pub mod url_utils;

pub use constants::*;
pub use url_utils::{host_matches_domain, is_http_url, origin_of, points_at_domain};
