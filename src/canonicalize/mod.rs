//! Pure URL canonicalization
//!
//! Removes analytics parameters and unwraps query-parameter redirectors so that
//! two links to the same publisher page compare equal. Everything here is
//! synchronous and free of I/O; network-assisted resolution lives in
//! [`crate::resolver`].

mod normalize;
pub mod tracking;

pub use normalize::normalize_url;
pub use tracking::{REDIRECT_PARAMS, TRACKING_PARAMS};
