//! Async primitives shared by the resolver and the rewrite pipeline
//!
//! Cancellation is cooperative: the caller owns a [`CancelSignal`] and every
//! network call races it together with its own timeout.

pub mod cancel;
pub mod timeout;

pub use cancel::CancelSignal;
pub use timeout::{guarded, with_timeout};
