//! Error types for network-assisted URL resolution
//!
//! None of these escape the public resolver API: every failure is logged and
//! turned into "return the input unchanged" at the boundary of the URL being
//! resolved.

use reqwest::StatusCode;
use thiserror::Error;

/// Result type alias for resolution steps
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Error types for resolution steps
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The request did not finish within its time budget
    #[error("{operation} timed out after {millis} ms")]
    Timeout { operation: &'static str, millis: u128 },

    /// Transport-level failure (DNS, TLS, connection reset, redirect loop)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("Unexpected HTTP status {0}")]
    Status(StatusCode),

    /// A URL could not be parsed or joined
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The caller cancelled the pipeline
    #[error("Resolution cancelled")]
    Cancelled,

    /// An embedded payload could not be decoded
    #[error("Payload decode failed: {0}")]
    Decode(String),
}

impl From<base64::DecodeError> for ResolveError {
    fn from(error: base64::DecodeError) -> Self {
        ResolveError::Decode(error.to_string())
    }
}

impl ResolveError {
    /// Check if the failure came from the network rather than from the input
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ResolveError::Timeout { .. } | ResolveError::Http(_) | ResolveError::Status(_)
        )
    }

    /// Check if the failure is the caller's cancellation signal
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ResolveError::Cancelled)
    }
}
