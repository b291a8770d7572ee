//! Timeout and cancellation wrappers for network operations
//!
//! Every request made during resolution goes through [`guarded`], so a slow
//! host or a cancelled pipeline can never hold a resolution open.

use std::future::Future;
use std::time::Duration;

use super::cancel::CancelSignal;
use crate::resolver::{ResolveError, ResolveResult};

/// Wrap an async operation with an explicit timeout
///
/// # Arguments
/// * `operation` - The async Future to execute with a timeout
/// * `timeout` - Time budget for the operation
/// * `operation_name` - Human-readable name for error messages
///
/// # Returns
/// * `Ok(T)` - Operation completed successfully
/// * `Err` - Either the operation failed or the timeout was reached
pub async fn with_timeout<F, T>(
    operation: F,
    timeout: Duration,
    operation_name: &'static str,
) -> ResolveResult<T>
where
    F: Future<Output = ResolveResult<T>>,
{
    match tokio::time::timeout(timeout, operation).await {
        Ok(result) => result,
        Err(_) => Err(ResolveError::Timeout {
            operation: operation_name,
            millis: timeout.as_millis(),
        }),
    }
}

/// Apply [`with_timeout`] and abort early when `cancel` fires.
pub async fn guarded<F, T>(
    operation: F,
    timeout: Duration,
    operation_name: &'static str,
    cancel: &CancelSignal,
) -> ResolveResult<T>
where
    F: Future<Output = ResolveResult<T>>,
{
    if cancel.is_cancelled() {
        return Err(ResolveError::Cancelled);
    }

    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(ResolveError::Cancelled),
        result = with_timeout(operation, timeout, operation_name) => result,
    }
}
