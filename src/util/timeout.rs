//! Per-call deadline helper.

use std::future::Future;
use std::time::Duration;

use crate::error::IdentityError;

/// Wrap a provider call with a deadline. Expiry maps to
/// [`IdentityError::Timeout`], which callers treat like any transport failure.
pub async fn with_timeout<T>(
    duration: Duration,
    future: impl Future<Output = Result<T, IdentityError>>,
) -> Result<T, IdentityError> {
    match tokio::time::timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => Err(IdentityError::Timeout(duration.as_millis() as u64)),
    }
}
