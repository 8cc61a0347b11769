//! Retry module
//!
//! Opt-in retries for idempotent remote calls. Clients built without a
//! policy issue every request exactly once.

pub mod policy;

pub use policy::*;

use crate::error::FileSearchError;

/// Run `operation` once, or under `policy` when one is configured.
pub async fn maybe_retry<F, Fut, T>(
    policy: Option<&RetryPolicy>,
    operation: F,
) -> Result<T, FileSearchError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, FileSearchError>>,
{
    match policy {
        Some(policy) => policy.run(operation).await,
        None => {
            let mut operation = operation;
            operation().await
        }
    }
}
