//! Long-running operation polling
//!
//! Uploads and imports return an [`Operation`] that completes asynchronously
//! on the service side. [`poll_until_done`] re-fetches it on an interval until
//! `done` is set, bounded by a timeout and/or an attempt cap, and stops early
//! when the cancellation token fires.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::FileSearchError;
use crate::types::Operation;

/// Polling schedule for long-running operations.
#[derive(Debug, Clone)]
pub struct PollOptions {
    /// Delay before the first status check and between checks
    pub interval: Duration,
    /// Growth factor applied to the interval after each check (1.0 = fixed)
    pub multiplier: f64,
    /// Upper bound for the interval
    pub max_interval: Duration,
    /// Total wall-clock budget; `None` waits forever
    pub timeout: Option<Duration>,
    /// Maximum number of status checks; `None` is unlimited
    pub max_attempts: Option<u32>,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            multiplier: 1.0,
            max_interval: Duration::from_secs(60),
            timeout: Some(Duration::from_secs(30 * 60)),
            max_attempts: None,
        }
    }
}

impl PollOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixed 5s interval with no timeout and no attempt cap.
    pub fn unbounded() -> Self {
        Self {
            timeout: None,
            max_attempts: None,
            ..Self::default()
        }
    }

    pub const fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Exponential growth of the interval, capped at `max_interval`.
    pub const fn with_backoff(mut self, multiplier: f64, max_interval: Duration) -> Self {
        self.multiplier = multiplier;
        self.max_interval = max_interval;
        self
    }

    pub const fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub const fn with_max_attempts(mut self, attempts: Option<u32>) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Non-finite or overflowing growth lands on `max_interval`.
    fn next_interval(&self, current: Duration) -> Duration {
        if self.multiplier <= 1.0 {
            return current;
        }
        Duration::try_from_secs_f64(current.as_secs_f64() * self.multiplier)
            .map_or(self.max_interval, |next| next.min(self.max_interval))
    }
}

/// Poll `fetch` until the operation reports `done`.
///
/// An operation that is already done is returned without calling `fetch`.
/// The completed operation is returned exactly as the last fetch produced it,
/// unless it carries an error payload, which becomes
/// [`FileSearchError::OperationFailed`].
pub async fn poll_until_done<F, Fut>(
    initial: Operation,
    mut fetch: F,
    options: &PollOptions,
    cancel: &CancellationToken,
) -> Result<Operation, FileSearchError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<Operation, FileSearchError>>,
{
    let start = Instant::now();
    let mut op = initial;
    let mut interval = options.interval;
    let mut attempts: u32 = 0;

    loop {
        if op.is_done() {
            return finish(op);
        }

        if let Some(max) = options.max_attempts
            && attempts >= max
        {
            return Err(FileSearchError::TimeoutError(format!(
                "Operation {} not done after {attempts} status checks",
                op.name
            )));
        }

        let elapsed = start.elapsed();
        let wait = match options.timeout {
            Some(timeout) if elapsed >= timeout => {
                return Err(FileSearchError::TimeoutError(format!(
                    "Operation {} timed out after {}s",
                    op.name,
                    timeout.as_secs()
                )));
            }
            Some(timeout) => interval.min(timeout - elapsed),
            None => interval,
        };

        tokio::select! {
            _ = cancel.cancelled() => {
                return Err(FileSearchError::Cancelled(format!(
                    "Waiting for operation {} was cancelled",
                    op.name
                )));
            }
            _ = tokio::time::sleep(wait) => {}
        }

        op = fetch(op.name.clone()).await?;
        attempts += 1;
        tracing::debug!(operation = %op.name, attempt = attempts, done = op.is_done(), "polled operation");
        interval = options.next_interval(interval);
    }
}

fn finish(op: Operation) -> Result<Operation, FileSearchError> {
    match &op.error {
        Some(err) => Err(FileSearchError::OperationFailed {
            name: op.name.clone(),
            code: err.code,
            message: err
                .message
                .clone()
                .unwrap_or_else(|| "operation reported an error".to_string()),
        }),
        None => Ok(op),
    }
}
