//! Exponential backoff with jitter for failed requests.

use std::future::Future;
use std::time::Duration;

use rand::Rng;

use crate::error::FileSearchError;

/// When and how long to wait before re-sending a failed request.
///
/// The default retries up to 3 times in total, starting at 1s and doubling,
/// with ±10% jitter, for errors where [`FileSearchError::is_retryable`] holds.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Attempts in total, the first one included
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
    /// Jitter as a fraction of the delay; `None` disables it
    pub jitter: Option<f64>,
    /// Replaces the default retryability check
    pub retry_if: Option<fn(&FileSearchError) -> bool>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
            backoff_multiplier: 2.0,
            jitter: Some(0.1),
            retry_if: None,
        }
    }
}

impl RetryPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub const fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub const fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub const fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Turn the default ±10% jitter on or off.
    pub const fn with_jitter(mut self, enabled: bool) -> Self {
        self.jitter = if enabled { Some(0.1) } else { None };
        self
    }

    /// Jitter as a fraction of the delay, clamped to `0.0..=1.0`.
    pub fn with_jitter_factor(mut self, factor: f64) -> Self {
        self.jitter = Some(factor.clamp(0.0, 1.0));
        self
    }

    pub fn with_retry_if(mut self, condition: fn(&FileSearchError) -> bool) -> Self {
        self.retry_if = Some(condition);
        self
    }

    pub fn should_retry(&self, error: &FileSearchError) -> bool {
        match self.retry_if {
            Some(condition) => condition(error),
            None => error.is_retryable(),
        }
    }

    /// Delay before the retry following failed attempt `attempt` (0-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = self.backoff_multiplier.max(1.0).powi(attempt as i32);
        let nanos = self.initial_delay.as_nanos() as f64 * factor;
        let delay = Duration::from_nanos(nanos as u64).min(self.max_delay);

        match self.jitter {
            Some(fraction) if fraction > 0.0 && !delay.is_zero() => {
                let spread = delay.as_secs_f64() * fraction;
                let offset = rand::thread_rng().gen_range(-spread..=spread);
                Duration::try_from_secs_f64((delay.as_secs_f64() + offset).max(0.0))
                    .map_or(self.max_delay, |jittered| jittered.min(self.max_delay))
            }
            _ => delay,
        }
    }

    /// Run `operation` until it succeeds, fails with a non-retryable error,
    /// or runs out of attempts. The last error is returned.
    pub async fn run<F, Fut, T>(&self, mut operation: F) -> Result<T, FileSearchError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, FileSearchError>>,
    {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 0;
        loop {
            let error = match operation().await {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };
            attempt += 1;
            if attempt >= attempts || !self.should_retry(&error) {
                return Err(error);
            }
            let delay = self.delay_for(attempt - 1);
            tracing::debug!(attempt, delay_ms = delay.as_millis() as u64, err = %error, "retrying request");
            tokio::time::sleep(delay).await;
        }
    }
}
