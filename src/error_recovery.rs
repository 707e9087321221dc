// src/error_recovery.rs
//! Retry with exponential backoff for catalog API operations.

use crate::constants::{REQUEST_TIMEOUT, RETRY_ATTEMPTS, RETRY_BASE_DELAY, RETRY_MAX_DELAY};
use crate::error::AppError;
use std::future::Future;
use std::time::Duration;

/// How a logical call is retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts including the first one. Zero behaves like one.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    /// Deadline for each individual attempt.
    pub attempt_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: RETRY_ATTEMPTS,
            base_delay: RETRY_BASE_DELAY,
            max_delay: RETRY_MAX_DELAY,
            attempt_timeout: REQUEST_TIMEOUT,
        }
    }
}

impl RetryPolicy {
    /// Delay after the failed attempt with zero-based index `attempt`:
    /// `min(base_delay * 2^attempt, max_delay)`.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        1u32.checked_shl(attempt)
            .and_then(|factor| self.base_delay.checked_mul(factor))
            .map_or(self.max_delay, |delay| delay.min(self.max_delay))
    }
}

/// Retries an async operation with exponential backoff.
///
/// Each attempt runs under `policy.attempt_timeout`. Failures that are not
/// retryable (auth, other 4xx, malformed responses) are returned after the
/// attempt that produced them; transient failures are retried until the
/// attempt budget runs out, and then the last error is returned.
pub async fn retry_with_backoff<F, T, Fut>(
    policy: &RetryPolicy,
    operation: &str,
    mut attempt_fn: F,
) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0u32;

    loop {
        attempt += 1;
        let outcome = match tokio::time::timeout(policy.attempt_timeout, attempt_fn()).await {
            Ok(result) => result,
            Err(_) => Err(AppError::Timeout {
                operation: operation.to_string(),
            }),
        };

        let error = match outcome {
            Ok(value) => {
                if attempt > 1 {
                    log::info!("{} succeeded on attempt {}", operation, attempt);
                }
                return Ok(value);
            }
            Err(error) => error,
        };

        if error.is_auth_failure() {
            log::error!("{} rejected credentials: {}", operation, error);
            return Err(error);
        }

        if !error.is_retryable() {
            log::debug!("{} failed without retry: {}", operation, error);
            return Err(error);
        }

        if attempt >= max_attempts {
            log::warn!(
                "{} failed after {} attempts: {}",
                operation,
                attempt,
                error
            );
            return Err(error);
        }

        let delay = policy.backoff_delay(attempt - 1);
        log::warn!(
            "Attempt {} of {} failed ({}), retrying after {:?}",
            attempt,
            operation,
            error,
            delay
        );
        tokio::time::sleep(delay).await;
    }
}
