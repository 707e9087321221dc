// src/api/rate_limiter.rs
//! Sliding-window rate limiting keyed by operation.
//!
//! Each key keeps the timestamps of its granted calls inside the trailing
//! window. Expired timestamps are pruned when the key is next checked, so
//! idle keys cost nothing beyond their last window.

use crate::constants::{RATE_LIMIT_INTERVAL, RATE_LIMIT_MAX_CALLS};
use crate::error::AppError;
use dashmap::DashMap;
use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::Instant;

/// At most `max_calls` per key within any trailing `interval`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub max_calls: usize,
    pub interval: Duration,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            max_calls: RATE_LIMIT_MAX_CALLS,
            interval: RATE_LIMIT_INTERVAL,
        }
    }
}

#[derive(Debug)]
pub struct SlidingWindowLimiter {
    policy: RateLimitPolicy,
    windows: DashMap<String, VecDeque<Instant>>,
}

impl SlidingWindowLimiter {
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self {
            policy,
            windows: DashMap::new(),
        }
    }

    pub fn policy(&self) -> RateLimitPolicy {
        self.policy
    }

    /// Grants one call for `key` or fails with `RateLimitExceeded`.
    ///
    /// The prune, count and append happen under the key's shard lock, so
    /// concurrent callers cannot both take the last slot.
    pub fn try_acquire(&self, key: &str) -> Result<(), AppError> {
        let now = Instant::now();
        let mut window = self.windows.entry(key.to_owned()).or_default();
        prune(&mut window, now, self.policy.interval);

        if window.len() >= self.policy.max_calls {
            log::warn!(
                "Rate limit hit for {}: {} calls in the last {:?}",
                key,
                window.len(),
                self.policy.interval
            );
            return Err(AppError::RateLimitExceeded {
                operation: key.to_string(),
                limit: self.policy.max_calls,
                interval: self.policy.interval,
            });
        }

        window.push_back(now);
        Ok(())
    }

    /// Calls granted for `key` within the current window.
    pub fn recent_calls(&self, key: &str) -> usize {
        let now = Instant::now();
        match self.windows.get_mut(key) {
            Some(mut window) => {
                prune(&mut window, now, self.policy.interval);
                window.len()
            }
            None => 0,
        }
    }
}

impl Default for SlidingWindowLimiter {
    fn default() -> Self {
        Self::new(RateLimitPolicy::default())
    }
}

fn prune(window: &mut VecDeque<Instant>, now: Instant, interval: Duration) {
    while let Some(oldest) = window.front() {
        if now.duration_since(*oldest) >= interval {
            window.pop_front();
        } else {
            break;
        }
    }
}
