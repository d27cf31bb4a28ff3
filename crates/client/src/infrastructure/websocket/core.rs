//! Platform-agnostic reconnection logic for the chat socket.
//!
//! Free of any runtime dependency so the math can be tested directly.

use std::time::Duration;

pub const INITIAL_RETRY_DELAY: Duration = Duration::from_millis(1_000);
pub const MAX_RETRY_DELAY: Duration = Duration::from_millis(30_000);
pub const BACKOFF_MULTIPLIER: f64 = 2.0;
/// Floor for any retry delay
pub const MIN_RETRY_DELAY: Duration = Duration::from_millis(1);

/// Reconnect policy for the socket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackoffPolicy {
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: f64,
    /// `None` retries forever
    pub max_attempts: Option<u32>,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            initial_delay: INITIAL_RETRY_DELAY,
            max_delay: MAX_RETRY_DELAY,
            multiplier: BACKOFF_MULTIPLIER,
            max_attempts: None,
        }
    }
}

/// Exponential backoff state for one run of consecutive failures.
#[derive(Debug, Clone, Copy)]
pub struct BackoffState {
    policy: BackoffPolicy,
    attempts: u32,
    delay: Duration,
}

impl BackoffState {
    pub fn new(policy: BackoffPolicy) -> Self {
        Self {
            policy,
            attempts: 0,
            delay: policy.initial_delay.max(MIN_RETRY_DELAY),
        }
    }

    /// Called after a connection was established.
    pub fn reset(&mut self) {
        *self = Self::new(self.policy);
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn is_exhausted(&self) -> bool {
        self.policy
            .max_attempts
            .is_some_and(|max| self.attempts >= max)
    }

    /// Advance to the next attempt, updating the delay for the subsequent attempt.
    ///
    /// Returns the delay to wait *before* performing this attempt.
    pub fn next_delay_and_advance(&mut self) -> Option<Duration> {
        if self.is_exhausted() {
            return None;
        }

        let current_delay = self.delay;
        self.attempts += 1;
        self.delay = self
            .delay
            .mul_f64(self.policy.multiplier)
            .min(self.policy.max_delay)
            .max(MIN_RETRY_DELAY);
        Some(current_delay)
    }
}
