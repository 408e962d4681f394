use crate::ClientError;

use std::time::Duration;

use st_config::SaveQueueConfig;

/// Backoff schedule for the save queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Failed attempts after which an entry is abandoned
    pub max_retries: u32,
    /// Delay after the first failure
    pub initial_delay: Duration,
    /// Upper bound for any single delay
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&SaveQueueConfig::default())
    }
}

impl From<&SaveQueueConfig> for RetryPolicy {
    fn from(config: &SaveQueueConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            initial_delay: config.initial_delay(),
            max_delay: config.max_delay(),
        }
    }
}

impl RetryPolicy {
    pub fn delay_for(&self, retry_count: u32) -> Duration {
        retry_delay(self.initial_delay, self.max_delay, retry_count)
    }

    pub fn is_exhausted(&self, retry_count: u32) -> bool {
        retry_count >= self.max_retries
    }
}

/// `initial * 2^(retry_count - 1)`, capped at `max`.
///
/// A retry count of 0 is treated like 1.
pub fn retry_delay(initial: Duration, max: Duration, retry_count: u32) -> Duration {
    let exponent = retry_count.saturating_sub(1).min(31);
    initial.saturating_mul(1u32 << exponent).min(max)
}

/// Whether a failed push should consume a retry.
///
/// Errors that are not retryable park the entry until the user logs in
/// again instead of burning attempts.
pub trait IsRetryable {
    fn is_retryable(&self) -> bool;
}

impl IsRetryable for ClientError {
    fn is_retryable(&self) -> bool {
        !self.is_credential_failure()
    }
}
