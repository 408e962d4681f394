use crate::{ConfigError, ConfigErrorResult};

use std::time::Duration;

use serde::Deserialize;

// Retry ceiling
pub const MIN_MAX_RETRIES: u32 = 1;
pub const MAX_MAX_RETRIES: u32 = 10;
pub const DEFAULT_MAX_RETRIES: u32 = 3;

pub const MIN_INITIAL_DELAY_MS: u64 = 10;
pub const MAX_INITIAL_DELAY_MS: u64 = 60_000;
pub const DEFAULT_INITIAL_DELAY_MS: u64 = 2000;

pub const MIN_MAX_DELAY_SECS: u64 = 1;
pub const MAX_MAX_DELAY_SECS: u64 = 3600;
pub const DEFAULT_MAX_DELAY_SECS: u64 = 300;

/// Offline save queue backoff configuration.
///
/// A failed save is retried after `initial_delay_ms * 2^(retry_count - 1)`,
/// capped at `max_delay_secs`. After `max_retries` failed attempts the
/// pending save is abandoned.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SaveQueueConfig {
    /// Failed attempts before a pending save is dropped
    pub max_retries: u32,
    /// Delay before the first retry in milliseconds
    pub initial_delay_ms: u64,
    /// Ceiling for any single backoff delay in seconds
    pub max_delay_secs: u64,
}

impl Default for SaveQueueConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_delay_ms: DEFAULT_INITIAL_DELAY_MS,
            max_delay_secs: DEFAULT_MAX_DELAY_SECS,
        }
    }
}

impl SaveQueueConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.max_retries < MIN_MAX_RETRIES || self.max_retries > MAX_MAX_RETRIES {
            return Err(ConfigError::save_queue(format!(
                "save_queue.max_retries must be {}-{}, got {}",
                MIN_MAX_RETRIES, MAX_MAX_RETRIES, self.max_retries
            )));
        }

        if self.initial_delay_ms < MIN_INITIAL_DELAY_MS
            || self.initial_delay_ms > MAX_INITIAL_DELAY_MS
        {
            return Err(ConfigError::save_queue(format!(
                "save_queue.initial_delay_ms must be {}-{}, got {}",
                MIN_INITIAL_DELAY_MS, MAX_INITIAL_DELAY_MS, self.initial_delay_ms
            )));
        }

        if self.max_delay_secs < MIN_MAX_DELAY_SECS || self.max_delay_secs > MAX_MAX_DELAY_SECS {
            return Err(ConfigError::save_queue(format!(
                "save_queue.max_delay_secs must be {}-{}, got {}",
                MIN_MAX_DELAY_SECS, MAX_MAX_DELAY_SECS, self.max_delay_secs
            )));
        }

        if Duration::from_millis(self.initial_delay_ms) > self.max_delay() {
            return Err(ConfigError::save_queue(
                "save_queue.initial_delay_ms cannot exceed save_queue.max_delay_secs",
            ));
        }

        Ok(())
    }

    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_secs(self.max_delay_secs)
    }
}
