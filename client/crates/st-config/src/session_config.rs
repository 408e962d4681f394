use crate::{ConfigError, ConfigErrorResult};

use std::time::Duration;

use serde::Deserialize;

pub const MIN_REFRESH_BUFFER_SECS: u64 = 0;
pub const MAX_REFRESH_BUFFER_SECS: u64 = 3600;
pub const DEFAULT_REFRESH_BUFFER_SECS: u64 = 300;

/// Token lifecycle settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Refresh proactively when the access token expires within this window
    pub refresh_buffer_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            refresh_buffer_secs: DEFAULT_REFRESH_BUFFER_SECS,
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if !(MIN_REFRESH_BUFFER_SECS..=MAX_REFRESH_BUFFER_SECS).contains(&self.refresh_buffer_secs)
        {
            return Err(ConfigError::session(format!(
                "session.refresh_buffer_secs must be {}-{}, got {}",
                MIN_REFRESH_BUFFER_SECS, MAX_REFRESH_BUFFER_SECS, self.refresh_buffer_secs
            )));
        }

        Ok(())
    }

    pub fn refresh_buffer(&self) -> Duration {
        Duration::from_secs(self.refresh_buffer_secs)
    }
}
