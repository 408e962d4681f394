use crate::{
    ApiConfig, CONFIG_DIR_ENV, CONFIG_FILE_NAME, ClientConfig, ConfigError, ConfigErrorResult,
    DEFAULT_CONFIG_DIR_NAME, LoggingConfig, SaveQueueConfig, SessionConfig, StorageConfig,
};

use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub client: ClientConfig,
    pub session: SessionConfig,
    pub save_queue: SaveQueueConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load config.
    ///
    /// Loading order:
    /// 1. Check for STORY_CONFIG_DIR env var, else use ./.story/
    /// 2. Auto-create config directory if it doesn't exist
    /// 3. Load config.toml if it exists, else use defaults
    /// 4. Apply STORY_* environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_dir = Self::config_dir()?;

        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::Io {
                path: config_dir.clone(),
                source: e,
            })?;
        }

        let config_path = config_dir.join(CONFIG_FILE_NAME);

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    fn load_toml(path: &Path) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the config directory.
    /// Priority: STORY_CONFIG_DIR env var > ./.story/ (relative to cwd)
    pub fn config_dir() -> ConfigErrorResult<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::config("Cannot determine current working directory"))?;
        Ok(cwd.join(DEFAULT_CONFIG_DIR_NAME))
    }

    /// Validate all configuration.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.api.validate()?;
        self.client.validate()?;
        self.session.validate()?;
        self.save_queue.validate()?;
        self.storage.validate()?;
        Ok(())
    }

    /// Absolute path of the durable storage directory.
    pub fn storage_path(&self) -> ConfigErrorResult<PathBuf> {
        Ok(Self::config_dir()?.join(&self.storage.dir))
    }

    /// Absolute path of the log file, if file logging is configured.
    pub fn log_file_path(&self) -> ConfigErrorResult<Option<PathBuf>> {
        match self.logging.file {
            Some(ref file) => Ok(Some(
                Self::config_dir()?.join(&self.logging.dir).join(file),
            )),
            None => Ok(None),
        }
    }

    /// Device id for the `X-Device-ID` header.
    pub fn device_id(&self) -> ConfigErrorResult<String> {
        self.client.resolve_device_id(&Self::config_dir()?)
    }

    /// Log configuration summary (never logs tokens).
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!(
            "  api: {} (timeout {}s)",
            self.api.base_url, self.api.timeout_secs
        );
        info!(
            "  client: platform={}, version={}",
            self.client.platform, self.client.version
        );
        info!(
            "  session: refresh buffer={}s",
            self.session.refresh_buffer_secs
        );
        info!(
            "  save_queue: retries={}, initial={}ms, max={}s",
            self.save_queue.max_retries,
            self.save_queue.initial_delay_ms,
            self.save_queue.max_delay_secs
        );
        info!("  storage: {}", self.storage.dir);
        info!(
            "  logging: {} (colored: {})",
            self.logging.level, self.logging.colored
        );
    }

    fn apply_env_overrides(&mut self) {
        // Api
        Self::apply_env_string("STORY_API_BASE_URL", &mut self.api.base_url);
        Self::apply_env_parse("STORY_API_TIMEOUT_SECS", &mut self.api.timeout_secs);

        // Client
        Self::apply_env_string("STORY_CLIENT_PLATFORM", &mut self.client.platform);
        Self::apply_env_string("STORY_CLIENT_VERSION", &mut self.client.version);
        Self::apply_env_option_string("STORY_DEVICE_ID", &mut self.client.device_id);

        // Session
        Self::apply_env_parse(
            "STORY_SESSION_REFRESH_BUFFER_SECS",
            &mut self.session.refresh_buffer_secs,
        );

        // Save queue
        Self::apply_env_parse(
            "STORY_SAVE_QUEUE_MAX_RETRIES",
            &mut self.save_queue.max_retries,
        );
        Self::apply_env_parse(
            "STORY_SAVE_QUEUE_INITIAL_DELAY_MS",
            &mut self.save_queue.initial_delay_ms,
        );
        Self::apply_env_parse(
            "STORY_SAVE_QUEUE_MAX_DELAY_SECS",
            &mut self.save_queue.max_delay_secs,
        );

        // Storage
        Self::apply_env_string("STORY_STORAGE_DIR", &mut self.storage.dir);

        // Logging
        Self::apply_env_parse("STORY_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_bool("STORY_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_option_string("STORY_LOG_FILE", &mut self.logging.file);
    }

    /// Helper: Apply environment variable override for String values
    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Helper: Apply environment variable override for bool values (accepts "true"/"1")
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Helper: Apply environment variable override for parseable values
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    /// Helper: Apply environment variable override for Option<String> values
    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }
}
