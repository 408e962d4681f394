mod api_config;
mod client_config;
mod config;
mod error;
mod log_level;
mod logging_config;
mod save_queue_config;
mod session_config;
mod storage_config;

#[cfg(test)]
mod tests;

pub use api_config::ApiConfig;
pub use client_config::ClientConfig;
pub use config::Config;
pub use error::{ConfigError, ConfigErrorResult};
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use save_queue_config::SaveQueueConfig;
pub use session_config::SessionConfig;
pub use storage_config::StorageConfig;

const CONFIG_DIR_ENV: &str = "STORY_CONFIG_DIR";
const DEFAULT_CONFIG_DIR_NAME: &str = ".story";
const CONFIG_FILE_NAME: &str = "config.toml";
const DEVICE_ID_FILE_NAME: &str = "device_id";

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const MIN_TIMEOUT_SECS: u64 = 1;
const MAX_TIMEOUT_SECS: u64 = 300;

const DEFAULT_CLIENT_PLATFORM: &str = std::env::consts::OS;
const DEFAULT_CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_STORAGE_DIRECTORY: &str = "data";

const DEFAULT_LOG_LEVEL_STRING: &str = "info";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_DIRECTORY: &str = "log";
const DEFAULT_LOG_COLORED: bool = true;
