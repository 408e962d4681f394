use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_CLIENT_PLATFORM, DEFAULT_CLIENT_VERSION,
    DEVICE_ID_FILE_NAME,
};

use std::path::Path;

use log::info;
use serde::Deserialize;
use uuid::Uuid;

const MAX_HEADER_VALUE_LENGTH: usize = 128;

/// Identification sent with every gateway call
/// (`X-Client-Platform`, `X-Client-Version`, `X-Device-ID`).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub platform: String,
    pub version: String,
    /// Fixed device id. When unset a generated id is persisted in the config dir.
    pub device_id: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            platform: String::from(DEFAULT_CLIENT_PLATFORM),
            version: String::from(DEFAULT_CLIENT_VERSION),
            device_id: None,
        }
    }
}

impl ClientConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        Self::validate_header_value("client.platform", &self.platform)?;
        Self::validate_header_value("client.version", &self.version)?;
        if let Some(ref device_id) = self.device_id
            && !device_id.is_empty()
        {
            Self::validate_header_value("client.device_id", device_id)?;
        }
        Ok(())
    }

    /// Resolve the device id.
    ///
    /// Priority: configured non-empty value > `device_id` file in `config_dir`
    /// > freshly generated UUID (written to the file for next time).
    pub fn resolve_device_id(&self, config_dir: &Path) -> ConfigErrorResult<String> {
        if let Some(ref id) = self.device_id
            && !id.trim().is_empty()
        {
            return Ok(id.trim().to_string());
        }

        let path = config_dir.join(DEVICE_ID_FILE_NAME);
        if path.exists() {
            let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io {
                path: path.clone(),
                source: e,
            })?;
            let id = contents.trim();
            if !id.is_empty() {
                return Ok(id.to_string());
            }
        }

        std::fs::create_dir_all(config_dir).map_err(|e| ConfigError::Io {
            path: config_dir.to_path_buf(),
            source: e,
        })?;

        let id = Uuid::new_v4().to_string();
        std::fs::write(&path, &id).map_err(|e| ConfigError::Io {
            path: path.clone(),
            source: e,
        })?;
        info!("Generated device id, stored at {}", path.display());

        Ok(id)
    }

    fn validate_header_value(field: &str, value: &str) -> ConfigErrorResult<()> {
        if value.trim().is_empty() {
            return Err(ConfigError::client(format!("{field} cannot be empty")));
        }
        if value.len() > MAX_HEADER_VALUE_LENGTH {
            return Err(ConfigError::client(format!(
                "{field} exceeds {MAX_HEADER_VALUE_LENGTH} characters"
            )));
        }
        if !value.chars().all(|c| c.is_ascii_graphic() || c == ' ') {
            return Err(ConfigError::client(format!(
                "{field} must be printable ASCII, got '{value}'"
            )));
        }
        Ok(())
    }
}
