use std::panic::Location;
use std::sync::Arc;
use std::time::Duration;

use error_location::ErrorLocation;
use thiserror::Error;

/// Errors surfaced by the session core
#[derive(Error, Debug)]
pub enum ClientError {
    /// No stored credentials. Callers should show the login screen.
    #[error("Not authenticated: {message} {location}")]
    NotAuthenticated {
        message: String,
        location: ErrorLocation,
    },

    /// Credentials were rejected; local auth state has been cleared.
    #[error("Authentication failed: {message} {location}")]
    AuthenticationFailed {
        message: String,
        location: ErrorLocation,
    },

    #[error("HTTP request error: {message} {location}")]
    Http {
        message: String,
        location: ErrorLocation,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {endpoint} timed out after {timeout:?} {location}")]
    Timeout {
        endpoint: String,
        timeout: Duration,
        location: ErrorLocation,
    },

    #[error("API error: {message} (status: {status}, code: {code}) {location}")]
    Api {
        status: u16,
        code: String,
        message: String,
        location: ErrorLocation,
    },

    #[error("JSON error: {message} {location}")]
    Json {
        message: String,
        location: ErrorLocation,
        #[source]
        source: serde_json::Error,
    },

    #[error("Storage error for '{key}': {message} {location}")]
    Storage {
        key: String,
        message: String,
        location: ErrorLocation,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Invalid {field}: {message} {location}")]
    Validation {
        field: String,
        message: String,
        location: ErrorLocation,
    },

    #[error("Configuration error: {source} {location}")]
    Config {
        location: ErrorLocation,
        #[source]
        source: st_config::ConfigError,
    },

    /// Error fanned out to every caller awaiting the same token refresh
    #[error(transparent)]
    Shared(Arc<ClientError>),
}

impl ClientError {
    #[track_caller]
    pub fn not_authenticated(message: impl Into<String>) -> Self {
        Self::NotAuthenticated {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn authentication_failed(message: impl Into<String>) -> Self {
        Self::AuthenticationFailed {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn timeout(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self::Timeout {
            endpoint: endpoint.into(),
            timeout,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn api(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            code: code.into(),
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn storage(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Storage {
            key: key.into(),
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
            source: None,
        }
    }

    #[track_caller]
    pub fn storage_io(key: impl Into<String>, message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Storage {
            key: key.into(),
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
            source: Some(source),
        }
    }

    #[track_caller]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Unwrap errors shared between refresh waiters.
    pub fn root(&self) -> &ClientError {
        match self {
            Self::Shared(inner) => inner.root(),
            other => other,
        }
    }

    /// HTTP status of a gateway error response, if any.
    pub fn status(&self) -> Option<u16> {
        match self.root() {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Credentials are missing or were rejected; the user must log in again.
    pub fn is_credential_failure(&self) -> bool {
        matches!(
            self.root(),
            Self::NotAuthenticated { .. } | Self::AuthenticationFailed { .. }
        )
    }

    /// Worth retrying later without user action (network, timeout, 5xx, 408, 429).
    pub fn is_transient(&self) -> bool {
        match self.root() {
            Self::Http { .. } | Self::Timeout { .. } => true,
            Self::Api { status, .. } => *status >= 500 || *status == 408 || *status == 429,
            _ => false,
        }
    }

    /// Convert reqwest error with context
    #[track_caller]
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        ClientError::Http {
            message: err.to_string(),
            location: ErrorLocation::from(Location::caller()),
            source: err,
        }
    }

    /// Convert JSON error with context
    #[track_caller]
    pub fn from_json(err: serde_json::Error) -> Self {
        ClientError::Json {
            message: err.to_string(),
            location: ErrorLocation::from(Location::caller()),
            source: err,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        ClientError::from_reqwest(err)
    }
}

impl From<serde_json::Error> for ClientError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        ClientError::from_json(err)
    }
}

impl From<st_config::ConfigError> for ClientError {
    #[track_caller]
    fn from(source: st_config::ConfigError) -> Self {
        ClientError::Config {
            location: ErrorLocation::from(Location::caller()),
            source,
        }
    }
}

impl From<Arc<ClientError>> for ClientError {
    fn from(shared: Arc<ClientError>) -> Self {
        Arc::try_unwrap(shared).unwrap_or_else(ClientError::Shared)
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
