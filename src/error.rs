//! Error types for persistence and configuration

use thiserror::Error;

/// Result type for persistence operations
pub type SyncResult<T> = Result<T, SyncError>;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Failures surfaced by `fetch`/`save` and the persistence collaborators
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyncError {
    #[error("Record has no identifier to fetch by")]
    MissingId,

    #[error("Record {id} not found")]
    NotFound { id: u64 },

    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Request timed out")]
    Timeout,

    #[error("Server returned status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Invalid response: {details}")]
    InvalidResponse { details: String },

    #[error("Persistence configuration error: {message}")]
    Configuration { message: String },
}

impl SyncError {
    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        SyncError::Network {
            message: message.into(),
        }
    }

    /// Create an unexpected status error
    pub fn status(url: impl Into<String>, status: u16) -> Self {
        SyncError::Status {
            url: url.into(),
            status,
        }
    }

    /// Create an invalid response error
    pub fn invalid_response(details: impl Into<String>) -> Self {
        SyncError::InvalidResponse {
            details: details.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        SyncError::Configuration {
            message: message.into(),
        }
    }

    /// Check if retrying the same request could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            SyncError::Network { .. } | SyncError::Timeout => true,
            SyncError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SyncError::Timeout
        } else if err.is_decode() {
            SyncError::invalid_response(err.to_string())
        } else {
            SyncError::network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::invalid_response(format!("Record does not match the expected shape: {}", err))
    }
}

impl From<url::ParseError> for SyncError {
    fn from(err: url::ParseError) -> Self {
        SyncError::configuration(format!("Invalid base URL: {}", err))
    }
}

/// Failures while loading, validating or writing the configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write config {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Create a validation error
    pub fn invalid(message: impl Into<String>) -> Self {
        ConfigError::Invalid(message.into())
    }
}
