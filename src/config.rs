//! Application configuration loaded from TOML

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/users";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub logging: LoggingConfig,
}

/// Where user records are fetched from and saved to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Collection URL; record URLs are `{base_url}/{id}`
    pub base_url: String,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log at debug level instead of info
    pub debug: bool,
}

impl AppConfig {
    /// `<config dir>/modelview/config.toml`, when the platform has one
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("modelview").join("config.toml"))
    }

    /// Load configuration from file, falling back to defaults when it is missing
    pub async fn load_from_file(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.display().to_string(),
                source,
            })?;

        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub async fn save_to_file(&self, path: &Path) -> ConfigResult<()> {
        self.validate()?;
        let content = toml::to_string_pretty(self)?;

        let write_error = |source| ConfigError::Write {
            path: path.display().to_string(),
            source,
        };
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(write_error)?;
        }
        tokio::fs::write(path, content).await.map_err(write_error)?;

        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let url = url::Url::parse(&self.api.base_url)
            .map_err(|e| ConfigError::invalid(format!("api.base_url: {}", e)))?;
        if url.cannot_be_a_base() {
            return Err(ConfigError::invalid("api.base_url must be a hierarchical URL"));
        }

        if self.api.request_timeout_secs == 0 {
            return Err(ConfigError::invalid(
                "api.request_timeout_secs must be greater than 0",
            ));
        }

        Ok(())
    }

    pub fn to_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
