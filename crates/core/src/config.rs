//! Client configuration
//!
//! Sources, later ones winning: built-in defaults, an optional config file,
//! then `STOCKROOM_*` environment variables (`__` separates sections, so
//! `STOCKROOM_API__BASE_URL` sets `api.base_url`).

use crate::error::ConfigError;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "STOCKROOM";

/// Top-level client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Backend API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Directory holding the durable token slot
    pub data_dir: PathBuf,
}

/// Backend API configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to. Required.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Request timeout in seconds. Unset means requests wait indefinitely.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl ApiConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            data_dir: default_data_dir(),
        }
    }
}

/// Platform data directory for stockroom, or `./data` if none can be found
pub fn default_data_dir() -> PathBuf {
    match ProjectDirs::from("com", "Stockroom", "stockroom") {
        Some(dirs) => dirs.data_dir().to_path_buf(),
        None => {
            warn!("Failed to determine platform-specific directories, using ./data");
            PathBuf::from("./data")
        }
    }
}

/// `STOCKROOM_*` environment source with `__` section separators
pub fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

impl ClientConfig {
    /// Load configuration from defaults, an optional file and the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingBaseUrl`] if no non-empty base URL is
    /// configured, or [`ConfigError::Invalid`] if a source cannot be parsed.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with(file, environment())
    }

    /// Load with an explicit environment source
    pub fn load_with(
        file: Option<&Path>,
        environment: config::Environment,
    ) -> Result<Self, ConfigError> {
        Self::read_with(file, environment)?.validate()
    }

    /// Merge defaults, the file and the environment without validating, so
    /// callers can layer further overrides before [`ClientConfig::validate`]
    pub fn read(file: Option<&Path>) -> Result<Self, ConfigError> {
        Self::read_with(file, environment())
    }

    pub fn read_with(
        file: Option<&Path>,
        environment: config::Environment,
    ) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let mut builder = config::Config::builder()
            .set_default("data_dir", defaults.data_dir.to_string_lossy().to_string())?;

        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path));
        }

        let settings = builder.add_source(environment).build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Reject configurations that cannot reach a backend
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        let base_url = self
            .api
            .base_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::MissingBaseUrl)?
            .to_string();
        self.api.base_url = Some(base_url);
        Ok(self)
    }

    /// The validated base URL
    pub fn base_url(&self) -> &str {
        self.api.base_url.as_deref().unwrap_or_default()
    }
}
