//! Error types shared by the session, navigation and configuration layers

use std::path::PathBuf;

/// Errors raised while mutating the session store
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Refusing to store an empty or blank token")]
    EmptyToken,

    #[error("Token storage failed at {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SessionError {
    /// Create a storage error for the given slot path
    pub fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }
}

/// Errors raised while resolving a navigation target
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    #[error("No route matches {0}")]
    UnknownRoute(String),
}

/// Errors raised while loading client configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("api.base_url is not set; export STOCKROOM_API__BASE_URL or add it to the config file")]
    MissingBaseUrl,

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] config::ConfigError),
}

pub type SessionResult<T> = std::result::Result<T, SessionError>;
