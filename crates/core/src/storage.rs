//! Durable token slot backends
//!
//! The session store keeps exactly one durable value: the current bearer
//! token as plain text. Backends are synchronous and last-write-wins.

use crate::error::{SessionError, SessionResult};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

/// File name of the token slot inside the data directory
pub const TOKEN_FILE_NAME: &str = "token";

/// A single durable key-value slot holding the bearer token
pub trait TokenStorage: Send + Sync {
    /// Read the stored token, `None` when the slot is empty
    fn load(&self) -> SessionResult<Option<String>>;

    /// Replace the stored token
    fn save(&self, token: &str) -> SessionResult<()>;

    /// Remove the stored token. Removing an empty slot succeeds.
    fn remove(&self) -> SessionResult<()>;
}

/// Token slot stored as a plain-text file under the user's data directory
#[derive(Debug, Clone)]
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    /// Use `<data_dir>/token` as the slot
    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(TOKEN_FILE_NAME),
        }
    }

    /// Use an explicit file path as the slot
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the slot path
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| TOKEN_FILE_NAME.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl TokenStorage for FileTokenStorage {
    fn load(&self) -> SessionResult<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                // Only the line ending an editor may add; the token itself is kept verbatim
                let token = contents
                    .strip_suffix('\n')
                    .map_or(contents.as_str(), |t| t.strip_suffix('\r').unwrap_or(t));
                Ok((!token.trim().is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SessionError::storage(&self.path, e)),
        }
    }

    fn save(&self, token: &str) -> SessionResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| SessionError::storage(parent, e))?;
        }

        // Write then rename so a crash never leaves a truncated token behind
        let temp = self.temp_path();
        std::fs::write(&temp, token).map_err(|e| SessionError::storage(&temp, e))?;
        std::fs::rename(&temp, &self.path).map_err(|e| SessionError::storage(&self.path, e))?;

        debug!("Persisted token to {}", self.path.display());
        Ok(())
    }

    fn remove(&self) -> SessionResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("Removed token file {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SessionError::storage(&self.path, e)),
        }
    }
}

/// In-process token slot, used for tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryTokenStorage {
    slot: Mutex<Option<String>>,
}

impl MemoryTokenStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a token already in the slot, as if persisted by a previous run
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(token.into())),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.slot
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl TokenStorage for MemoryTokenStorage {
    fn load(&self) -> SessionResult<Option<String>> {
        Ok(self.slot().clone())
    }

    fn save(&self, token: &str) -> SessionResult<()> {
        *self.slot() = Some(token.to_string());
        Ok(())
    }

    fn remove(&self) -> SessionResult<()> {
        *self.slot() = None;
        Ok(())
    }
}
