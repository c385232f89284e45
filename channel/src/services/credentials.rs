//! # Credential Stores
//!
//! Implementations of [`TokenStore`]:
//!
//! - [`MemoryTokenStore`]: process-local, used by tests and short-lived tools
//! - [`FileTokenStore`]: JSON file on disk, so a login survives a restart
//!
//! The store is created once and handed to both the REST client (bearer
//! injection, 401 clearing) and the session bridge (login/logout).

use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::core::service::TokenStore;

/// Token held in memory only
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn token(&self) -> Option<String> {
        self.token.read().clone()
    }

    fn set_token(&self, token: &str) {
        *self.token.write() = Some(token.to_string());
    }

    fn clear(&self) -> Option<String> {
        self.token.write().take()
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedToken {
    token: String,
}

/// Token persisted as `{"token": "..."}` in a JSON file.
///
/// The file is read once on open and written through on every change.
/// Write failures are logged; the in-memory copy stays authoritative.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    cached: RwLock<Option<String>>,
}

impl FileTokenStore {
    /// Open (or lazily create) the token file at `path`
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let cached = Self::read_file(&path);
        tracing::debug!(path = %path.display(), has_token = cached.is_some(), "Opened token store");
        Self {
            path,
            cached: RwLock::new(cached),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(path: &Path) -> Option<String> {
        let content = std::fs::read_to_string(path).ok()?;
        match serde_json::from_str::<PersistedToken>(&content) {
            Ok(persisted) if !persisted.token.is_empty() => Some(persisted.token),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable token file");
                None
            }
        }
    }

    fn write_file(&self, token: &str) {
        let result = (|| -> std::io::Result<()> {
            if let Some(parent) = self.path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            let content = serde_json::to_string(&PersistedToken {
                token: token.to_string(),
            })?;
            std::fs::write(&self.path, content)
        })();

        if let Err(e) = result {
            tracing::error!(path = %self.path.display(), error = %e, "Failed to persist token");
        }
    }

    fn remove_file(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::error!(path = %self.path.display(), error = %e, "Failed to remove token file");
            }
        }
    }
}

impl TokenStore for FileTokenStore {
    fn token(&self) -> Option<String> {
        self.cached.read().clone()
    }

    fn set_token(&self, token: &str) {
        let mut cached = self.cached.write();
        *cached = Some(token.to_string());
        self.write_file(token);
    }

    fn clear(&self) -> Option<String> {
        let mut cached = self.cached.write();
        let previous = cached.take();
        if previous.is_some() {
            self.remove_file();
        }
        previous
    }
}
