//! Bearer token storage.
//!
//! The token is read per request and never refreshed automatically; a
//! rejected token surfaces as an HTTP 401 like any other failure.

use crate::error::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use tracing::debug;

/// Where the session's bearer token lives.
pub trait TokenStore: Send + Sync {
    /// Current token, if signed in.
    fn token(&self) -> Option<String>;

    /// Replaces the stored token.
    fn set_token(&self, token: &str) -> ApiResult<()>;

    /// Forgets the stored token.
    fn clear(&self) -> ApiResult<()>;
}

/// Process-local token storage.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `token`.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_token(&self, token: &str) -> ApiResult<()> {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> ApiResult<()> {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct TokenFile {
    token: Option<String>,
}

/// Token storage persisted as a small JSON file, so a session survives
/// restarts of the client.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    cached: RwLock<Option<String>>,
}

impl FileTokenStore {
    /// Opens the store at `path`. A missing file means "signed out".
    pub fn open(path: impl Into<PathBuf>) -> ApiResult<Self> {
        let path = path.into();
        let token = match std::fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => None,
            Ok(raw) => serde_json::from_str::<TokenFile>(&raw)
                .map_err(|e| ApiError::Storage(format!("corrupt token file {}: {e}", path.display())))?
                .token,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                return Err(ApiError::Storage(format!(
                    "cannot read token file {}: {e}",
                    path.display()
                )));
            }
        };
        debug!("Opened token store at {:?} (signed in: {})", path, token.is_some());
        Ok(Self {
            path,
            cached: RwLock::new(token),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, token: Option<&str>) -> ApiResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| ApiError::Storage(format!("cannot create {}: {e}", parent.display())))?;
        }
        let body = serde_json::to_string(&TokenFile {
            token: token.map(str::to_string),
        })?;
        std::fs::write(&self.path, body).map_err(|e| {
            ApiError::Storage(format!("cannot write token file {}: {e}", self.path.display()))
        })
    }
}

impl TokenStore for FileTokenStore {
    fn token(&self) -> Option<String> {
        self.cached
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_token(&self, token: &str) -> ApiResult<()> {
        self.persist(Some(token))?;
        *self.cached.write().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> ApiResult<()> {
        self.persist(None)?;
        *self.cached.write().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}
