//! Session context shared by every request.
//!
//! Holds the bearer token in memory and mirrors it to a single-line file so
//! the user stays signed in across runs. Clones share the same token.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use area_core::prelude::*;

/// File name of the persisted token inside the data directory.
pub const SESSION_FILE: &str = "session";

#[derive(Clone, Default)]
pub struct Session {
    token: Arc<RwLock<Option<String>>>,
    path: Option<PathBuf>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .field("path", &self.path)
            .finish()
    }
}

impl Session {
    /// A session that is never written to disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load the token persisted at `path`, if any.
    ///
    /// A missing or unreadable file yields a signed-out session bound to
    /// `path`.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let token = match std::fs::read_to_string(&path) {
            Ok(content) => {
                let token = content.trim().to_string();
                (!token.is_empty()).then_some(token)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!("Failed to read session file {}: {}", path.display(), e);
                None
            }
        };
        debug!(
            "Session loaded from {} (authenticated: {})",
            path.display(),
            token.is_some()
        );
        Self {
            token: Arc::new(RwLock::new(token)),
            path: Some(path),
        }
    }

    /// Default token file under the platform data directory.
    pub fn default_path() -> PathBuf {
        area_core::logging::data_directory().join(SESSION_FILE)
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Store a new token and persist it.
    pub fn set_token(&self, token: impl Into<String>) -> Result<()> {
        let token = token.into();
        {
            let mut guard = self.token.write().unwrap_or_else(|e| e.into_inner());
            *guard = Some(token.clone());
        }
        if let Some(path) = &self.path {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, token)?;
        }
        info!("Session token stored");
        Ok(())
    }

    /// Forget the token in memory and on disk.
    ///
    /// Requests already in flight keep the token they were built with.
    pub fn clear(&self) -> Result<()> {
        {
            let mut guard = self.token.write().unwrap_or_else(|e| e.into_inner());
            *guard = None;
        }
        if let Some(path) = &self.path {
            match std::fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        info!("Session token cleared");
        Ok(())
    }
}
