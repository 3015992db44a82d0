//! Session/Identity Holder - Persists who is logged in across restarts.
//!
//! Only the user id and the token pair are stored. The full user record is always
//! reloaded from the gateway on startup.

use crate::{
    errors::{Error, Result},
    models::AuthTokens,
};
use serde::{Deserialize, Serialize};
use std::{
    path::{Path, PathBuf},
    sync::{PoisonError, RwLock},
};
use tracing::debug;

/// Persisted identity of the current user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredIdentity {
    pub user_id: i64,
    pub tokens: Option<AuthTokens>,
}

/// Storage for the current identity.
pub trait IdentityStore {
    /// The saved identity, if any.
    fn load(&self) -> Result<Option<StoredIdentity>>;
    /// Replaces the saved identity.
    fn save(&self, identity: &StoredIdentity) -> Result<()>;
    /// Forgets the saved identity. Clearing an empty store succeeds.
    fn clear(&self) -> Result<()>;
}

/// Identity kept in a TOML file.
#[derive(Debug, Clone)]
pub struct FileIdentityStore {
    path: PathBuf,
}

impl FileIdentityStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl IdentityStore for FileIdentityStore {
    fn load(&self) -> Result<Option<StoredIdentity>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.path)?;
        toml::from_str(&contents)
            .map(Some)
            .map_err(|e| Error::Config {
                message: format!("Failed to parse identity file {:?}: {e}", self.path),
            })
    }

    fn save(&self, identity: &StoredIdentity) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string(identity).map_err(|e| Error::Config {
            message: format!("Failed to serialize identity: {e}"),
        })?;
        std::fs::write(&self.path, contents)?;
        debug!("Saved identity for user {} to {:?}", identity.user_id, self.path);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Identity kept in memory only; forgotten when the process exits.
#[derive(Debug, Default)]
pub struct MemoryIdentityStore {
    identity: RwLock<Option<StoredIdentity>>,
}

impl IdentityStore for MemoryIdentityStore {
    fn load(&self) -> Result<Option<StoredIdentity>> {
        Ok(self
            .identity
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, identity: &StoredIdentity) -> Result<()> {
        *self
            .identity
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(identity.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self
            .identity
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}
