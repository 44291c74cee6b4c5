//! File-backed and in-memory credential stores.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use skinmorph_common::{Error, Identity, Result};
use tracing::{debug, info, warn};

const CREDENTIALS_FILE: &str = "credentials.json";

/// Persisted sign-in snapshot: identity, role, and token live or die
/// together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredCredentials {
    /// The authenticated user, role included.
    pub user: Identity,

    /// Opaque bearer token issued at sign-in.
    pub access_token: String,

    /// When the snapshot was written.
    pub saved_at: DateTime<Utc>,
}

/// Storage contract for the current sign-in state.
///
/// The session controller is the only writer; everything else reads.
/// Implementations must replace or remove the whole snapshot in one step,
/// leaving no partial state behind.
pub trait CredentialStore: Send + Sync {
    /// Persist identity and token together, replacing any previous snapshot.
    fn save(&self, user: &Identity, access_token: &str) -> Result<()>;

    /// Read the current snapshot, if any.
    fn load(&self) -> Result<Option<StoredCredentials>>;

    /// Remove the snapshot. Idempotent.
    fn clear(&self) -> Result<()>;
}

/// Resolve the client state directory, honouring `SKINMORPH_STATE_DIR`.
pub fn default_state_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("SKINMORPH_STATE_DIR") {
        return PathBuf::from(dir);
    }
    match std::env::var("HOME") {
        Ok(home) => Path::new(&home).join(".skinmorph"),
        Err(_) => PathBuf::from(".skinmorph"),
    }
}

/// File-backed store, durable across process restarts on this installation.
/// Not shared across devices.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        Ok(Self {
            path: dir.join(CREDENTIALS_FILE),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileStore {
    fn save(&self, user: &Identity, access_token: &str) -> Result<()> {
        let snapshot = StoredCredentials {
            user: user.clone(),
            access_token: access_token.to_string(),
            saved_at: Utc::now(),
        };
        let json = serde_json::to_vec_pretty(&snapshot)?;

        // Write the whole snapshot to a sibling temp file and rename it
        // into place, so a concurrent reader sees either the old snapshot
        // or the new one, never a torn write.
        let dir = self.path.parent().ok_or_else(|| {
            Error::Store("credential path has no parent directory".to_string())
        })?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(&json)?;
        tmp.persist(&self.path)
            .map_err(|e| Error::Store(format!("failed to persist credentials: {}", e)))?;

        info!("Saved credentials for {} ({})", user.name, user.role);
        Ok(())
    }

    fn load(&self) -> Result<Option<StoredCredentials>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_slice(&bytes) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) => {
                // A torn or hand-edited file must not wedge sign-in; treat
                // it as signed out and let the next save overwrite it.
                warn!("Discarding unreadable credential file: {}", e);
                Ok(None)
            }
        }
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("Cleared credential file");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Option<StoredCredentials>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Option<StoredCredentials>> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl CredentialStore for MemoryStore {
    fn save(&self, user: &Identity, access_token: &str) -> Result<()> {
        *self.lock() = Some(StoredCredentials {
            user: user.clone(),
            access_token: access_token.to_string(),
            saved_at: Utc::now(),
        });
        Ok(())
    }

    fn load(&self) -> Result<Option<StoredCredentials>> {
        Ok(self.lock().clone())
    }

    fn clear(&self) -> Result<()> {
        *self.lock() = None;
        Ok(())
    }
}
