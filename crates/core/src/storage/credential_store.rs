use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::RwLock;

use crate::errors::ClientError;

#[cfg(not(target_arch = "wasm32"))]
use super::format;
#[cfg(not(target_arch = "wasm32"))]
use std::path::{Path, PathBuf};

/// Fixed file name the credential is stored under.
pub const CREDENTIAL_FILE: &str = "credential.bin";

/// Holder of the single bearer token.
///
/// The session is authenticated exactly when `load()` returns a token.
/// No component other than the store persists the credential.
pub trait CredentialStore: Send + Sync {
    /// Replace the stored token.
    fn save(&self, token: &str) -> Result<(), ClientError>;

    /// The current token, or `None` when anonymous. Empty tokens count as absent.
    fn load(&self) -> Option<String>;

    /// Forget the token. Calling it on an empty store is fine.
    fn clear(&self) -> Result<(), ClientError>;

    fn is_authenticated(&self) -> bool {
        self.load().is_some()
    }
}

/// In-process store. Lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    token: RwLock<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start out authenticated with `token`.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn save(&self, token: &str) -> Result<(), ClientError> {
        let mut slot = self
            .token
            .write()
            .map_err(|_| ClientError::FileIO("Credential lock poisoned".into()))?;
        *slot = Some(token.to_string());
        Ok(())
    }

    fn load(&self) -> Option<String> {
        self.token
            .read()
            .ok()?
            .clone()
            .filter(|t| !t.is_empty())
    }

    fn clear(&self) -> Result<(), ClientError> {
        let mut slot = self
            .token
            .write()
            .map_err(|_| ClientError::FileIO("Credential lock poisoned".into()))?;
        *slot = None;
        Ok(())
    }
}

/// What actually goes into the credential file.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredCredential {
    token: String,
    saved_at: DateTime<Utc>,
}

/// Store backed by a file in the user's data directory, so the session
/// survives restarts of the client.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    /// Serializes read-modify-write of the file within this process.
    lock: RwLock<()>,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileCredentialStore {
    /// Store the credential as `<dir>/credential.bin`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(CREDENTIAL_FILE))
    }

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: RwLock::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn encode(token: &str) -> Result<Vec<u8>, ClientError> {
        let stored = StoredCredential {
            token: token.to_string(),
            saved_at: Utc::now(),
        };
        let payload = bincode::serialize(&stored)
            .map_err(|e| ClientError::Serialization(format!("Failed to serialize credential: {e}")))?;
        Ok(format::write_file(format::CURRENT_VERSION, &payload))
    }

    fn decode(bytes: &[u8]) -> Result<StoredCredential, ClientError> {
        let (_header, payload) = format::read_file(bytes)?;
        bincode::deserialize(payload)
            .map_err(|e| ClientError::Deserialization(format!("Failed to deserialize credential: {e}")))
    }

    fn read_token(&self) -> Result<Option<String>, ClientError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let stored = Self::decode(&bytes)?;
        Ok(Some(stored.token).filter(|t| !t.is_empty()))
    }
}

/// Create `path` readable by the owner only and fill it with `bytes`.
///
/// A leftover file is removed first: `mode` only applies to files the
/// open call creates.
#[cfg(not(target_arch = "wasm32"))]
fn write_private(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    use std::io::Write;

    match std::fs::remove_file(path) {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => return Err(e),
        _ => {}
    }

    let mut options = std::fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

#[cfg(not(target_arch = "wasm32"))]
impl CredentialStore for FileCredentialStore {
    fn save(&self, token: &str) -> Result<(), ClientError> {
        let _guard = self
            .lock
            .write()
            .map_err(|_| ClientError::FileIO("Credential lock poisoned".into()))?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let bytes = Self::encode(token)?;
        // Write to a sibling file and rename so a crash never leaves half a token.
        let tmp = self.path.with_extension("tmp");
        write_private(&tmp, &bytes)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn load(&self) -> Option<String> {
        let _guard = self.lock.read().ok()?;
        match self.read_token() {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Ignoring unreadable credential file");
                None
            }
        }
    }

    fn clear(&self) -> Result<(), ClientError> {
        let _guard = self
            .lock
            .write()
            .map_err(|_| ClientError::FileIO("Credential lock poisoned".into()))?;
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
