//! File-backed credential store.

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use mwsession_core::error::StoreError;
use mwsession_core::{CredentialStore, Result, SavedCredentials};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// On-disk credential record.
///
/// Kept separate from [`SavedCredentials`] so a hand-edited file cannot
/// smuggle a partial record past the constructor.
#[derive(Debug, Serialize, Deserialize)]
struct StoredRecord {
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    host: Option<String>,
}

/// A credential store backed by a JSON file.
///
/// Writes are atomic (temp file + rename) and the file is created with
/// `0o600` permissions on Unix. A file holding a dangling username or
/// password reads as absent, matching the all-or-nothing record contract.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Create a store backed by the given file path.
    ///
    /// The file need not exist yet; parent directories are created on the
    /// first write.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn load(&self) -> Result<Option<SavedCredentials>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&self.path).map_err(StoreError::Io)?;
        let record: StoredRecord = serde_json::from_str(&json).map_err(StoreError::Decode)?;

        let (Some(username), Some(password)) = (record.username, record.password) else {
            warn!(path = %self.path.display(), "Incomplete credential record, treating as absent");
            return Ok(None);
        };

        match SavedCredentials::new(username, password) {
            Ok(saved) => Ok(Some(match record.host {
                Some(host) => saved.with_host(host),
                None => saved,
            })),
            Err(_) => {
                warn!(path = %self.path.display(), "Empty credential fields, treating as absent");
                Ok(None)
            }
        }
    }

    async fn store(&self, credentials: &SavedCredentials) -> Result<()> {
        let record = StoredRecord {
            username: Some(credentials.username().to_string()),
            password: Some(credentials.password().to_string()),
            host: credentials.host().map(str::to_string),
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(StoreError::Io)?;
        }

        let json = serde_json::to_string_pretty(&record).map_err(StoreError::Decode)?;

        // Write-then-rename so a crash never leaves a half-written record
        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, &json).map_err(StoreError::Io)?;

        // Restrict permissions before the record becomes visible (Unix only)
        #[cfg(unix)]
        {
            let mut perms = fs::metadata(&temp_path)
                .map_err(StoreError::Io)?
                .permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&temp_path, perms).map_err(StoreError::Io)?;
        }

        fs::rename(&temp_path, &self.path).map_err(StoreError::Io)?;

        debug!(path = %self.path.display(), "Credentials written");
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(StoreError::Io)?;
        }
        Ok(())
    }
}
