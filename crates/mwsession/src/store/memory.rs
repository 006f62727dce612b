//! In-memory credential store.

use std::sync::RwLock;

use async_trait::async_trait;

use mwsession_core::{CredentialStore, Result, SavedCredentials};

/// An in-memory credential store.
///
/// The builder default. Nothing survives the process; use
/// [`FileCredentialStore`](crate::store::FileCredentialStore) when the
/// record must outlive it.
#[derive(Default)]
pub struct MemoryCredentialStore {
    record: RwLock<Option<SavedCredentials>>,
}

impl MemoryCredentialStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn load(&self) -> Result<Option<SavedCredentials>> {
        Ok(self.record.read().unwrap().clone())
    }

    async fn store(&self, credentials: &SavedCredentials) -> Result<()> {
        *self.record.write().unwrap() = Some(credentials.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.record.write().unwrap() = None;
        Ok(())
    }
}
