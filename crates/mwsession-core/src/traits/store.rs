//! Credential store trait.

use async_trait::async_trait;

use crate::Result;
use crate::credentials::SavedCredentials;

/// Persistent storage for the saved credential record.
///
/// The record is stored whole: either a complete username/password pair is
/// present (with an optional host), or nothing is. Implementations must not
/// surface partial records.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Load the saved record, if any.
    async fn load(&self) -> Result<Option<SavedCredentials>>;

    /// Replace the saved record.
    async fn store(&self, credentials: &SavedCredentials) -> Result<()>;

    /// Remove the saved record.
    async fn clear(&self) -> Result<()>;
}
