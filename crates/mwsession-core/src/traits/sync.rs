//! Sync controller trait.

use async_trait::async_trait;

use crate::Result;

/// Controls the consuming app's content sync subsystem.
#[async_trait]
pub trait SyncController: Send + Sync {
    /// Enable or disable syncing, optionally deleting local or remote data.
    async fn set_enabled(
        &self,
        enabled: bool,
        delete_local: bool,
        delete_remote: bool,
    ) -> Result<()>;

    /// Re-arm one-time onboarding prompts for the next logged-in user.
    async fn reset_onboarding(&self) -> Result<()>;
}
