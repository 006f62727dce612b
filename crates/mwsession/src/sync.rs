//! Sync controller implementations.

use async_trait::async_trait;

use mwsession_core::{Result, SyncController};

/// A sync controller that does nothing.
///
/// The builder default, for consumers without a sync subsystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSyncController;

#[async_trait]
impl SyncController for NoopSyncController {
    async fn set_enabled(
        &self,
        _enabled: bool,
        _delete_local: bool,
        _delete_remote: bool,
    ) -> Result<()> {
        Ok(())
    }

    async fn reset_onboarding(&self) -> Result<()> {
        Ok(())
    }
}
