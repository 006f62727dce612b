//! Cookie store trait.

use async_trait::async_trait;

use crate::Result;

/// Storage for site session cookies.
#[async_trait]
pub trait CookieStore: Send + Sync {
    /// Delete every cookie.
    async fn clear(&self) -> Result<()>;

    /// Re-derive the lifetime of cookie `name` from the `template` cookie.
    ///
    /// Session cookies expire ahead of the identity cookies issued alongside
    /// them; copying the template's expiry keeps the session cookie alive as
    /// long as the identity one, sparing redundant logins. The server may
    /// still expire the session early, so the result is a hint, not a
    /// guarantee.
    ///
    /// Returns `false` when either cookie is absent.
    async fn recreate(&self, name: &str, template: &str) -> Result<bool>;
}
