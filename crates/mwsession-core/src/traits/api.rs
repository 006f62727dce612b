//! Network collaborator traits.

use async_trait::async_trait;

use crate::Result;
use crate::account::{LoginSubmission, LoginSuccess, UserIdentity};
use crate::tokens::{Token, TokenKind};
use crate::types::SiteUrl;

/// Fetches ephemeral tokens from a site.
#[async_trait]
pub trait TokenFetcher: Send + Sync {
    /// Fetch a fresh token of the given kind.
    async fn fetch_token(&self, kind: TokenKind, site: &SiteUrl) -> Result<Token>;
}

/// Submits login requests to a site.
#[async_trait]
pub trait AccountLogin: Send + Sync {
    /// Submit a login and return the server-normalized identity.
    async fn submit(&self, submission: &LoginSubmission, site: &SiteUrl) -> Result<LoginSuccess>;
}

/// Submits server-side logout requests.
#[async_trait]
pub trait AccountLogout: Send + Sync {
    /// Invalidate the server session. Requires a CSRF token.
    async fn submit(&self, token: &Token, site: &SiteUrl) -> Result<()>;
}

/// Reports the identity behind the current server session.
#[async_trait]
pub trait CurrentUserFetcher: Send + Sync {
    /// Fetch the current user.
    ///
    /// `Ok(None)` means the session is anonymous, which is a normal outcome
    /// rather than an error.
    async fn fetch(&self, site: &SiteUrl) -> Result<Option<UserIdentity>>;
}
