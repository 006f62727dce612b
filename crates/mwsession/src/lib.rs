//! mwsession - login and session reconciliation for MediaWiki-style sites.
//!
//! The central type is [`SessionCoordinator`]: it drives login,
//! saved-credential reuse, and logout against pluggable collaborators for
//! the network, the credential store, the cookie store, and the consuming
//! app's sync subsystem.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use mwsession::{Credentials, LoginOptions, SessionCoordinator, SiteUrl};
//! use mwsession_action::ActionApi;
//!
//! # async fn example() -> Result<(), mwsession::Error> {
//! let site = SiteUrl::new("https://en.wikipedia.org")?;
//! let coordinator = SessionCoordinator::builder(site)
//!     .api(Arc::new(ActionApi::new()))
//!     .language_prefix("en")
//!     .build()?;
//!
//! let success = coordinator
//!     .login(Credentials::new("Alice", "hunter2"), LoginOptions::default())
//!     .await?;
//!
//! println!("Logged in as: {}", success.username);
//! # Ok(())
//! # }
//! ```

pub mod coordinator;
pub mod cookies;
pub mod store;
pub mod sync;

pub use coordinator::{SessionCoordinator, SessionCoordinatorBuilder};
pub use cookies::{Cookie, MemoryCookieJar};
pub use store::{FileCredentialStore, MemoryCredentialStore};
pub use sync::NoopSyncController;

// Re-export the core vocabulary so most consumers need only this crate
pub use mwsession_core::{
    AccountLogin, AccountLogout, CaptchaSolution, CookieStore, CredentialStore, Credentials,
    CurrentUserFetcher, Error, LoginObserver, LoginOptions, LoginSubmission, LoginSuccess,
    Result, SavedCredentials, SavedLoginOutcome, SiteUrl, SyncController, Token, TokenFetcher,
    TokenKind, UserIdentity,
};
