//! mwsession-core - Core types and traits for the mwsession toolkit.

pub mod account;
pub mod credentials;
pub mod error;
pub mod tokens;
pub mod traits;
pub mod types;

pub use account::{
    CaptchaSolution, LoginOptions, LoginSubmission, LoginSuccess, SavedLoginOutcome, UserIdentity,
};
pub use credentials::{Credentials, SavedCredentials};
pub use error::Error;
pub use tokens::{Token, TokenKind};
pub use traits::{
    AccountLogin, AccountLogout, CookieStore, CredentialStore, CurrentUserFetcher, LoginObserver,
    SyncController, TokenFetcher,
};
pub use types::SiteUrl;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
