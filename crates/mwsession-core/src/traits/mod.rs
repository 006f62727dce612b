//! Collaborator traits for the session workflow.
//!
//! The coordinator is written entirely against these seams: production wires
//! in the Action API and real stores, tests wire in fakes.

mod api;
mod cookies;
mod observer;
mod store;
mod sync;

pub use api::{AccountLogin, AccountLogout, CurrentUserFetcher, TokenFetcher};
pub use cookies::CookieStore;
pub use observer::LoginObserver;
pub use store::CredentialStore;
pub use sync::SyncController;
