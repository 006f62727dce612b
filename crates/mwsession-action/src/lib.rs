//! mwsession-action - MediaWiki Action API bindings.
//!
//! [`ActionApi`] implements the mwsession network collaborator traits over
//! HTTP: token fetch, clientlogin, logout, and the current-user lookup.

mod api;
mod client;
mod endpoints;

pub use api::ActionApi;
pub use client::ApiClient;
