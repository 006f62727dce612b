//! Error types for the mwsession library.
//!
//! This module provides a unified error type with explicit variants for
//! transport, token, login, store, and input validation failures.

use thiserror::Error;

use crate::tokens::TokenKind;

/// The unified error type for mwsession operations.
///
/// This error type covers all possible failure modes in the library,
/// with explicit variants to allow callers to handle specific cases.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (connection, timeout, HTTP).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Token fetch errors.
    #[error("token fetch error: {0}")]
    TokenFetch(#[from] TokenFetchError),

    /// Login failures reported by the server.
    #[error("login error: {0}")]
    Login(#[from] LoginError),

    /// Server-side logout failures.
    #[error("logout error: {0}")]
    Logout(#[from] LogoutError),

    /// Current-user lookup failures.
    #[error("current user error: {0}")]
    CurrentUser(#[from] CurrentUserError),

    /// A saved-credential login was attempted with no saved credentials.
    #[error("no saved credentials")]
    MissingCredentials,

    /// Credential store failures.
    #[error("credential store error: {0}")]
    Store(#[from] StoreError),

    /// Input validation errors (invalid site URL, empty credentials).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
}

impl Error {
    /// Whether this error indicates a connectivity failure rather than a
    /// definitive server answer.
    ///
    /// Saved credentials survive connectivity failures; they are wiped only
    /// when the server has actually rejected them.
    pub fn is_connectivity(&self) -> bool {
        matches!(
            self,
            Error::Transport(TransportError::Connection { .. })
                | Error::Transport(TransportError::Timeout { .. })
        )
    }
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// HTTP-level failure or an undecodable response body.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

/// Token fetch errors.
#[derive(Debug, Error)]
pub enum TokenFetchError {
    /// The server rejected the token request.
    #[error("token request rejected [{code}]: {message}")]
    Rejected { code: String, message: String },

    /// The response carried no token of the requested kind.
    #[error("no {kind} token in response")]
    Missing { kind: TokenKind },
}

/// Login failures reported by the server.
#[derive(Debug, Error)]
pub enum LoginError {
    /// The username or password was wrong.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The server demands a captcha solution before it will log this
    /// user in. Resubmit with the solution in the login options.
    #[error("captcha required")]
    CaptchaRequired { captcha_id: Option<String> },

    /// The account has two-factor authentication enabled and the
    /// submission carried no one-time token.
    #[error("two-factor token required")]
    TwoFactorRequired,

    /// The password must be changed before the login completes.
    #[error("password change required")]
    PasswordChangeRequired,

    /// The server rejected the login for another stated reason.
    #[error("login rejected [{code}]: {message}")]
    Rejected { code: String, message: String },

    /// The server answered with a status this client does not understand.
    #[error("unexpected login status: {status}")]
    UnexpectedStatus { status: String },
}

/// Server-side logout failures.
#[derive(Debug, Error)]
pub enum LogoutError {
    /// The server rejected the logout request.
    #[error("logout rejected [{code}]: {message}")]
    Rejected { code: String, message: String },
}

/// Current-user lookup failures.
#[derive(Debug, Error)]
pub enum CurrentUserError {
    /// The server rejected the user info request.
    #[error("user info request rejected [{code}]: {message}")]
    Rejected { code: String, message: String },
}

/// Credential store failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure.
    #[error("store IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The record could not be encoded or decoded.
    #[error("store decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid site URL format.
    #[error("invalid site URL '{value}': {reason}")]
    SiteUrl { value: String, reason: String },

    /// Invalid credentials (empty username or password).
    #[error("invalid credentials: {reason}")]
    Credentials { reason: String },

    /// A coordinator was built with missing or inconsistent parts.
    #[error("invalid configuration: {message}")]
    Builder { message: String },
}
