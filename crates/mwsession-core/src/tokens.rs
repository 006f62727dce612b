//! Token types for Action API authentication.

use std::fmt;

/// The kind of server-issued token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Token required to submit a login.
    Login,
    /// Token required for state-changing requests such as logout.
    Csrf,
}

impl TokenKind {
    /// The wire name used in token requests and response keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Login => "login",
            TokenKind::Csrf => "csrf",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ephemeral server-issued token.
///
/// Tokens are single-purpose and short-lived: the server binds them to the
/// session that fetched them. They are never persisted.
///
/// # Security
///
/// - Never logged or displayed in Debug output
/// - Treat as opaque; do not parse or inspect
#[derive(Clone)]
pub struct Token(String);

impl Token {
    /// Create a new token from a server response.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token value for use in request bodies.
    ///
    /// # Security
    ///
    /// Use only when constructing authentication requests.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Hide token value in Debug output
impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Token").field(&"[REDACTED]").finish()
    }
}
