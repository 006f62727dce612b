//! Login request and outcome types.

use std::fmt;

use crate::credentials::Credentials;
use crate::tokens::Token;

/// Optional inputs for a login attempt.
///
/// Most logins need none of these; they exist for the interactive follow-ups
/// a server may demand (password change, two-factor, captcha).
#[derive(Clone, Default)]
pub struct LoginOptions {
    /// The password retyped, for password-change flows.
    pub retype_password: Option<String>,
    /// One-time token for accounts with two-factor authentication enabled.
    pub two_factor_token: Option<String>,
    /// Solution to a captcha challenge issued by an earlier attempt.
    pub captcha: Option<CaptchaSolution>,
}

// The retyped password is a password; keep it out of Debug output
impl fmt::Debug for LoginOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginOptions")
            .field(
                "retype_password",
                &self.retype_password.as_ref().map(|_| "[REDACTED]"),
            )
            .field("two_factor_token", &self.two_factor_token)
            .field("captcha", &self.captcha)
            .finish()
    }
}

/// A solved captcha challenge.
///
/// Pairs the challenge id issued by the server with the user's answer, so a
/// half-filled solution is unrepresentable.
#[derive(Debug, Clone)]
pub struct CaptchaSolution {
    /// The challenge id issued by the server.
    pub id: String,
    /// The user's answer to the challenge.
    pub word: String,
}

/// An assembled login request handed to an
/// [`AccountLogin`](crate::traits::AccountLogin) implementation.
#[derive(Debug, Clone)]
pub struct LoginSubmission {
    credentials: Credentials,
    token: Token,
    options: LoginOptions,
}

impl LoginSubmission {
    /// Assemble a login submission.
    pub fn new(credentials: Credentials, token: Token, options: LoginOptions) -> Self {
        Self {
            credentials,
            token,
            options,
        }
    }

    /// The credentials to submit.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// The login token authorizing the submission.
    pub fn token(&self) -> &Token {
        &self.token
    }

    /// The optional inputs.
    pub fn options(&self) -> &LoginOptions {
        &self.options
    }
}

/// A successful login.
#[derive(Debug, Clone)]
pub struct LoginSuccess {
    /// The username as normalized by the server.
    ///
    /// The server's form is authoritative and may differ from the submitted
    /// one, typically in capitalization.
    pub username: String,
}

/// The identity behind an authenticated server session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    /// The canonical username.
    pub username: String,
    /// The numeric user id, when the server reports one.
    pub user_id: Option<u64>,
}

/// Outcome of a saved-credential login.
#[derive(Debug, Clone)]
pub enum SavedLoginOutcome {
    /// A fresh login was performed with the saved credentials.
    LoggedIn(LoginSuccess),
    /// The server session was still valid; no login was submitted.
    AlreadyLoggedIn(UserIdentity),
}
