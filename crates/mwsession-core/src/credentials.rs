//! Credential types.

use std::fmt;

use crate::error::{Error, InvalidInputError};

/// Login credentials for a wiki account.
///
/// This type holds the username and password required to authenticate
/// with a site.
///
/// # Security
///
/// The password is never exposed in Debug output to prevent accidental
/// logging.
///
/// # Example
///
/// ```
/// use mwsession_core::Credentials;
///
/// let creds = Credentials::new("Alice", "hunter2");
/// assert_eq!(creds.username(), "Alice");
/// ```
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Create new credentials.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Returns the username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the password.
    ///
    /// # Security
    ///
    /// Use this only when constructing authentication requests.
    /// Never log or display this value.
    pub fn password(&self) -> &str {
        &self.password
    }
}

// Intentionally hide password in Debug output
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

// Clone is implemented so credentials can be resubmitted, but the type
// is not Copy to keep credential passing explicit.
impl Clone for Credentials {
    fn clone(&self) -> Self {
        Self {
            username: self.username.clone(),
            password: self.password.clone(),
        }
    }
}

/// A persisted credential record.
///
/// Construction rejects empty usernames and passwords, so a present record
/// always holds a usable pair; absence is `Option<SavedCredentials>` at the
/// store surface. The host records which site the credentials belong to,
/// when known.
///
/// # Security
///
/// The password is never exposed in Debug output.
#[derive(Clone)]
pub struct SavedCredentials {
    username: String,
    password: String,
    host: Option<String>,
}

impl SavedCredentials {
    /// Create a saved credential record.
    ///
    /// # Errors
    ///
    /// Returns an error if the username or password is empty.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Result<Self, Error> {
        let username = username.into();
        let password = password.into();

        if username.is_empty() {
            return Err(InvalidInputError::Credentials {
                reason: "username is empty".to_string(),
            }
            .into());
        }
        if password.is_empty() {
            return Err(InvalidInputError::Credentials {
                reason: "password is empty".to_string(),
            }
            .into());
        }

        Ok(Self {
            username,
            password,
            host: None,
        })
    }

    /// Attach the host the credentials belong to.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Returns the username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the password.
    ///
    /// # Security
    ///
    /// Use this only when constructing authentication requests or writing
    /// to a credential store. Never log or display this value.
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Returns the host the credentials belong to, if recorded.
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// Returns the record as submittable credentials.
    pub fn to_credentials(&self) -> Credentials {
        Credentials::new(&self.username, &self.password)
    }
}

// Intentionally hide password in Debug output
impl fmt::Debug for SavedCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SavedCredentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("host", &self.host)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_hides_password_in_debug() {
        let creds = Credentials::new("Alice", "secret123");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("Alice"));
        assert!(!debug.contains("secret123"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn saved_credentials_reject_empty_fields() {
        assert!(SavedCredentials::new("", "secret").is_err());
        assert!(SavedCredentials::new("Alice", "").is_err());
        assert!(SavedCredentials::new("Alice", "secret").is_ok());
    }

    #[test]
    fn saved_credentials_carry_optional_host() {
        let saved = SavedCredentials::new("Alice", "secret").unwrap();
        assert_eq!(saved.host(), None);

        let saved = saved.with_host("en.wikipedia.org");
        assert_eq!(saved.host(), Some("en.wikipedia.org"));
    }

    #[test]
    fn saved_credentials_hide_password_in_debug() {
        let saved = SavedCredentials::new("Alice", "secret123")
            .unwrap()
            .with_host("en.wikipedia.org");
        let debug = format!("{:?}", saved);
        assert!(debug.contains("Alice"));
        assert!(debug.contains("en.wikipedia.org"));
        assert!(!debug.contains("secret123"));
    }

    #[test]
    fn converts_to_submittable_credentials() {
        let saved = SavedCredentials::new("Alice", "secret").unwrap();
        let creds = saved.to_credentials();
        assert_eq!(creds.username(), "Alice");
        assert_eq!(creds.password(), "secret");
    }
}
