//! In-memory cookie jar.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use mwsession_core::{CookieStore, Result};

/// A named cookie with an optional expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    /// The cookie value.
    pub value: String,
    /// Expiry instant; `None` means the cookie lasts for the session only.
    pub expires: Option<DateTime<Utc>>,
}

/// An in-memory cookie jar keyed by cookie name.
///
/// The builder default. Real deployments adapt the HTTP stack's own jar
/// behind the [`CookieStore`] trait; this one covers embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryCookieJar {
    cookies: RwLock<HashMap<String, Cookie>>,
}

impl MemoryCookieJar {
    /// Create an empty jar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a cookie.
    pub fn insert(
        &self,
        name: impl Into<String>,
        value: impl Into<String>,
        expires: Option<DateTime<Utc>>,
    ) {
        let cookie = Cookie {
            value: value.into(),
            expires,
        };
        self.cookies.write().unwrap().insert(name.into(), cookie);
    }

    /// Look up a cookie by name.
    pub fn get(&self, name: &str) -> Option<Cookie> {
        self.cookies.read().unwrap().get(name).cloned()
    }

    /// Number of cookies held.
    pub fn len(&self) -> usize {
        self.cookies.read().unwrap().len()
    }

    /// Whether the jar holds no cookies.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CookieStore for MemoryCookieJar {
    async fn clear(&self) -> Result<()> {
        self.cookies.write().unwrap().clear();
        Ok(())
    }

    async fn recreate(&self, name: &str, template: &str) -> Result<bool> {
        let mut cookies = self.cookies.write().unwrap();

        let Some(template) = cookies.get(template).cloned() else {
            return Ok(false);
        };
        let Some(target) = cookies.get_mut(name) else {
            return Ok(false);
        };

        // The cookie keeps its value; only the lifetime is copied from
        // the longer-lived template
        target.expires = template.expires;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    #[tokio::test]
    async fn recreate_copies_expiry_and_keeps_value() {
        let jar = MemoryCookieJar::new();
        let expiry = Utc::now() + TimeDelta::days(365);

        jar.insert("enwikiSession", "sess-value", None);
        jar.insert("enwikiUserID", "12345", Some(expiry));

        let recreated = jar.recreate("enwikiSession", "enwikiUserID").await.unwrap();
        assert!(recreated);

        let session = jar.get("enwikiSession").unwrap();
        assert_eq!(session.value, "sess-value");
        assert_eq!(session.expires, Some(expiry));
    }

    #[tokio::test]
    async fn recreate_misses_report_false() {
        let jar = MemoryCookieJar::new();
        jar.insert("enwikiSession", "sess-value", None);

        // Template absent
        assert!(!jar.recreate("enwikiSession", "enwikiUserID").await.unwrap());
        // Target absent
        jar.insert("enwikiUserID", "12345", None);
        assert!(!jar.recreate("dewikiSession", "enwikiUserID").await.unwrap());
    }

    #[tokio::test]
    async fn clear_empties_the_jar() {
        let jar = MemoryCookieJar::new();
        jar.insert("enwikiSession", "a", None);
        jar.insert("centralauth_User", "b", None);
        assert_eq!(jar.len(), 2);

        jar.clear().await.unwrap();
        assert!(jar.is_empty());
    }
}
