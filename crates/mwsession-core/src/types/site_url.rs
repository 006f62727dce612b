//! Wiki site URL type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::error::{Error, InvalidInputError};

/// A validated wiki site base URL.
///
/// This type ensures the URL is absolute, uses HTTPS (or HTTP for localhost),
/// and is properly normalized for Action API endpoint construction.
///
/// # Example
///
/// ```
/// use mwsession_core::SiteUrl;
///
/// let site = SiteUrl::new("https://en.wikipedia.org").unwrap();
/// assert_eq!(site.api_endpoint(), "https://en.wikipedia.org/w/api.php");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SiteUrl(Url);

impl SiteUrl {
    /// Create a new site URL from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not valid or doesn't meet requirements.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let url = Url::parse(s).map_err(|e| InvalidInputError::SiteUrl {
            value: s.to_string(),
            reason: e.to_string(),
        })?;

        Self::validate(&url, s)?;

        // Normalize: remove trailing slash
        let normalized = if url.path() == "/" {
            let mut u = url.clone();
            u.set_path("");
            u
        } else {
            url
        };

        Ok(Self(normalized))
    }

    /// Build a site URL from a bare host name, assuming HTTPS.
    ///
    /// This is how a persisted host resolves back into a login target.
    pub fn from_host(host: &str) -> Result<Self, Error> {
        Self::new(format!("https://{}", host))
    }

    /// Returns the Action API endpoint URL for this site.
    pub fn api_endpoint(&self) -> String {
        // The URL crate always adds a trailing slash to root paths,
        // so trim it before appending the endpoint path
        let base = self.0.as_str().trim_end_matches('/');
        format!("{}/w/api.php", base)
    }

    /// Returns the base URL as a string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the inner URL.
    pub fn as_url(&self) -> &Url {
        &self.0
    }

    /// Returns the host string.
    pub fn host(&self) -> Option<&str> {
        self.0.host_str()
    }

    fn validate(url: &Url, original: &str) -> Result<(), Error> {
        // Must be absolute
        if url.cannot_be_a_base() {
            return Err(InvalidInputError::SiteUrl {
                value: original.to_string(),
                reason: "must be an absolute URL".to_string(),
            }
            .into());
        }

        // Must be HTTPS (or HTTP for localhost)
        let scheme = url.scheme();
        let is_localhost = url
            .host_str()
            .is_some_and(|h| h == "localhost" || h == "127.0.0.1" || h == "::1");

        if scheme != "https" && !(scheme == "http" && is_localhost) {
            return Err(InvalidInputError::SiteUrl {
                value: original.to_string(),
                reason: "must use HTTPS (HTTP allowed only for localhost)".to_string(),
            }
            .into());
        }

        // Must have a host
        if url.host_str().is_none() {
            return Err(InvalidInputError::SiteUrl {
                value: original.to_string(),
                reason: "must have a host".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

impl fmt::Display for SiteUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SiteUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for SiteUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.0.as_str())
    }
}

impl<'de> Deserialize<'de> for SiteUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        SiteUrl::new(&s).map_err(serde::de::Error::custom)
    }
}

impl AsRef<str> for SiteUrl {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_https_url() {
        let site = SiteUrl::new("https://en.wikipedia.org").unwrap();
        assert_eq!(site.host(), Some("en.wikipedia.org"));
    }

    #[test]
    fn valid_localhost_http() {
        let site = SiteUrl::new("http://localhost:8080").unwrap();
        assert_eq!(site.host(), Some("localhost"));
    }

    #[test]
    fn api_endpoint_construction() {
        let site = SiteUrl::new("https://en.wikipedia.org").unwrap();
        assert_eq!(site.api_endpoint(), "https://en.wikipedia.org/w/api.php");
    }

    #[test]
    fn normalizes_trailing_slash_in_api_endpoint() {
        let site = SiteUrl::new("https://en.wikipedia.org/").unwrap();
        assert_eq!(site.api_endpoint(), "https://en.wikipedia.org/w/api.php");
    }

    #[test]
    fn from_host_assumes_https() {
        let site = SiteUrl::from_host("de.wikipedia.org").unwrap();
        assert_eq!(site.host(), Some("de.wikipedia.org"));
        assert_eq!(site.api_endpoint(), "https://de.wikipedia.org/w/api.php");
    }

    #[test]
    fn from_host_rejects_invalid_host() {
        assert!(SiteUrl::from_host("not a host").is_err());
        assert!(SiteUrl::from_host("").is_err());
    }

    #[test]
    fn invalid_http_non_localhost() {
        assert!(SiteUrl::new("http://en.wikipedia.org").is_err());
    }

    #[test]
    fn invalid_relative_url() {
        assert!(SiteUrl::new("/w/api.php").is_err());
    }

    #[test]
    fn serde_round_trip() {
        let site = SiteUrl::new("https://en.wikipedia.org").unwrap();
        let json = serde_json::to_string(&site).unwrap();
        let back: SiteUrl = serde_json::from_str(&json).unwrap();
        assert_eq!(back, site);
    }

    #[test]
    fn deserialization_revalidates() {
        let result = serde_json::from_str::<SiteUrl>("\"http://en.wikipedia.org\"");
        assert!(result.is_err());
    }
}
