//! HTTP client for the MediaWiki Action API.

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, trace};

use mwsession_core::error::{Error, TransportError};
use mwsession_core::{Result, SiteUrl};

/// Request timeout for Action API calls.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// HTTP client for Action API requests.
///
/// Carries its own cookie jar: MediaWiki binds login tokens to the server
/// session that fetched them, so the token fetch and the login submission
/// must share cookies.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
}

impl ApiClient {
    /// Create a new client with a fresh cookie jar.
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("mwsession/", env!("CARGO_PKG_VERSION")))
            .cookie_store(true)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("failed to build HTTP client");

        Self { client }
    }

    /// Wrap an existing `reqwest` client.
    ///
    /// The client should have a cookie store enabled; without one the login
    /// submission cannot see the session started by the token fetch.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Make an Action API query (GET request).
    #[instrument(skip(self, params), fields(site = %site))]
    pub async fn get<Q, R>(&self, site: &SiteUrl, params: &Q) -> Result<R>
    where
        Q: Serialize,
        R: DeserializeOwned,
    {
        let url = site.api_endpoint();
        debug!(%url, "Action API query");

        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(transport_error)?;

        self.handle_response(response).await
    }

    /// Make an Action API submission (POST request, form-encoded body).
    #[instrument(skip(self, form), fields(site = %site))]
    pub async fn post_form<F, R>(&self, site: &SiteUrl, form: &F) -> Result<R>
    where
        F: Serialize,
        R: DeserializeOwned,
    {
        let url = site.api_endpoint();
        debug!(%url, "Action API submission");

        let response = self
            .client
            .post(&url)
            .form(form)
            .send()
            .await
            .map_err(transport_error)?;

        self.handle_response(response).await
    }

    /// Decode a response body, surfacing HTTP failures and undecodable
    /// bodies as transport errors.
    async fn handle_response<R: DeserializeOwned>(&self, response: reqwest::Response) -> Result<R> {
        let status = response.status();
        trace!(status = %status, "Action API response");

        if !status.is_success() {
            return Err(Error::Transport(TransportError::Http {
                message: format!("HTTP {}", status.as_u16()),
            }));
        }

        let body = response.text().await.map_err(transport_error)?;
        serde_json::from_str(&body).map_err(|e| {
            Error::Transport(TransportError::Http {
                message: format!("undecodable response: {}", e),
            })
        })
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a `reqwest` failure onto the transport error classes.
///
/// Timeouts and connection failures form the connectivity class that the
/// coordinator treats as transient; everything else reads as an HTTP error.
pub(crate) fn transport_error(err: reqwest::Error) -> Error {
    let transport = if err.is_timeout() {
        TransportError::Timeout {
            duration_ms: REQUEST_TIMEOUT_SECS * 1000,
        }
    } else if err.is_connect() {
        TransportError::Connection {
            message: err.to_string(),
        }
    } else {
        TransportError::Http {
            message: err.to_string(),
        }
    };
    Error::Transport(transport)
}
