//! Action API implementations of the network collaborator traits.

use async_trait::async_trait;
use tracing::{debug, instrument};

use mwsession_core::error::{CurrentUserError, Error, LoginError, LogoutError, TokenFetchError};
use mwsession_core::{
    AccountLogin, AccountLogout, CurrentUserFetcher, LoginSubmission, LoginSuccess, Result,
    SiteUrl, Token, TokenFetcher, TokenKind, UserIdentity,
};

use crate::client::ApiClient;
use crate::endpoints::{
    ClientLoginData, ClientLoginForm, ClientLoginResponse, LogoutForm, LogoutResponse,
    TokenRequest, TokenResponse, UserInfoRequest, UserInfoResponse,
};

/// MediaWiki Action API implementation of the network collaborators.
///
/// One instance covers token fetch, login, server-side logout, and the
/// current-user lookup, sharing a single cookie-carrying HTTP client so
/// consecutive calls see one server session.
#[derive(Debug, Clone, Default)]
pub struct ActionApi {
    client: ApiClient,
}

impl ActionApi {
    /// Create an API instance with a fresh HTTP client.
    pub fn new() -> Self {
        Self {
            client: ApiClient::new(),
        }
    }

    /// Create an API instance over an existing client.
    pub fn with_client(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TokenFetcher for ActionApi {
    #[instrument(skip(self), fields(site = %site))]
    async fn fetch_token(&self, kind: TokenKind, site: &SiteUrl) -> Result<Token> {
        let request = TokenRequest {
            action: "query",
            meta: "tokens",
            token_type: kind.as_str(),
            format: "json",
        };

        let response: TokenResponse = self.client.get(site, &request).await?;

        if let Some(error) = response.error {
            return Err(Error::TokenFetch(TokenFetchError::Rejected {
                code: error.code,
                message: error.info.unwrap_or_default(),
            }));
        }

        let tokens = response.query.map(|q| q.tokens);
        let value = match kind {
            TokenKind::Login => tokens.and_then(|t| t.login_token),
            TokenKind::Csrf => tokens.and_then(|t| t.csrf_token),
        };

        match value {
            Some(token) if !token.is_empty() => {
                debug!(%kind, "Token obtained");
                Ok(Token::new(token))
            }
            _ => Err(Error::TokenFetch(TokenFetchError::Missing { kind })),
        }
    }
}

#[async_trait]
impl AccountLogin for ActionApi {
    #[instrument(skip(self, submission), fields(site = %site))]
    async fn submit(&self, submission: &LoginSubmission, site: &SiteUrl) -> Result<LoginSuccess> {
        let options = submission.options();
        let form = ClientLoginForm {
            action: "clientlogin",
            username: submission.credentials().username(),
            password: submission.credentials().password(),
            logintoken: submission.token().as_str(),
            loginreturnurl: site.as_str(),
            retype: options.retype_password.as_deref(),
            oath_token: options.two_factor_token.as_deref(),
            captcha_id: options.captcha.as_ref().map(|c| c.id.as_str()),
            captcha_word: options.captcha.as_ref().map(|c| c.word.as_str()),
            format: "json",
        };

        let response: ClientLoginResponse = self.client.post_form(site, &form).await?;

        if let Some(error) = response.error {
            return Err(Error::Login(LoginError::Rejected {
                code: error.code,
                message: error.info.unwrap_or_default(),
            }));
        }

        let Some(data) = response.client_login else {
            return Err(Error::Login(LoginError::UnexpectedStatus {
                status: "missing clientlogin body".to_string(),
            }));
        };

        map_login_status(data)
    }
}

#[async_trait]
impl AccountLogout for ActionApi {
    #[instrument(skip(self, token), fields(site = %site))]
    async fn submit(&self, token: &Token, site: &SiteUrl) -> Result<()> {
        let form = LogoutForm {
            action: "logout",
            token: token.as_str(),
            format: "json",
        };

        let response: LogoutResponse = self.client.post_form(site, &form).await?;

        if let Some(error) = response.error {
            return Err(Error::Logout(LogoutError::Rejected {
                code: error.code,
                message: error.info.unwrap_or_default(),
            }));
        }

        debug!("Server session logged out");
        Ok(())
    }
}

#[async_trait]
impl CurrentUserFetcher for ActionApi {
    #[instrument(skip(self), fields(site = %site))]
    async fn fetch(&self, site: &SiteUrl) -> Result<Option<UserIdentity>> {
        let request = UserInfoRequest {
            action: "query",
            meta: "userinfo",
            format: "json",
        };

        let response: UserInfoResponse = self.client.get(site, &request).await?;

        if let Some(error) = response.error {
            return Err(Error::CurrentUser(CurrentUserError::Rejected {
                code: error.code,
                message: error.info.unwrap_or_default(),
            }));
        }

        let Some(data) = response.query else {
            return Ok(None);
        };
        let info = data.userinfo;

        if info.anon.is_some() {
            debug!("Current session is anonymous");
            return Ok(None);
        }

        debug!(username = %info.name, "Current session is authenticated");
        Ok(Some(UserIdentity {
            username: info.name,
            user_id: Some(info.id),
        }))
    }
}

/// Map a clientlogin response body onto the login outcome.
fn map_login_status(data: ClientLoginData) -> Result<LoginSuccess> {
    match data.status.as_str() {
        "PASS" => match data.username {
            Some(username) if !username.is_empty() => Ok(LoginSuccess { username }),
            _ => Err(Error::Login(LoginError::UnexpectedStatus {
                status: "PASS without username".to_string(),
            })),
        },
        "FAIL" => Err(Error::Login(map_failure(data))),
        "UI" => Err(Error::Login(map_interaction(data))),
        other => Err(Error::Login(LoginError::UnexpectedStatus {
            status: other.to_string(),
        })),
    }
}

fn map_failure(data: ClientLoginData) -> LoginError {
    match data.message_code.as_deref() {
        Some("wrongpassword") | Some("wrongpasswordempty") => LoginError::InvalidCredentials,
        Some(code) if code.starts_with("resetpass") => LoginError::PasswordChangeRequired,
        _ => LoginError::Rejected {
            code: data.message_code.unwrap_or_default(),
            message: data.message.unwrap_or_default(),
        },
    }
}

/// A `UI` status lists the further steps the server wants before it will
/// log this user in.
fn map_interaction(data: ClientLoginData) -> LoginError {
    if data
        .message_code
        .as_deref()
        .is_some_and(|code| code.starts_with("resetpass"))
    {
        return LoginError::PasswordChangeRequired;
    }

    for request in &data.requests {
        if request.id.ends_with("TOTPAuthenticationRequest") {
            return LoginError::TwoFactorRequired;
        }
        if request.id.ends_with("CaptchaAuthenticationRequest") {
            return LoginError::CaptchaRequired {
                captcha_id: request.captcha_id().map(str::to_string),
            };
        }
    }

    LoginError::Rejected {
        code: data.message_code.unwrap_or_default(),
        message: data.message.unwrap_or_default(),
    }
}
