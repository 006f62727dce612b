//! Action API request and response types.

use serde::{Deserialize, Serialize};

// ============================================================================
// Common envelope
// ============================================================================

/// Server-reported error inside an HTTP 200 envelope.
#[derive(Debug, Deserialize)]
pub struct ApiError {
    pub code: String,
    #[serde(default)]
    pub info: Option<String>,
}

// ============================================================================
// action=query&meta=tokens
// ============================================================================

/// Query parameters for a token fetch.
#[derive(Debug, Serialize)]
pub struct TokenRequest<'a> {
    pub action: &'a str,
    pub meta: &'a str,
    #[serde(rename = "type")]
    pub token_type: &'a str,
    pub format: &'a str,
}

/// Response from a token fetch.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub query: Option<TokenData>,
    #[serde(default)]
    pub error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
pub struct TokenData {
    pub tokens: TokenSet,
}

/// The token keys are named after the requested type.
#[derive(Debug, Deserialize)]
pub struct TokenSet {
    #[serde(default, rename = "logintoken")]
    pub login_token: Option<String>,
    #[serde(default, rename = "csrftoken")]
    pub csrf_token: Option<String>,
}

// ============================================================================
// action=clientlogin
// ============================================================================

/// Form body for a clientlogin submission.
///
/// Deliberately not `Debug`: it carries the password and the login token
/// in the clear.
#[derive(Serialize)]
pub struct ClientLoginForm<'a> {
    pub action: &'a str,
    pub username: &'a str,
    pub password: &'a str,
    pub logintoken: &'a str,
    pub loginreturnurl: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retype: Option<&'a str>,
    #[serde(rename = "OATHToken", skip_serializing_if = "Option::is_none")]
    pub oath_token: Option<&'a str>,
    #[serde(rename = "captchaId", skip_serializing_if = "Option::is_none")]
    pub captcha_id: Option<&'a str>,
    #[serde(rename = "captchaWord", skip_serializing_if = "Option::is_none")]
    pub captcha_word: Option<&'a str>,
    pub format: &'a str,
}

/// Response from a clientlogin submission.
#[derive(Debug, Deserialize)]
pub struct ClientLoginResponse {
    #[serde(default, rename = "clientlogin")]
    pub client_login: Option<ClientLoginData>,
    #[serde(default)]
    pub error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
pub struct ClientLoginData {
    pub status: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default, rename = "messagecode")]
    pub message_code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub requests: Vec<AuthRequest>,
}

/// A pending authentication step listed in a `UI` response.
#[derive(Debug, Deserialize)]
pub struct AuthRequest {
    pub id: String,
    #[serde(default)]
    pub fields: Option<AuthRequestFields>,
}

impl AuthRequest {
    /// The captcha challenge id carried by a captcha request, if any.
    pub fn captcha_id(&self) -> Option<&str> {
        self.fields.as_ref()?.captcha_id.as_ref()?.value.as_deref()
    }
}

#[derive(Debug, Deserialize)]
pub struct AuthRequestFields {
    #[serde(default, rename = "captchaId")]
    pub captcha_id: Option<AuthField>,
}

#[derive(Debug, Deserialize)]
pub struct AuthField {
    #[serde(default)]
    pub value: Option<String>,
}

// ============================================================================
// action=query&meta=userinfo
// ============================================================================

/// Query parameters for the current-user lookup.
#[derive(Debug, Serialize)]
pub struct UserInfoRequest<'a> {
    pub action: &'a str,
    pub meta: &'a str,
    pub format: &'a str,
}

/// Response from the current-user lookup.
#[derive(Debug, Deserialize)]
pub struct UserInfoResponse {
    #[serde(default)]
    pub query: Option<UserInfoData>,
    #[serde(default)]
    pub error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
pub struct UserInfoData {
    pub userinfo: UserInfo,
}

#[derive(Debug, Deserialize)]
pub struct UserInfo {
    pub id: u64,
    pub name: String,
    /// Present (as an empty string) when the session is anonymous.
    #[serde(default)]
    pub anon: Option<serde_json::Value>,
}

// ============================================================================
// action=logout
// ============================================================================

/// Form body for a server-side logout.
///
/// Not `Debug`: it carries the CSRF token.
#[derive(Serialize)]
pub struct LogoutForm<'a> {
    pub action: &'a str,
    pub token: &'a str,
    pub format: &'a str,
}

/// Response from a server-side logout; empty on success.
#[derive(Debug, Deserialize)]
pub struct LogoutResponse {
    #[serde(default)]
    pub error: Option<ApiError>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_captcha_ui_response() {
        let json = r#"{
            "clientlogin": {
                "status": "UI",
                "messagecode": "captcha-login-fail",
                "requests": [{
                    "id": "CaptchaAuthenticationRequest",
                    "fields": {
                        "captchaId": {"type": "hidden", "value": "36885769"},
                        "captchaWord": {"type": "string"}
                    }
                }]
            }
        }"#;

        let response: ClientLoginResponse = serde_json::from_str(json).unwrap();
        let data = response.client_login.unwrap();
        assert_eq!(data.status, "UI");
        assert_eq!(data.requests[0].captcha_id(), Some("36885769"));
    }

    #[test]
    fn decodes_anonymous_userinfo() {
        let json = r#"{"query": {"userinfo": {"id": 0, "name": "10.0.0.1", "anon": ""}}}"#;
        let response: UserInfoResponse = serde_json::from_str(json).unwrap();
        let info = response.query.unwrap().userinfo;
        assert!(info.anon.is_some());
        assert_eq!(info.id, 0);
    }

    #[test]
    fn decodes_envelope_error() {
        let json = r#"{"error": {"code": "readapidenied", "info": "You need read permission"}}"#;
        let response: TokenResponse = serde_json::from_str(json).unwrap();
        let error = response.error.unwrap();
        assert_eq!(error.code, "readapidenied");
        assert!(response.query.is_none());
    }
}
