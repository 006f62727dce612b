//! Wire-level tests for the Action API collaborators.
//!
//! These tests use wiremock to simulate a MediaWiki server and check the
//! request encoding and response mapping without network access or real
//! accounts.

use mwsession_core::error::{Error, LoginError, TokenFetchError, TransportError};
use mwsession_core::{
    AccountLogin, AccountLogout, CaptchaSolution, Credentials, CurrentUserFetcher, LoginOptions,
    LoginSubmission, SiteUrl, Token, TokenFetcher, TokenKind,
};
use mwsession_action::ActionApi;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper to create a site URL from a mock server.
fn mock_site(server: &MockServer) -> SiteUrl {
    // For tests, we need to allow HTTP localhost
    SiteUrl::new(&format!("http://127.0.0.1:{}", server.address().port())).unwrap()
}

fn submission(username: &str, password: &str, token: &str) -> LoginSubmission {
    LoginSubmission::new(
        Credentials::new(username, password),
        Token::new(token),
        LoginOptions::default(),
    )
}

// ============================================================================
// Token Tests
// ============================================================================

#[tokio::test]
async fn test_fetch_login_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .and(query_param("action", "query"))
        .and(query_param("meta", "tokens"))
        .and(query_param("type", "login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "batchcomplete": "",
            "query": {"tokens": {"logintoken": "login-token-123"}}
        })))
        .mount(&server)
        .await;

    let api = ActionApi::new();
    let token = api
        .fetch_token(TokenKind::Login, &mock_site(&server))
        .await
        .unwrap();

    assert_eq!(token.as_str(), "login-token-123");
}

#[tokio::test]
async fn test_fetch_csrf_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .and(query_param("type", "csrf"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": {"tokens": {"csrftoken": "csrf-token-456"}}
        })))
        .mount(&server)
        .await;

    let api = ActionApi::new();
    let token = api
        .fetch_token(TokenKind::Csrf, &mock_site(&server))
        .await
        .unwrap();

    assert_eq!(token.as_str(), "csrf-token-456");
}

#[tokio::test]
async fn test_fetch_token_missing_from_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": {"tokens": {}}
        })))
        .mount(&server)
        .await;

    let api = ActionApi::new();
    let result = api.fetch_token(TokenKind::Login, &mock_site(&server)).await;

    assert!(matches!(
        result,
        Err(Error::TokenFetch(TokenFetchError::Missing {
            kind: TokenKind::Login
        }))
    ));
}

#[tokio::test]
async fn test_fetch_token_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": {"code": "readapidenied", "info": "You need read permission"}
        })))
        .mount(&server)
        .await;

    let api = ActionApi::new();
    let result = api.fetch_token(TokenKind::Login, &mock_site(&server)).await;

    match result {
        Err(Error::TokenFetch(TokenFetchError::Rejected { code, .. })) => {
            assert_eq!(code, "readapidenied");
        }
        other => panic!("expected rejected token fetch, got {other:?}"),
    }
}

// ============================================================================
// Login Tests
// ============================================================================

#[tokio::test]
async fn test_login_pass_returns_normalized_username() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/w/api.php"))
        .and(body_string_contains("action=clientlogin"))
        .and(body_string_contains("username=alice"))
        .and(body_string_contains("password=secret123"))
        .and(body_string_contains("logintoken=login-token-123"))
        .and(body_string_contains("loginreturnurl="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "clientlogin": {"status": "PASS", "username": "Alice"}
        })))
        .mount(&server)
        .await;

    let api = ActionApi::new();
    let site = mock_site(&server);
    let success = AccountLogin::submit(&api, &submission("alice", "secret123", "login-token-123"), &site)
        .await
        .unwrap();

    assert_eq!(success.username, "Alice");
}

#[tokio::test]
async fn test_login_encodes_optional_fields() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/w/api.php"))
        .and(body_string_contains("retype=secret123"))
        .and(body_string_contains("OATHToken=654321"))
        .and(body_string_contains("captchaId=36885769"))
        .and(body_string_contains("captchaWord=crumpet"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "clientlogin": {"status": "PASS", "username": "Alice"}
        })))
        .mount(&server)
        .await;

    let options = LoginOptions {
        retype_password: Some("secret123".to_string()),
        two_factor_token: Some("654321".to_string()),
        captcha: Some(CaptchaSolution {
            id: "36885769".to_string(),
            word: "crumpet".to_string(),
        }),
    };
    let submission = LoginSubmission::new(
        Credentials::new("alice", "secret123"),
        Token::new("login-token-123"),
        options,
    );

    let api = ActionApi::new();
    let site = mock_site(&server);
    let result = AccountLogin::submit(&api, &submission, &site).await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_login_wrong_password() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/w/api.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "clientlogin": {
                "status": "FAIL",
                "messagecode": "wrongpassword",
                "message": "Incorrect username or password entered."
            }
        })))
        .mount(&server)
        .await;

    let api = ActionApi::new();
    let site = mock_site(&server);
    let result = AccountLogin::submit(&api, &submission("alice", "nope", "t"), &site).await;

    assert!(matches!(
        result,
        Err(Error::Login(LoginError::InvalidCredentials))
    ));
}

#[tokio::test]
async fn test_login_password_reset_required() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/w/api.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "clientlogin": {
                "status": "FAIL",
                "messagecode": "resetpass-temp-emailed",
                "message": "A temporary password was emailed to you."
            }
        })))
        .mount(&server)
        .await;

    let api = ActionApi::new();
    let site = mock_site(&server);
    let result = AccountLogin::submit(&api, &submission("alice", "temp", "t"), &site).await;

    assert!(matches!(
        result,
        Err(Error::Login(LoginError::PasswordChangeRequired))
    ));
}

#[tokio::test]
async fn test_login_requires_two_factor() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/w/api.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "clientlogin": {
                "status": "UI",
                "messagecode": "oathauth-auth-ui",
                "message": "Verification code required",
                "requests": [{
                    "id": "MediaWiki\\Extension\\OATHAuth\\Auth\\TOTPAuthenticationRequest",
                    "metadata": {},
                    "required": "required"
                }]
            }
        })))
        .mount(&server)
        .await;

    let api = ActionApi::new();
    let site = mock_site(&server);
    let result = AccountLogin::submit(&api, &submission("alice", "secret123", "t"), &site).await;

    assert!(matches!(
        result,
        Err(Error::Login(LoginError::TwoFactorRequired))
    ));
}

#[tokio::test]
async fn test_login_requires_captcha() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/w/api.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "clientlogin": {
                "status": "UI",
                "messagecode": "captcha-fail",
                "message": "Incorrect or missing CAPTCHA.",
                "requests": [{
                    "id": "CaptchaAuthenticationRequest",
                    "metadata": {},
                    "required": "required",
                    "fields": {
                        "captchaId": {"type": "hidden", "value": "36885769"},
                        "captchaWord": {"type": "string", "label": "Enter the text"}
                    }
                }]
            }
        })))
        .mount(&server)
        .await;

    let api = ActionApi::new();
    let site = mock_site(&server);
    let result = AccountLogin::submit(&api, &submission("alice", "secret123", "t"), &site).await;

    match result {
        Err(Error::Login(LoginError::CaptchaRequired { captcha_id })) => {
            assert_eq!(captcha_id.as_deref(), Some("36885769"));
        }
        other => panic!("expected captcha requirement, got {other:?}"),
    }
}

#[tokio::test]
async fn test_login_unknown_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/w/api.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "clientlogin": {"status": "RESTART"}
        })))
        .mount(&server)
        .await;

    let api = ActionApi::new();
    let site = mock_site(&server);
    let result = AccountLogin::submit(&api, &submission("alice", "secret123", "t"), &site).await;

    match result {
        Err(Error::Login(LoginError::UnexpectedStatus { status })) => {
            assert_eq!(status, "RESTART");
        }
        other => panic!("expected unexpected-status error, got {other:?}"),
    }
}

// ============================================================================
// Current User Tests
// ============================================================================

#[tokio::test]
async fn test_userinfo_anonymous_session() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .and(query_param("meta", "userinfo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": {"userinfo": {"id": 0, "name": "127.0.0.1", "anon": ""}}
        })))
        .mount(&server)
        .await;

    let api = ActionApi::new();
    let user = api.fetch(&mock_site(&server)).await.unwrap();

    assert!(user.is_none());
}

#[tokio::test]
async fn test_userinfo_authenticated_session() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .and(query_param("meta", "userinfo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": {"userinfo": {"id": 42, "name": "Alice"}}
        })))
        .mount(&server)
        .await;

    let api = ActionApi::new();
    let user = api.fetch(&mock_site(&server)).await.unwrap().unwrap();

    assert_eq!(user.username, "Alice");
    assert_eq!(user.user_id, Some(42));
}

// ============================================================================
// Logout Tests
// ============================================================================

#[tokio::test]
async fn test_logout_posts_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/w/api.php"))
        .and(body_string_contains("action=logout"))
        .and(body_string_contains("token=csrf-token-456"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let api = ActionApi::new();
    let site = mock_site(&server);
    let result = AccountLogout::submit(&api, &Token::new("csrf-token-456"), &site).await;

    assert!(result.is_ok());
}

// ============================================================================
// Error Handling Tests
// ============================================================================

#[tokio::test]
async fn test_server_error_is_not_connectivity() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_string("Internal Server Error")
                .insert_header("content-type", "text/plain"),
        )
        .mount(&server)
        .await;

    let api = ActionApi::new();
    let err = api
        .fetch_token(TokenKind::Login, &mock_site(&server))
        .await
        .unwrap_err();

    assert!(!err.is_connectivity());
    match err {
        Error::Transport(TransportError::Http { message }) => {
            assert!(message.contains("500"));
        }
        other => panic!("expected HTTP transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_refused_connection_is_connectivity() {
    // Port 9 (discard) has no listener; the connection is refused outright.
    let site = SiteUrl::new("http://127.0.0.1:9").unwrap();

    let api = ActionApi::new();
    let err = api
        .fetch_token(TokenKind::Login, &site)
        .await
        .unwrap_err();

    assert!(err.is_connectivity());
}
