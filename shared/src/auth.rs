//! Admin session handling.
//!
//! A session is a signed token `base64url(json).base64url(hmac-sha256)` carried in the
//! `pw_admin_session` cookie or an `Authorization: Bearer` header. Every admin request is
//! checked here; nothing the browser stores is trusted on its own. Rotating `SESSION_SECRET`
//! revokes every outstanding session.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use lambda_http::http::{header, HeaderMap, StatusCode};
use lambda_http::{Body, Error, Response};
use paperworks_atoms::http;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

use crate::config::Config;

type HmacSha256 = Hmac<Sha256>;

pub const SESSION_COOKIE: &str = "pw_admin_session";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("no admin session")]
    MissingSession,

    #[error("admin session is invalid")]
    InvalidSession,

    #[error("admin session has expired")]
    Expired,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AdminSession {
    pub username: String,
    pub issued_at: i64,
    pub expires_at: i64,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl AdminSession {
    pub fn new(username: impl Into<String>, now: i64, ttl_secs: i64) -> Self {
        Self {
            username: username.into(),
            issued_at: now,
            expires_at: now + ttl_secs,
        }
    }
}

fn mac(secret: &str, data: &[u8]) -> Result<HmacSha256, AuthError> {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| AuthError::InvalidSession)?;
    mac.update(data);
    Ok(mac)
}

pub fn encode_token(session: &AdminSession, secret: &str) -> Result<String, AuthError> {
    let json = serde_json::to_vec(session).map_err(|_| AuthError::InvalidSession)?;
    let payload = URL_SAFE_NO_PAD.encode(json);
    let signature = mac(secret, payload.as_bytes())?.finalize().into_bytes();
    Ok(format!("{}.{}", payload, URL_SAFE_NO_PAD.encode(signature)))
}

/// Verifies the signature before looking at the payload, then the expiry against `now`.
pub fn decode_token(token: &str, secret: &str, now: i64) -> Result<AdminSession, AuthError> {
    let (payload, signature) = token.split_once('.').ok_or(AuthError::InvalidSession)?;
    let signature = URL_SAFE_NO_PAD
        .decode(signature)
        .map_err(|_| AuthError::InvalidSession)?;
    mac(secret, payload.as_bytes())?
        .verify_slice(&signature)
        .map_err(|_| AuthError::InvalidSession)?;

    let json = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|_| AuthError::InvalidSession)?;
    let session: AdminSession =
        serde_json::from_slice(&json).map_err(|_| AuthError::InvalidSession)?;

    if session.expires_at <= now {
        return Err(AuthError::Expired);
    }
    Ok(session)
}

/// Constant-time comparison of the submitted credentials against the configured ones.
pub fn check_credentials(config: &Config, username: &str, password: &str) -> Result<(), AuthError> {
    let expected = format!("{}\n{}", config.admin_username, config.admin_password);
    let expected_tag = mac(&config.session_secret, expected.as_bytes())?
        .finalize()
        .into_bytes();

    let submitted = format!("{}\n{}", username, password);
    mac(&config.session_secret, submitted.as_bytes())?
        .verify_slice(&expected_tag)
        .map_err(|_| AuthError::InvalidCredentials)
}

pub fn session_cookie(token: &str, max_age_secs: i64) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; Secure; SameSite=Strict; Max-Age={}",
        SESSION_COOKIE, token, max_age_secs
    )
}

pub fn clear_session_cookie() -> String {
    format!(
        "{}=; Path=/; HttpOnly; Secure; SameSite=Strict; Max-Age=0",
        SESSION_COOKIE
    )
}

/// Bearer token first, then the session cookie.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());
    if bearer.is_some() {
        return bearer;
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// Authenticates an admin request, or yields the 401 response to send back.
pub fn authenticate_request(
    config: &Config,
    headers: &HeaderMap,
) -> Result<AdminSession, Response<Body>> {
    let now = chrono::Utc::now().timestamp();
    let outcome = token_from_headers(headers)
        .ok_or(AuthError::MissingSession)
        .and_then(|token| decode_token(&token, &config.session_secret, now));

    outcome.map_err(|e| {
        tracing::warn!("🔒 Admin request rejected: {}", e);
        unauthorized(&e)
    })
}

fn unauthorized(err: &AuthError) -> Response<Body> {
    Response::builder()
        .status(StatusCode::UNAUTHORIZED)
        .header("Content-Type", "application/json")
        .header("Set-Cookie", clear_session_cookie())
        .body(
            serde_json::json!({ "error": err.to_string() })
                .to_string()
                .into(),
        )
        .unwrap_or_default()
}

/// HTTP Handler: POST /admin/login
pub async fn login_handler(config: &Config, body: &[u8]) -> Result<Response<Body>, Error> {
    let request: LoginRequest = match http::parse_body(body) {
        Ok(r) => r,
        Err(resp) => return Ok(resp),
    };

    if let Err(e) = check_credentials(config, request.username.trim(), &request.password) {
        tracing::warn!("🔒 Admin login failed: username={}", request.username);
        return http::error(StatusCode::UNAUTHORIZED, e.to_string());
    }

    let now = chrono::Utc::now().timestamp();
    let session = AdminSession::new(request.username.trim(), now, config.session_ttl_secs);
    let token = match encode_token(&session, &config.session_secret) {
        Ok(t) => t,
        Err(e) => return http::error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };

    tracing::info!(
        "🔓 Admin login: username={}, expires_at={}",
        session.username,
        session.expires_at
    );

    let mut resp = http::json(StatusCode::OK, &session)?;
    resp.headers_mut().append(
        header::SET_COOKIE,
        session_cookie(&token, config.session_ttl_secs).parse()?,
    );
    Ok(resp)
}

/// HTTP Handler: GET /admin/session
pub async fn session_handler(session: &AdminSession) -> Result<Response<Body>, Error> {
    http::json(StatusCode::OK, session)
}

/// HTTP Handler: POST /admin/logout
pub async fn logout_handler() -> Result<Response<Body>, Error> {
    let mut resp = http::json(StatusCode::OK, &serde_json::json!({ "message": "ok" }))?;
    resp.headers_mut()
        .append(header::SET_COOKIE, clear_session_cookie().parse()?);
    Ok(resp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lambda_http::http::HeaderValue;

    fn config() -> Config {
        Config::from_lookup(|key| match key {
            "ADMIN_USERNAME" => Some("owner".to_string()),
            "ADMIN_PASSWORD" => Some("correct horse".to_string()),
            "SESSION_SECRET" => Some("secret-one".to_string()),
            _ => None,
        })
        .unwrap()
    }

    #[test]
    fn token_round_trips_until_expiry() {
        let session = AdminSession::new("owner", 1_000, 60);
        let token = encode_token(&session, "secret-one").unwrap();

        assert_eq!(decode_token(&token, "secret-one", 1_030), Ok(session));
        assert_eq!(decode_token(&token, "secret-one", 1_060), Err(AuthError::Expired));
    }

    #[test]
    fn rotating_the_secret_revokes_tokens() {
        let token = encode_token(&AdminSession::new("owner", 0, 60), "secret-one").unwrap();
        assert_eq!(decode_token(&token, "secret-two", 10), Err(AuthError::InvalidSession));
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let token = encode_token(&AdminSession::new("owner", 0, 60), "secret-one").unwrap();
        let (_, signature) = token.split_once('.').unwrap();
        let forged = URL_SAFE_NO_PAD.encode(
            serde_json::to_vec(&AdminSession::new("owner", 0, 1_000_000)).unwrap(),
        );

        let result = decode_token(&format!("{}.{}", forged, signature), "secret-one", 10);
        assert_eq!(result, Err(AuthError::InvalidSession));
        assert_eq!(decode_token("garbage", "secret-one", 10), Err(AuthError::InvalidSession));
    }

    #[test]
    fn credentials_must_match_exactly() {
        let config = config();
        assert!(check_credentials(&config, "owner", "correct horse").is_ok());
        assert_eq!(
            check_credentials(&config, "owner", "correct horse "),
            Err(AuthError::InvalidCredentials)
        );
        assert_eq!(
            check_credentials(&config, "admin", "correct horse"),
            Err(AuthError::InvalidCredentials)
        );
    }

    #[test]
    fn bearer_header_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; pw_admin_session=from-cookie"),
        );
        assert_eq!(token_from_headers(&headers).as_deref(), Some("from-cookie"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer from-header"));
        assert_eq!(token_from_headers(&headers).as_deref(), Some("from-header"));
    }

    #[test]
    fn requests_without_a_valid_session_get_401() {
        let config = config();
        let rejected = authenticate_request(&config, &HeaderMap::new()).unwrap_err();
        assert_eq!(rejected.status(), StatusCode::UNAUTHORIZED);

        let now = chrono::Utc::now().timestamp();
        let token = encode_token(&AdminSession::new("owner", now, 60), "secret-one").unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        );
        assert_eq!(authenticate_request(&config, &headers).unwrap().username, "owner");
    }
}
