use std::time::Duration;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::CookieJar;
use sha2::{Digest, Sha256};

use crate::auth::token::{self, TokenState};
use crate::error::AppError;
use crate::state::SharedState;

pub const ACCESS_COOKIE: &str = "accessToken";

/// Lifetime of the session cookie. Per-session server state older than this
/// belongs to a session the browser has already dropped.
pub const SESSION_TTL: Duration = Duration::from_secs(12 * 60 * 60);

/// Key for per-session server state, so raw tokens are never retained.
pub fn token_key(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// The caller's upstream bearer token.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub subject: Option<String>,
}

impl Session {
    fn from_token(token: &str) -> Result<Self, AppError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AppError::Unauthorized(
                "Missing authentication token".to_string(),
            ));
        }

        match token::inspect(token) {
            TokenState::Expired => Err(AppError::Unauthorized(
                "Session expired".to_string(),
            )),
            TokenState::Valid(claims) => Ok(Session {
                token: token.to_string(),
                subject: claims.subject(),
            }),
            TokenState::Opaque => Ok(Session {
                token: token.to_string(),
                subject: None,
            }),
        }
    }

    /// Whether the request carries a usable session, without rejecting it.
    pub fn peek(jar: &CookieJar) -> Option<Session> {
        jar.get(ACCESS_COOKIE)
            .and_then(|cookie| Session::from_token(cookie.value()).ok())
    }
}

impl FromRequestParts<SharedState> for Session {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        // Try Bearer token from Authorization header first
        if let Some(auth_header) = parts.headers.get("authorization") {
            let auth_str = auth_header
                .to_str()
                .map_err(|_| AppError::Unauthorized("Invalid authorization header".to_string()))?;

            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                return Session::from_token(token);
            }
        }

        // Then the cookie set at sign-in
        let jar = CookieJar::from_headers(&parts.headers);
        if let Some(cookie) = jar.get(ACCESS_COOKIE) {
            return Session::from_token(cookie.value());
        }

        Err(AppError::Unauthorized(
            "Missing authentication token".to_string(),
        ))
    }
}

pub fn session_cookie(token: &str, secure: bool) -> Cookie<'static> {
    Cookie::build((ACCESS_COOKIE, token.to_string()))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(SESSION_TTL.as_secs() as i64))
        .build()
}

pub fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build((ACCESS_COOKIE, ""))
        .path("/")
        .max_age(time::Duration::ZERO)
        .build()
}
