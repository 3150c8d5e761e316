use std::collections::HashSet;

use chrono::Utc;
use jsonwebtoken::{decode, decode_header, DecodingKey, Validation};
use serde::Deserialize;
use serde_json::Value;

/// Seconds of clock skew tolerated when checking `exp`.
const LEEWAY_SECS: i64 = 30;

#[derive(Debug, Clone, Deserialize)]
pub struct TokenClaims {
    #[serde(default)]
    pub exp: Option<i64>,
    #[serde(default)]
    pub sub: Option<Value>,
    #[serde(default)]
    pub user_id: Option<Value>,
}

impl TokenClaims {
    pub fn subject(&self) -> Option<String> {
        self.user_id.as_ref().or(self.sub.as_ref()).map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }
}

#[derive(Debug, Clone)]
pub enum TokenState {
    /// Not a JWT; only the upstream can judge it.
    Opaque,
    Valid(TokenClaims),
    Expired,
}

/// Read the claims of an upstream access token.
///
/// The signing key belongs to the upstream API, so the signature is not
/// verified here. This only lets an expired session be sent to the sign-in
/// page before a doomed upstream call.
pub fn inspect(token: &str) -> TokenState {
    let Ok(header) = decode_header(token) else {
        return TokenState::Opaque;
    };

    let mut validation = Validation::new(header.alg);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims = HashSet::new();

    match decode::<TokenClaims>(token, &DecodingKey::from_secret(&[]), &validation) {
        Ok(data) => match data.claims.exp {
            Some(exp) if exp + LEEWAY_SECS < Utc::now().timestamp() => TokenState::Expired,
            _ => TokenState::Valid(data.claims),
        },
        Err(e) => {
            tracing::debug!("Access token is not a readable JWT: {e}");
            TokenState::Opaque
        }
    }
}
