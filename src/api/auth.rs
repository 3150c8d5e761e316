use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use super::{ApiClient, ApiError};
use crate::models::{Profile, ProfileUpdate};

pub const LOGIN_PATH: &str = "/api/auth/login/";

#[derive(Serialize)]
struct LoginRequest<'a> {
    identifier: &'a str,
    password: &'a str,
}

impl ApiClient {
    /// Exchange credentials for an access token.
    pub async fn login(&self, identifier: &str, password: &str) -> Result<String, ApiError> {
        let body = LoginRequest { identifier, password };
        let reply: Value = match self
            .send(Method::POST, None, LOGIN_PATH, Some(&body))
            .await
        {
            Ok(reply) => reply,
            // A 401 on the login endpoint means bad credentials, not an expired session
            Err(ApiError::Unauthorized) => {
                return Err(ApiError::Status {
                    status: 401,
                    message: "Invalid credentials".to_string(),
                });
            }
            Err(e) => return Err(e),
        };

        access_token_from(&reply).ok_or_else(|| {
            ApiError::Decode("login reply did not contain an access token".to_string())
        })
    }

    pub async fn fetch_profile(&self, token: &str, path: &str) -> Result<Profile, ApiError> {
        let reply: Value = self.get(token, path).await?;
        // Some deployments wrap the record in {"user": {...}}
        let record = reply.get("user").cloned().unwrap_or(reply);
        serde_json::from_value(record).map_err(|e| ApiError::Decode(format!("{path}: {e}")))
    }

    pub async fn update_profile(
        &self,
        token: &str,
        path: &str,
        update: &ProfileUpdate,
    ) -> Result<Value, ApiError> {
        self.send(Method::PATCH, Some(token), path, Some(update)).await
    }
}

pub fn access_token_from(reply: &Value) -> Option<String> {
    ["access", "access_token", "accessToken", "token"]
        .iter()
        .find_map(|key| reply.get(*key).and_then(Value::as_str))
        .or_else(|| {
            reply
                .get("tokens")
                .and_then(|t| t.get("access").or_else(|| t.get("access_token")))
                .and_then(Value::as_str)
        })
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}
