pub mod auth;
pub mod error_text;
pub mod page;
pub mod payments;
pub mod query;
pub mod users;

use std::fmt;
use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use page::{ListResponse, Page};
use query::{ListQuery, OrderingStyle};

#[derive(Debug)]
pub enum ApiError {
    /// The request never produced a response (connect failure, timeout).
    Transport(String),
    /// The upstream rejected the bearer token.
    Unauthorized,
    /// Any other non-2xx answer, with the message extracted from its body.
    Status { status: u16, message: String },
    /// A 2xx answer whose body did not have the expected shape.
    Decode(String),
}

impl ApiError {
    /// Text suitable for a toast or an inline banner.
    pub fn message(&self) -> String {
        match self {
            ApiError::Transport(msg) => format!("Unable to reach the API: {msg}"),
            ApiError::Unauthorized => "Your session has expired. Please sign in again.".to_string(),
            ApiError::Status { message, .. } => message.clone(),
            ApiError::Decode(msg) => format!("Unexpected response from the API: {msg}"),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Transport(msg) => write!(f, "Transport error: {msg}"),
            ApiError::Unauthorized => write!(f, "Unauthorized"),
            ApiError::Status { status, message } => write!(f, "Upstream {status}: {message}"),
            ApiError::Decode(msg) => write!(f, "Decode error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

/// Thin client over the remote back-office REST API.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
    ordering_override: Option<OrderingStyle>,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        ordering_override: Option<OrderingStyle>,
    ) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Transport(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            ordering_override,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn ordering_style(&self, resource_default: OrderingStyle) -> OrderingStyle {
        self.ordering_override.unwrap_or(resource_default)
    }

    pub fn url(&self, path: &str, query: &str) -> String {
        if query.is_empty() {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}{}?{}", self.base_url, path, query)
        }
    }

    /// GET a list endpoint and normalize whatever shape comes back.
    pub async fn fetch_page<T: DeserializeOwned>(
        &self,
        token: &str,
        path: &str,
        query: &ListQuery,
        style: OrderingStyle,
    ) -> Result<Page<T>, ApiError> {
        let url = self.url(path, &query.to_query_string(self.ordering_style(style)));
        let body = self.execute(Method::GET, &url, Some(token), None::<&()>).await?;
        let response = ListResponse::<T>::from_value(body)
            .map_err(|e| ApiError::Decode(format!("{path}: {e}")))?;
        Ok(response.normalize())
    }

    pub async fn get<T: DeserializeOwned>(&self, token: &str, path: &str) -> Result<T, ApiError> {
        let url = self.url(path, "");
        let body = self.execute(Method::GET, &url, Some(token), None::<&()>).await?;
        decode(path, body)
    }

    pub async fn send<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        token: Option<&str>,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        let url = self.url(path, "");
        let value = self.execute(method, &url, token, body).await?;
        decode(path, value)
    }

    async fn execute<B: Serialize>(
        &self,
        method: Method,
        url: &str,
        token: Option<&str>,
        body: Option<&B>,
    ) -> Result<Value, ApiError> {
        let request_id = Uuid::now_v7();
        tracing::debug!(%request_id, %method, url, "Upstream request");

        let mut req = self
            .client
            .request(method.clone(), url)
            .header("X-Request-Id", request_id.to_string())
            .header("Accept", "application/json");

        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req.send().await.map_err(|e| {
            tracing::error!(%request_id, %method, url, "Upstream request failed: {e}");
            ApiError::from(e)
        })?;

        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();

        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!(%request_id, %method, url, "Upstream rejected the session token");
            return Err(ApiError::Unauthorized);
        }

        if !status.is_success() {
            let message = error_text::extract_from_text(&text).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            });
            tracing::warn!(%request_id, %method, url, status = status.as_u16(), "Upstream error: {message}");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

fn decode<T: DeserializeOwned>(path: &str, value: Value) -> Result<T, ApiError> {
    // Empty 2xx bodies decode as an empty object for reply structs
    if value.is_null() {
        if let Ok(decoded) = serde_json::from_value(Value::Object(serde_json::Map::new())) {
            return Ok(decoded);
        }
    }
    serde_json::from_value(value).map_err(|e| ApiError::Decode(format!("{path}: {e}")))
}
