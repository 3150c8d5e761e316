use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::api::ApiError;

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    /// Missing or expired session. The redirect middleware turns the 401
    /// into a trip to the sign-in page.
    Unauthorized(String),
    Upstream(ApiError),
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Upstream(ApiError::Status { status: 404, .. }) => StatusCode::NOT_FOUND,
            AppError::Upstream(ApiError::Transport(_)) => StatusCode::GATEWAY_TIMEOUT,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// What the administrator gets to read. Internal details stay in the log.
    fn public_message(&self) -> String {
        match self {
            AppError::NotFound(msg) | AppError::Unauthorized(msg) => msg.clone(),
            AppError::Upstream(err) => err.message(),
            AppError::Internal(_) => "Something went wrong on our side.".to_string(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not Found: {msg}"),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {msg}"),
            AppError::Upstream(err) => write!(f, "Upstream Error: {err}"),
            AppError::Internal(msg) => write!(f, "Internal Error: {msg}"),
        }
    }
}

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorPage {
    code: u16,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::Upstream(_) | AppError::Internal(_) => tracing::error!("{self}"),
            AppError::NotFound(_) | AppError::Unauthorized(_) => tracing::debug!("{self}"),
        }

        let page = ErrorPage {
            code: status.as_u16(),
            message: self.public_message(),
        };
        match page.render() {
            Ok(body) => (status, Html(body)).into_response(),
            Err(e) => {
                tracing::error!("Failed to render error page: {e}");
                (status, page.message).into_response()
            }
        }
    }
}

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized => AppError::Unauthorized("Session expired".to_string()),
            other => AppError::Upstream(other),
        }
    }
}

impl From<askama::Error> for AppError {
    fn from(err: askama::Error) -> Self {
        AppError::Internal(format!("Template rendering failed: {err}"))
    }
}
