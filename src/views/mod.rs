pub mod auth;
pub mod dashboard;
pub mod logs;
pub mod network;
pub mod partners;
pub mod profile;
pub mod table;
pub mod users;

use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;

use crate::error::AppError;
use crate::notify::Notice;
use crate::state::SharedState;

pub fn view_routes() -> Router<SharedState> {
    Router::new()
        // Auth views
        .route("/", get(auth::sign_in_page))
        .route("/sign-in", get(auth::sign_in_page))
        // Dashboard
        .route("/dashboard", get(dashboard::index))
        // Users
        .route("/dashboard/users/list", get(users::list_page))
        .route("/dashboard/users/register", get(users::register_page))
        // Partners
        .route("/dashboard/partner", get(partners::list_page))
        // Logs
        .route("/dashboard/sms-logs/list", get(logs::sms_page))
        .route("/dashboard/fcm-logs/list", get(logs::fcm_page))
        // Networks
        .route("/dashboard/network/create", get(network::create_page))
        .route("/dashboard/network/list", get(network::list_page))
        // Profile
        .route("/dashboard/profile", get(profile::show))
        // HTMX partials
        .route("/htmx/users/table", get(users::table_partial))
        .route("/htmx/users/{uid}", get(users::detail_modal))
        .route("/htmx/partners/table", get(partners::table_partial))
        .route("/htmx/partners/{uid}", get(partners::detail_modal))
        .route("/htmx/sms-logs/table", get(logs::sms_table))
        .route("/htmx/fcm-logs/table", get(logs::fcm_table))
}

/// Page chrome shared by every full page through `base.html`.
pub struct Layout {
    pub title: &'static str,
    pub active: &'static str,
    pub partners_enabled: bool,
    pub notice: Option<Notice>,
}

impl Layout {
    pub fn new(state: &SharedState, title: &'static str, active: &'static str) -> Self {
        Self {
            title,
            active,
            partners_enabled: state.config.partners_enabled,
            notice: None,
        }
    }

    pub fn with_notice(mut self, notice: Option<Notice>) -> Self {
        self.notice = notice;
        self
    }
}

#[derive(Template)]
#[template(path = "partials/toast_only.html")]
struct ToastTemplate {
    notice: Option<Notice>,
}

pub fn render<T: Template>(template: &T) -> Result<Html<String>, AppError> {
    Ok(Html(template.render()?))
}

/// Answer for a partial whose request was superseded. htmx does not swap a
/// 204, so the newer table stays on screen.
pub fn superseded() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

/// Answer an htmx mutation with only a toast, leaving its target untouched.
pub fn toast_only(notice: Notice) -> Result<Response, AppError> {
    let html = render(&ToastTemplate {
        notice: Some(notice),
    })?;
    Ok(([("hx-retarget", "#toasts"), ("hx-reswap", "beforeend")], html).into_response())
}

pub(crate) fn text(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("N/A")
        .to_string()
}
