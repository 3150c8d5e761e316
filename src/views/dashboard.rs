use askama::Template;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::CookieJar;

use crate::auth::session::Session;
use crate::error::AppError;
use crate::notify;
use crate::state::SharedState;
use crate::views::{render, Layout};

#[derive(Template)]
#[template(path = "dashboard/index.html")]
struct DashboardTemplate {
    layout: Layout,
    greeting: String,
}

pub async fn index(
    session: Session,
    State(state): State<SharedState>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let (jar, notice) = notify::take_flash(jar);

    let greeting = match state.profiles.load(&session.token).await {
        Ok(profile) => profile
            .display_name
            .filter(|n| !n.trim().is_empty())
            .or(profile.first_name)
            .unwrap_or_else(|| "Administrator".to_string()),
        Err(e) => {
            tracing::warn!("Could not load profile for greeting: {e}");
            session.subject.unwrap_or_else(|| "Administrator".to_string())
        }
    };

    let template = DashboardTemplate {
        layout: Layout::new(&state, "Dashboard", "dashboard").with_notice(notice),
        greeting,
    };
    Ok((jar, render(&template)?).into_response())
}
