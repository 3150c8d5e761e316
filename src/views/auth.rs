use askama::Template;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;

use crate::auth::session::Session;
use crate::error::AppError;
use crate::notify::{self, Notice};
use crate::views::render;

#[derive(Template)]
#[template(path = "auth/sign_in.html")]
struct SignInTemplate {
    identifier: String,
    error: Option<String>,
    notice: Option<Notice>,
}

pub async fn sign_in_page(jar: CookieJar) -> Result<Response, AppError> {
    // If already signed in, go straight to the dashboard
    if Session::peek(&jar).is_some() {
        return Ok(Redirect::to("/dashboard").into_response());
    }

    let (jar, notice) = notify::take_flash(jar);
    let page = render(&SignInTemplate {
        identifier: String::new(),
        error: None,
        notice,
    })?;
    Ok((jar, page).into_response())
}

/// Re-render the sign-in form after a rejected attempt.
pub fn sign_in_failed(identifier: &str, error: impl Into<String>) -> Result<Response, AppError> {
    let error = error.into();
    let page = render(&SignInTemplate {
        identifier: identifier.to_string(),
        notice: Some(Notice::error("Sign-in failed", error.clone())),
        error: Some(error),
    })?;
    Ok(page.into_response())
}
