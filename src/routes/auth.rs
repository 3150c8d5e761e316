use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use axum_extra::extract::CookieJar;

use crate::api::ApiError;
use crate::auth::session::{clear_session_cookie, session_cookie, ACCESS_COOKIE};
use crate::error::AppError;
use crate::forms::SignInForm;
use crate::notify::{self, Notice};
use crate::state::SharedState;
use crate::views::auth::sign_in_failed;

pub async fn sign_in(
    State(state): State<SharedState>,
    jar: CookieJar,
    Form(form): Form<SignInForm>,
) -> Result<Response, AppError> {
    let identifier = form.identifier.trim();
    if identifier.is_empty() || form.password.is_empty() {
        return sign_in_failed(identifier, "Identifier and password are required");
    }

    if let Err(throttled) = state.login_limiter.check(identifier) {
        tracing::warn!(identifier, retry_after = ?throttled.retry_after, "Sign-in throttled");
        return sign_in_failed(
            identifier,
            format!(
                "Too many sign-in attempts. Try again in {} minute(s).",
                throttled.minutes()
            ),
        );
    }

    match state.api.login(identifier, &form.password).await {
        Ok(token) => {
            state.login_limiter.record_success(identifier);
            tracing::info!(identifier, "Signed in");
            let jar = jar.add(session_cookie(&token, state.config.secure_cookies));
            let jar = notify::set_flash(jar, &Notice::success("Signed in", "Welcome back."));
            Ok((jar, Redirect::to("/dashboard")).into_response())
        }
        Err(e @ ApiError::Status { status: 400 | 401 | 403, .. }) => {
            state.login_limiter.record_failure(identifier);
            tracing::info!(identifier, "Sign-in rejected: {e}");
            sign_in_failed(identifier, e.message())
        }
        Err(e) => {
            tracing::error!("Sign-in request failed: {e}");
            sign_in_failed(identifier, e.message())
        }
    }
}

pub async fn sign_out(State(state): State<SharedState>, jar: CookieJar) -> impl IntoResponse {
    if let Some(cookie) = jar.get(ACCESS_COOKIE) {
        state.sequencer.forget(cookie.value());
    }
    let jar = jar.add(clear_session_cookie());
    let jar = notify::set_flash(jar, &Notice::success("Signed out", "You have been signed out."));
    (jar, Redirect::to("/sign-in"))
}
