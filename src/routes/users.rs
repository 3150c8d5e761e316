use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use axum_extra::extract::CookieJar;

use crate::api::ApiError;
use crate::auth::session::Session;
use crate::error::AppError;
use crate::forms::{BulkForm, FlagForm, RegisterForm};
use crate::models::{BulkAction, User};
use crate::notify::{self, Notice};
use crate::state::SharedState;
use crate::views::users::{detail_fragment, register_form, row_fragment};
use crate::views::toast_only;

const LIST_PATH: &str = "/dashboard/users/list";

pub async fn activate(
    session: Session,
    State(state): State<SharedState>,
    Path(uid): Path<String>,
) -> Result<Response, AppError> {
    set_active(&state, &session, &uid, true).await
}

pub async fn deactivate(
    session: Session,
    State(state): State<SharedState>,
    Path(uid): Path<String>,
) -> Result<Response, AppError> {
    set_active(&state, &session, &uid, false).await
}

/// Swap the single affected row. A complete returned user is rendered as is;
/// otherwise the record is re-read and the returned fields merged over it.
async fn set_active(
    state: &SharedState,
    session: &Session,
    uid: &str,
    active: bool,
) -> Result<Response, AppError> {
    let verb = if active { "activated" } else { "deactivated" };
    let result = if active {
        state.api.activate_user(&session.token, uid).await
    } else {
        state.api.deactivate_user(&session.token, uid).await
    };

    let reply = match result {
        Ok(reply) => reply,
        Err(ApiError::Unauthorized) => return Err(ApiError::Unauthorized.into()),
        Err(e) => {
            tracing::error!(uid, "Failed to update user status: {e}");
            return toast_only(Notice::error("Failed to update user", e.message()));
        }
    };

    let mut user = match reply.full_user() {
        Some(user) => user,
        None => match state.api.user_detail(&session.token, uid).await {
            Ok(mut user) => {
                if let Some(patch) = &reply.user {
                    user.merge_patch(patch);
                }
                user
            }
            Err(ApiError::Unauthorized) => return Err(ApiError::Unauthorized.into()),
            Err(e) => {
                tracing::warn!(uid, "User {verb} but could not be re-read: {e}");
                // The row is stale; have htmx reload the page
                return Ok((
                    [("hx-refresh", "true")],
                    toast_only(Notice::success("User updated", format!("User {verb}")))?,
                )
                    .into_response());
            }
        },
    };
    user.is_active = active;

    tracing::info!(uid, "User {verb}");
    let message = reply
        .message
        .or(reply.detail)
        .unwrap_or_else(|| format!("{} was {verb}.", user.name()));
    Ok(row_fragment(&user, Notice::success("User updated", message))?.into_response())
}

pub async fn update_flag(
    session: Session,
    State(state): State<SharedState>,
    Path(uid): Path<String>,
    Form(form): Form<FlagForm>,
) -> Result<Response, AppError> {
    let value = form.value();

    match state
        .api
        .update_user_flag(&session.token, &uid, form.flag, value)
        .await
    {
        Ok(reply) => {
            let mut user: User = match reply.full_user() {
                Some(user) => user,
                None => match state.api.user_detail(&session.token, &uid).await {
                    Ok(mut user) => {
                        if let Some(patch) = &reply.user {
                            user.merge_patch(patch);
                        }
                        user
                    }
                    Err(ApiError::Unauthorized) => return Err(ApiError::Unauthorized.into()),
                    Err(e) => {
                        let message = e.message();
                        return Ok(detail_fragment(
                            None,
                            Some(message.clone()),
                            Some(Notice::error("Failed to reload user", message)),
                        )?
                        .into_response());
                    }
                },
            };
            form.flag.apply(&mut user, value);

            tracing::info!(uid = %uid, flag = form.flag.field(), value, "User flag updated");
            let state_word = if value { "enabled" } else { "disabled" };
            let notice = Notice::success(
                "User updated",
                format!("{} {state_word}.", form.flag.label()),
            );
            Ok(detail_fragment(Some(&user), None, Some(notice))?.into_response())
        }
        Err(ApiError::Unauthorized) => Err(ApiError::Unauthorized.into()),
        Err(e) => {
            tracing::error!(uid = %uid, "Failed to update user flag: {e}");
            let message = e.message();
            let notice = Some(Notice::error("Failed to update user", message.clone()));
            // Keep showing the record, now with the error banner
            let user = state.api.user_detail(&session.token, &uid).await.ok();
            Ok(detail_fragment(user.as_ref(), Some(message), notice)?.into_response())
        }
    }
}

pub async fn bulk_action(
    session: Session,
    State(state): State<SharedState>,
    jar: CookieJar,
    axum_extra::extract::Form(form): axum_extra::extract::Form<BulkForm>,
) -> Result<Response, AppError> {
    let user_ids = form.selected();
    if user_ids.is_empty() {
        let jar = notify::set_flash(
            jar,
            &Notice::error("Nothing selected", "Select at least one user first."),
        );
        return Ok((jar, Redirect::to(LIST_PATH)).into_response());
    }

    let count = user_ids.len();
    let action = BulkAction {
        action: form.action,
        user_ids,
    };

    let notice = match state.api.bulk_action(&session.token, &action).await {
        Ok(reply) => {
            tracing::info!(count, "Bulk action {:?} applied", form.action);
            let message = reply.message.or(reply.detail).unwrap_or_else(|| {
                format!("{count} user(s) {}.", form.action.past_tense())
            });
            Notice::success("Bulk action complete", message)
        }
        Err(ApiError::Unauthorized) => return Err(ApiError::Unauthorized.into()),
        Err(e) => {
            tracing::error!("Bulk action failed: {e}");
            Notice::error("Bulk action failed", e.message())
        }
    };

    let jar = notify::set_flash(jar, &notice);
    Ok((jar, Redirect::to(&format!("{LIST_PATH}?page=1"))).into_response())
}

pub async fn register(
    session: Session,
    State(state): State<SharedState>,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    let new_user = match form.validate() {
        Ok(user) => user,
        Err(e) => {
            let page = register_form(
                &state,
                &form,
                Some(e.0.clone()),
                None,
                Some(Notice::error("Registration failed", e.0)),
            )?;
            return Ok(page.into_response());
        }
    };

    let token = state.registration_token(&session.token);
    match state.api.register_user(token, &new_user).await {
        Ok(_) => {
            tracing::info!("Registered user {} {}", new_user.first_name, new_user.last_name);
            let page = register_form(
                &state,
                &RegisterForm::default(),
                None,
                Some("User registered successfully".to_string()),
                Some(Notice::success(
                    "User registered",
                    format!("{} {} can now sign in.", new_user.first_name, new_user.last_name),
                )),
            )?;
            Ok(page.into_response())
        }
        // A rejected service token is a configuration problem, not an expired session
        Err(ApiError::Unauthorized) if state.config.api_token.is_none() => {
            Err(ApiError::Unauthorized.into())
        }
        Err(e) => {
            tracing::error!("Registration failed: {e}");
            let message = e.message();
            let page = register_form(
                &state,
                &form,
                Some(message.clone()),
                None,
                Some(Notice::error("Registration failed", message)),
            )?;
            Ok(page.into_response())
        }
    }
}
