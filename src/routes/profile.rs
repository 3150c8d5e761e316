use axum::extract::State;
use axum::response::{Html, IntoResponse, Response};
use axum::Form;

use crate::api::ApiError;
use crate::auth::session::Session;
use crate::error::AppError;
use crate::forms::validate_profile;
use crate::models::ProfileUpdate;
use crate::notify::Notice;
use crate::state::SharedState;
use crate::views::profile::{profile_page, ProfilePage};

pub async fn update(
    session: Session,
    State(state): State<SharedState>,
    Form(form): Form<ProfileUpdate>,
) -> Result<Response, AppError> {
    let update = match validate_profile(&form) {
        Ok(update) => update,
        Err(e) => return failed(&state, &session, form, e.0).await.map(IntoResponse::into_response),
    };

    match state.profiles.update(&session.token, &update).await {
        Ok(profile) => {
            tracing::info!(uid = %profile.uid, "Profile updated");
            let page = ProfilePage {
                form: ProfileUpdate::from_profile(&profile),
                profile: Some(profile),
                error: None,
                success: Some("Profile updated successfully".to_string()),
                notice: Some(Notice::success("Profile updated", "Your changes were saved.")),
            };
            Ok(profile_page(&state, page)?.into_response())
        }
        Err(ApiError::Unauthorized) => Err(ApiError::Unauthorized.into()),
        Err(e) => {
            tracing::error!("Failed to update profile: {e}");
            failed(&state, &session, form, e.message())
                .await
                .map(IntoResponse::into_response)
        }
    }
}

async fn failed(
    state: &SharedState,
    session: &Session,
    form: ProfileUpdate,
    error: String,
) -> Result<Html<String>, AppError> {
    let profile = state.profiles.load(&session.token).await.ok();
    profile_page(
        state,
        ProfilePage {
            profile,
            form,
            notice: Some(Notice::error("Failed to update profile", error.clone())),
            error: Some(error),
            success: None,
        },
    )
}
