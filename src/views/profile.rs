use askama::Template;
use axum::extract::State;
use axum::response::{Html, IntoResponse, Response};
use axum_extra::extract::CookieJar;

use crate::api::ApiError;
use crate::auth::session::Session;
use crate::error::AppError;
use crate::models::de::format_timestamp;
use crate::models::{Profile, ProfileUpdate};
use crate::notify::{self, Notice};
use crate::state::SharedState;
use crate::views::{render, text, Layout};

pub struct ProfileView {
    pub uid: String,
    pub initials: String,
    pub display_name: String,
    pub email: String,
    pub phone: String,
    pub is_active: bool,
    pub email_verified: bool,
    pub phone_verified: bool,
    pub contact_method: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Profile> for ProfileView {
    fn from(p: &Profile) -> Self {
        Self {
            uid: p.uid.clone(),
            initials: p.initials(),
            display_name: text(p.display_name.as_deref()),
            email: text(p.email.as_deref()),
            phone: text(p.phone.as_deref()),
            is_active: p.is_active,
            email_verified: p.email_verified,
            phone_verified: p.phone_verified,
            contact_method: text(p.contact_method.as_deref()),
            created_at: format_timestamp(p.created_at.as_ref()),
            updated_at: format_timestamp(p.updated_at.as_ref()),
        }
    }
}

#[derive(Template)]
#[template(path = "profile/show.html")]
struct ProfileTemplate {
    layout: Layout,
    profile: Option<ProfileView>,
    form: ProfileUpdate,
    source: String,
    error: Option<String>,
    success: Option<String>,
}

pub struct ProfilePage {
    pub profile: Option<Profile>,
    pub form: ProfileUpdate,
    pub error: Option<String>,
    pub success: Option<String>,
    pub notice: Option<Notice>,
}

pub fn profile_page(state: &SharedState, page: ProfilePage) -> Result<Html<String>, AppError> {
    render(&ProfileTemplate {
        layout: Layout::new(state, "Profile", "profile").with_notice(page.notice),
        profile: page.profile.as_ref().map(ProfileView::from),
        form: page.form,
        source: state.profiles.source().to_string(),
        error: page.error,
        success: page.success,
    })
}

pub async fn show(
    session: Session,
    State(state): State<SharedState>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let (jar, flash) = notify::take_flash(jar);

    let page = match state.profiles.load(&session.token).await {
        Ok(profile) => ProfilePage {
            form: ProfileUpdate::from_profile(&profile),
            profile: Some(profile),
            error: None,
            success: None,
            notice: flash,
        },
        Err(ApiError::Unauthorized) => return Err(ApiError::Unauthorized.into()),
        Err(e) => {
            tracing::error!("Failed to load profile: {e}");
            let message = e.message();
            ProfilePage {
                profile: None,
                form: ProfileUpdate::default(),
                notice: Some(Notice::error("Failed to load profile", message.clone())),
                error: Some(message),
                success: None,
            }
        }
    };

    Ok((jar, profile_page(&state, page)?).into_response())
}
