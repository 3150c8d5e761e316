use askama::Template;
use axum::extract::State;
use axum::response::{Html, IntoResponse, Response};
use axum_extra::extract::CookieJar;

use crate::api::ApiError;
use crate::auth::session::Session;
use crate::error::AppError;
use crate::forms::{NetworkForm, NETWORK_CODE_MAX};
use crate::models::Country;
use crate::notify::{self, Notice};
use crate::state::SharedState;
use crate::views::{render, Layout};

pub struct CountryOption {
    pub key: String,
    pub label: String,
    pub selected: bool,
}

#[derive(Template)]
#[template(path = "network/create.html")]
struct CreateNetworkTemplate {
    layout: Layout,
    form: NetworkForm,
    countries: Vec<CountryOption>,
    code_max: usize,
    error: Option<String>,
}

#[derive(Template)]
#[template(path = "network/list.html")]
struct NetworkListTemplate {
    layout: Layout,
}

/// The country picker. A failed load leaves it empty and reports why.
pub async fn load_countries(
    state: &SharedState,
    token: &str,
) -> Result<(Vec<Country>, Option<Notice>), AppError> {
    match state.api.list_countries(token).await {
        Ok(countries) => Ok((countries, None)),
        Err(ApiError::Unauthorized) => Err(ApiError::Unauthorized.into()),
        Err(e) => {
            tracing::error!("Failed to load countries: {e}");
            Ok((
                Vec::new(),
                Some(Notice::error("Failed to load countries", e.message())),
            ))
        }
    }
}

pub fn create_form(
    state: &SharedState,
    form: NetworkForm,
    countries: &[Country],
    error: Option<String>,
    notice: Option<Notice>,
) -> Result<Html<String>, AppError> {
    let selected = form.country.trim().to_string();
    let countries = countries
        .iter()
        .filter_map(|c| {
            let key = c.key()?.to_string();
            Some(CountryOption {
                selected: key == selected,
                label: c.label(),
                key,
            })
        })
        .collect();

    render(&CreateNetworkTemplate {
        layout: Layout::new(state, "Create network", "network").with_notice(notice),
        form,
        countries,
        code_max: NETWORK_CODE_MAX,
        error,
    })
}

pub async fn create_page(
    session: Session,
    State(state): State<SharedState>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let (jar, flash) = notify::take_flash(jar);
    let (countries, load_error) = load_countries(&state, &session.token).await?;
    let page = create_form(
        &state,
        NetworkForm::blank(),
        &countries,
        None,
        load_error.or(flash),
    )?;
    Ok((jar, page).into_response())
}

/// Landing page after a network is created.
pub async fn list_page(
    _session: Session,
    State(state): State<SharedState>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let (jar, flash) = notify::take_flash(jar);
    let template = NetworkListTemplate {
        layout: Layout::new(&state, "Networks", "network").with_notice(flash),
    };
    Ok((jar, render(&template)?).into_response())
}
