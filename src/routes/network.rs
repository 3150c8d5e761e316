use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use axum_extra::extract::CookieJar;

use crate::api::ApiError;
use crate::auth::session::Session;
use crate::error::AppError;
use crate::forms::NetworkForm;
use crate::notify::{self, Notice};
use crate::state::SharedState;
use crate::views::network::{create_form, load_countries};

pub async fn create(
    session: Session,
    State(state): State<SharedState>,
    jar: CookieJar,
    Form(form): Form<NetworkForm>,
) -> Result<Response, AppError> {
    let network = match form.validate() {
        Ok(network) => network,
        Err(e) => return rerender(&state, &session, form, e.0).await,
    };

    match state.api.create_network(&session.token, &network).await {
        Ok(_) => {
            tracing::info!(code = %network.code, "Network created");
            let jar = notify::set_flash(
                jar,
                &Notice::success(
                    "Network created",
                    format!("{} ({}) was created.", network.nom, network.code),
                ),
            );
            Ok((jar, Redirect::to("/dashboard/network/list")).into_response())
        }
        Err(ApiError::Unauthorized) => Err(ApiError::Unauthorized.into()),
        Err(e) => {
            tracing::error!("Failed to create network: {e}");
            rerender(&state, &session, form, e.message()).await
        }
    }
}

/// Failed submit: the form keeps its values, the picker is reloaded.
async fn rerender(
    state: &SharedState,
    session: &Session,
    form: NetworkForm,
    error: String,
) -> Result<Response, AppError> {
    let (countries, _) = load_countries(state, &session.token).await?;
    let notice = Notice::error("Failed to create network", error.clone());
    Ok(create_form(state, form, &countries, Some(error), Some(notice))?.into_response())
}
