pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod forms;
pub mod listing;
pub mod middleware;
pub mod models;
pub mod notify;
pub mod profile;
pub mod rate_limit;
pub mod routes;
pub mod sequence;
pub mod state;
pub mod views;
pub mod worker;

use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::api::{ApiClient, ApiError};
use crate::config::Config;
use crate::middleware::auth_redirect::redirect_unauthorized;
use crate::profile::{ProfileProvider, StaticProfile, UpstreamProfile};
use crate::rate_limit::LoginRateLimiter;
use crate::sequence::RequestSequencer;
use crate::state::{AppState, SharedState};

pub fn build_state(config: Config) -> Result<SharedState, ApiError> {
    let api = ApiClient::new(
        &config.api_base_url,
        Duration::from_secs(config.api_timeout_secs),
        config.ordering_style,
    )?;

    let profiles: Arc<dyn ProfileProvider> = match &config.profile_endpoint {
        Some(path) => {
            tracing::info!("Profile served from {path}");
            Arc::new(UpstreamProfile::new(api.clone(), path.clone()))
        }
        None => {
            tracing::info!("No profile endpoint configured, using the demo profile");
            Arc::new(StaticProfile::new())
        }
    };

    let login_limiter = LoginRateLimiter::new(
        config.login_max_failures,
        Duration::from_secs(config.login_window_secs),
    );

    Ok(Arc::new(AppState {
        config,
        api,
        sequencer: RequestSequencer::new(),
        login_limiter,
        profiles,
    }))
}

pub fn build_app(state: SharedState) -> Router {
    let dashboard = Router::new()
        .merge(views::view_routes())
        .merge(routes::action_routes())
        .layer(axum::middleware::from_fn(redirect_unauthorized));

    Router::new()
        .merge(dashboard)
        .nest_service("/static", ServeDir::new("static"))
        .route("/health", axum::routing::get(health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                // Security headers
                .layer(SetResponseHeaderLayer::overriding(
                    HeaderName::from_static("x-content-type-options"),
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    HeaderName::from_static("x-frame-options"),
                    HeaderValue::from_static("DENY"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    HeaderName::from_static("referrer-policy"),
                    HeaderValue::from_static("strict-origin-when-cross-origin"),
                )),
        )
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
