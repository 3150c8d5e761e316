pub mod auth;
pub mod network;
pub mod profile;
pub mod users;

use axum::routing::post;
use axum::Router;

use crate::state::SharedState;

/// Form and htmx submissions. Reads live in `views`.
pub fn action_routes() -> Router<SharedState> {
    Router::new()
        // Auth
        .route("/sign-in", post(auth::sign_in))
        .route("/sign-out", post(auth::sign_out))
        // Users
        .route("/dashboard/users/{uid}/activate", post(users::activate))
        .route("/dashboard/users/{uid}/deactivate", post(users::deactivate))
        .route("/dashboard/users/{uid}/flags", post(users::update_flag))
        .route("/dashboard/users/bulk-action", post(users::bulk_action))
        .route("/dashboard/users/register", post(users::register))
        // Networks
        .route("/dashboard/network/create", post(network::create))
        // Profile
        .route("/dashboard/profile", post(profile::update))
}
