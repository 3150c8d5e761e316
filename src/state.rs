use std::sync::Arc;

use crate::api::ApiClient;
use crate::config::Config;
use crate::profile::ProfileProvider;
use crate::rate_limit::LoginRateLimiter;
use crate::sequence::RequestSequencer;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub api: ApiClient,
    pub sequencer: RequestSequencer,
    pub login_limiter: LoginRateLimiter,
    pub profiles: Arc<dyn ProfileProvider>,
}

impl AppState {
    /// Bearer used for registration: the service token when configured,
    /// otherwise the caller's own session.
    pub fn registration_token<'a>(&'a self, session_token: &'a str) -> &'a str {
        self.config.api_token.as_deref().unwrap_or(session_token)
    }
}
