use std::time::Duration;

use tokio::sync::watch;

use crate::auth::session::SESSION_TTL;
use crate::state::SharedState;

const SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Evict expired per-session and per-identifier state until shutdown is
/// signaled.
pub async fn run_housekeeping(state: SharedState, mut shutdown: watch::Receiver<bool>) {
    let mut interval = tokio::time::interval(SWEEP_INTERVAL);
    // The first tick fires immediately and there is nothing to sweep yet
    interval.tick().await;

    loop {
        tokio::select! {
            _ = interval.tick() => sweep(&state),
            _ = shutdown.changed() => {
                tracing::info!("Housekeeping stopped");
                return;
            }
        }
    }
}

/// One housekeeping pass. Session state outlives its cookie by at most one
/// sweep interval.
pub fn sweep(state: &SharedState) {
    let throttles = state.login_limiter.sweep();
    let widgets = state.sequencer.sweep(SESSION_TTL);
    let profiles = state.profiles.sweep(SESSION_TTL);
    tracing::debug!(
        throttles,
        widgets,
        profiles,
        sequenced_widgets = state.sequencer.len(),
        "Housekeeping sweep done"
    );
}
