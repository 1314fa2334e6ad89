//! Availability watcher
//!
//! Periodic re-evaluation of the accepting-orders signal. The poll runs
//! every `availability_poll_ms`; the service's ten-second floor
//! independently absorbs anything faster. `config_notify` short-circuits
//! the wait for a forced pass after an operator changes a setting.

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::core::AppState;

pub async fn run(state: AppState, shutdown: CancellationToken) {
    let mut interval =
        tokio::time::interval(std::time::Duration::from_millis(state.config.availability_poll_ms));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        let force = tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = interval.tick() => false,
            _ = state.config_notify.notified() => true,
        };

        match state.availability.refresh(force).await {
            Ok(outcome) => {
                if outcome.became_unavailable {
                    info!(
                        cause = ?outcome.state.cause(),
                        "storefront stopped accepting orders"
                    );
                } else if outcome.became_available {
                    info!("storefront accepting orders again");
                }
            }
            Err(e) => warn!(error = %e, "availability refresh failed"),
        }
    }
}
