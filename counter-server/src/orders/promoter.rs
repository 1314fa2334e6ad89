//! Ready promoter
//!
//! The countdown to `ready` is server-authoritative: clients only derive
//! remaining time from `estimated_ready_at`. This periodic scan promotes
//! `preparing` orders whose estimate has elapsed, through the same
//! transition path operators use, so the feed sees a normal update.

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::{lifecycle, service};
use crate::core::AppState;
use crate::db::repository::order as order_repo;
use crate::utils::AppResult;
use shared::models::{OrderStatus, OrderStatusUpdate};
use shared::util::now_millis;

pub async fn run(state: AppState, shutdown: CancellationToken) {
    let mut interval =
        tokio::time::interval(std::time::Duration::from_millis(state.config.ready_promote_ms));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = interval.tick() => {
                if let Err(e) = promote_due_orders(&state).await {
                    warn!(error = %e, "ready promotion scan failed");
                }
            }
        }
    }
}

/// Promote every `preparing` order whose estimate has elapsed
pub async fn promote_due_orders(state: &AppState) -> AppResult<usize> {
    let now = now_millis();
    let preparing = order_repo::list_by_status(&state.pool, OrderStatus::Preparing).await?;

    let mut promoted = 0;
    for order in preparing {
        if !lifecycle::is_ready_due(&order, now) {
            continue;
        }
        match service::update_status(
            state,
            order.id,
            OrderStatusUpdate {
                status: OrderStatus::Ready,
                collection_time_minutes: None,
            },
        )
        .await
        {
            Ok(_) => {
                info!(order_number = order.order_number, "countdown elapsed, order ready");
                promoted += 1;
            }
            // Lost a race with an operator transition; nothing to do
            Err(e) => warn!(order_id = %order.id, error = %e, "ready promotion skipped"),
        }
    }
    Ok(promoted)
}
