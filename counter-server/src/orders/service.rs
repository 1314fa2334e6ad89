//! Order operations
//!
//! Checkout and status transitions. Each successful mutation publishes a
//! full-row feed event after commit; a failed insert after number
//! assignment leaves a gap in the sequence, which is acceptable — a
//! blind retry could hand out a duplicate number, which is not.

use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::core::AppState;
use crate::db::repository::{order as order_repo, settings};
use crate::orders::lifecycle;
use crate::utils::{AppError, AppResult};
use shared::feed::FeedEvent;
use shared::models::{Order, OrderCreate, OrderCreated, OrderStatusUpdate};
use shared::util::now_millis;

/// Create an order from a checkout payload
pub async fn create_order(state: &AppState, payload: OrderCreate) -> AppResult<OrderCreated> {
    payload.validate()?;

    if !state.availability.is_accepting_orders() {
        let message = match state.availability.current().cause() {
            Some(crate::availability::UnavailableCause::OutsideHours) => {
                "The store is currently closed"
            }
            _ => "Ordering is temporarily unavailable",
        };
        return Err(AppError::BusinessRule(message.to_string()));
    }

    let order_number = settings::next_order_number(&state.pool).await?;

    // Location rides along only when the customer opted in
    let current_location = if payload.share_location {
        payload.current_location
    } else {
        None
    };

    let order = Order {
        id: Uuid::new_v4(),
        order_number,
        user_id: payload.user_id,
        items: payload.items.into_iter().map(Into::into).collect(),
        status: Default::default(),
        pickup_time: payload.pickup_time,
        collection_time_minutes: None,
        estimated_ready_at: None,
        created_at: now_millis(),
        share_location: payload.share_location,
        current_location,
    };

    if let Err(e) = order_repo::insert(&state.pool, &order).await {
        // The number was already consumed; the sequence now has a gap
        warn!(order_number, error = %e, "order insert failed after number assignment");
        return Err(e.into());
    }

    info!(
        order_id = %order.id,
        order_number,
        items = order.items.len(),
        "order created"
    );
    state.feed.publish(FeedEvent::insert(order.clone()));

    Ok(OrderCreated {
        id: order.id,
        order_number,
    })
}

/// Request a status transition through the state machine
///
/// Requesting the current status is an idempotent success; an edge not
/// in the table is rejected and the order is left unchanged.
pub async fn update_status(
    state: &AppState,
    id: Uuid,
    request: OrderStatusUpdate,
) -> AppResult<Order> {
    let order = order_repo::get(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Order not found: {}", id)))?;

    let plan = lifecycle::plan_transition(
        &order,
        request.status,
        request.collection_time_minutes,
        now_millis(),
    )?;

    if !plan.changed {
        return Ok(order);
    }

    let updated = order_repo::update_status(
        &state.pool,
        &state.capabilities,
        id,
        &order_repo::StatusWrite {
            status: plan.status,
            set_collection: plan.sets_collection,
            collection_time_minutes: plan.collection_time_minutes,
            estimated_ready_at: plan.estimated_ready_at,
        },
    )
    .await?;

    info!(
        order_id = %id,
        order_number = updated.order_number,
        from = %order.status,
        to = %updated.status,
        "order status updated"
    );
    state.feed.publish(FeedEvent::update(updated.clone()));

    Ok(updated)
}
