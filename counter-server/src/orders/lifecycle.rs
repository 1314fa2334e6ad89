//! Order status lifecycle
//!
//! Five statuses, four forward edges, two cancellation edges:
//!
//! ```text
//! pending ──▶ preparing ──▶ ready ──▶ collected
//!    │            │
//!    └──▶ cancelled ◀──────┘ (from pending / preparing only)
//! ```
//!
//! `ready` orders cannot be cancelled — they are already made. Requesting
//! the current status again is an idempotent no-op; every other pair not
//! in the table is rejected and the order is left unchanged. The
//! `preparing → ready` edge also fires automatically once the estimate
//! elapses; the scan driving that lives outside this module and uses
//! [`is_ready_due`].

use thiserror::Error;

use shared::models::{Order, OrderStatus};

/// Lifecycle errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("invalid transition: {from} -> {requested}")]
    InvalidTransition {
        from: OrderStatus,
        requested: OrderStatus,
    },

    #[error("invalid collection time: {0} minutes")]
    InvalidCollectionTime(i64),
}

/// Whether `from -> to` is a legal (non-identity) edge
pub fn can_transition(from: OrderStatus, to: OrderStatus) -> bool {
    use OrderStatus::*;
    matches!(
        (from, to),
        (Pending, Preparing)
            | (Pending, Cancelled)
            | (Preparing, Ready)
            | (Preparing, Cancelled)
            | (Ready, Collected)
    )
}

/// Planned result of a transition request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionPlan {
    pub status: OrderStatus,
    /// True when this plan writes anything (false = idempotent repeat)
    pub changed: bool,
    /// True when the collection-time fields are part of this plan
    pub sets_collection: bool,
    pub collection_time_minutes: Option<i64>,
    pub estimated_ready_at: Option<i64>,
}

/// Validate a transition request against the table
///
/// `collection_time_minutes` is only honored on the transition into
/// `preparing`, where it derives `estimated_ready_at = now + minutes`.
pub fn plan_transition(
    order: &Order,
    requested: OrderStatus,
    collection_time_minutes: Option<i64>,
    now: i64,
) -> Result<TransitionPlan, LifecycleError> {
    if requested == order.status {
        return Ok(TransitionPlan {
            status: order.status,
            changed: false,
            sets_collection: false,
            collection_time_minutes: order.collection_time_minutes,
            estimated_ready_at: order.estimated_ready_at,
        });
    }

    if !can_transition(order.status, requested) {
        return Err(LifecycleError::InvalidTransition {
            from: order.status,
            requested,
        });
    }

    if requested == OrderStatus::Preparing {
        if let Some(minutes) = collection_time_minutes
            && minutes <= 0
        {
            return Err(LifecycleError::InvalidCollectionTime(minutes));
        }
        let estimated_ready_at = collection_time_minutes.map(|minutes| now + minutes * 60_000);
        return Ok(TransitionPlan {
            status: requested,
            changed: true,
            sets_collection: true,
            collection_time_minutes,
            estimated_ready_at,
        });
    }

    Ok(TransitionPlan {
        status: requested,
        changed: true,
        sets_collection: false,
        collection_time_minutes: order.collection_time_minutes,
        estimated_ready_at: order.estimated_ready_at,
    })
}

/// Whether a `preparing` order's estimate has elapsed
pub fn is_ready_due(order: &Order, now: i64) -> bool {
    order.status == OrderStatus::Preparing
        && order.estimated_ready_at.is_some_and(|ready_at| now >= ready_at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{OrderItem, PickupTime};
    use uuid::Uuid;

    const NOW: i64 = 1_750_000_000_000;

    fn order_with_status(status: OrderStatus) -> Order {
        Order {
            id: Uuid::new_v4(),
            order_number: 1001,
            user_id: Uuid::new_v4(),
            items: vec![OrderItem {
                menu_item_id: "latte".to_string(),
                name: "Latte".to_string(),
                unit_price: 35.0,
                quantity: 2,
                variant: None,
                extras: vec![],
                notes: None,
            }],
            status,
            pickup_time: PickupTime::Asap,
            collection_time_minutes: None,
            estimated_ready_at: None,
            created_at: NOW - 60_000,
            share_location: false,
            current_location: None,
        }
    }

    const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Collected,
        OrderStatus::Cancelled,
    ];

    #[test]
    fn test_every_pair_outside_the_table_is_rejected() {
        for from in ALL {
            let order = order_with_status(from);
            for requested in ALL {
                let result = plan_transition(&order, requested, None, NOW);
                if requested == from {
                    assert!(!result.unwrap().changed, "{from} -> {requested}");
                } else if can_transition(from, requested) {
                    assert!(result.is_ok(), "{from} -> {requested}");
                } else {
                    assert_eq!(
                        result.unwrap_err(),
                        LifecycleError::InvalidTransition { from, requested },
                        "{from} -> {requested}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_table_edges() {
        use OrderStatus::*;
        assert!(can_transition(Pending, Preparing));
        assert!(can_transition(Pending, Cancelled));
        assert!(can_transition(Preparing, Ready));
        assert!(can_transition(Preparing, Cancelled));
        assert!(can_transition(Ready, Collected));
        // ready orders are already made
        assert!(!can_transition(Ready, Cancelled));
        // terminal statuses go nowhere
        assert!(!can_transition(Collected, Pending));
        assert!(!can_transition(Cancelled, Pending));
    }

    #[test]
    fn test_preparing_derives_estimated_ready_at() {
        let order = order_with_status(OrderStatus::Pending);
        let plan = plan_transition(&order, OrderStatus::Preparing, Some(15), NOW).unwrap();
        assert!(plan.changed);
        assert!(plan.sets_collection);
        assert_eq!(plan.collection_time_minutes, Some(15));
        assert_eq!(plan.estimated_ready_at, Some(NOW + 15 * 60_000));
    }

    #[test]
    fn test_preparing_without_estimate() {
        let order = order_with_status(OrderStatus::Pending);
        let plan = plan_transition(&order, OrderStatus::Preparing, None, NOW).unwrap();
        assert!(plan.sets_collection);
        assert_eq!(plan.estimated_ready_at, None);
    }

    #[test]
    fn test_non_positive_collection_time_rejected() {
        let order = order_with_status(OrderStatus::Pending);
        assert_eq!(
            plan_transition(&order, OrderStatus::Preparing, Some(0), NOW).unwrap_err(),
            LifecycleError::InvalidCollectionTime(0)
        );
    }

    #[test]
    fn test_cancel_after_preparing_then_ready_fails() {
        let mut order = order_with_status(OrderStatus::Pending);
        let plan = plan_transition(&order, OrderStatus::Preparing, Some(15), NOW).unwrap();
        order.status = plan.status;
        order.collection_time_minutes = plan.collection_time_minutes;
        order.estimated_ready_at = plan.estimated_ready_at;

        let plan = plan_transition(&order, OrderStatus::Cancelled, None, NOW).unwrap();
        assert!(plan.changed);
        order.status = plan.status;

        let err = plan_transition(&order, OrderStatus::Ready, None, NOW).unwrap_err();
        assert_eq!(
            err,
            LifecycleError::InvalidTransition {
                from: OrderStatus::Cancelled,
                requested: OrderStatus::Ready,
            }
        );
    }

    #[test]
    fn test_is_ready_due() {
        let mut order = order_with_status(OrderStatus::Preparing);
        order.estimated_ready_at = Some(NOW);
        assert!(is_ready_due(&order, NOW));
        assert!(is_ready_due(&order, NOW + 1));
        assert!(!is_ready_due(&order, NOW - 1));

        // No estimate: the countdown never fires
        order.estimated_ready_at = None;
        assert!(!is_ready_due(&order, NOW));

        // Only preparing orders are due
        let mut ready = order_with_status(OrderStatus::Ready);
        ready.estimated_ready_at = Some(NOW - 1000);
        assert!(!is_ready_due(&ready, NOW));
    }
}
