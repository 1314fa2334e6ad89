//! Order change-feed events
//!
//! The store emits one event per committed row mutation, carrying the
//! full row payload. Delivery is per-id causally ordered upstream, but
//! consumers must tolerate duplicate inserts.

use serde::{Deserialize, Serialize};

use crate::models::Order;

/// Row-level change classification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeedEventKind {
    Insert,
    Update,
    Delete,
}

/// One change-feed notification with the full row payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedEvent {
    pub kind: FeedEventKind,
    pub order: Order,
}

impl FeedEvent {
    pub fn insert(order: Order) -> Self {
        Self {
            kind: FeedEventKind::Insert,
            order,
        }
    }

    pub fn update(order: Order) -> Self {
        Self {
            kind: FeedEventKind::Update,
            order,
        }
    }

    pub fn delete(order: Order) -> Self {
        Self {
            kind: FeedEventKind::Delete,
            order,
        }
    }
}
