//! Order change-feed reducer
//!
//! Maintains a consistent in-memory order collection from a stream of
//! row-level insert/update/delete events:
//!
//! - one entry per id, latest write wins
//! - duplicate inserts are treated as updates (upstream may re-deliver)
//! - updates for unknown ids are treated as inserts
//! - deletes of unknown ids are no-ops
//! - iteration order is always `created_at` descending
//!
//! When scoped to one owner, events for other owners are dropped
//! silently — not an error, the feed is shared.

use uuid::Uuid;

use shared::feed::{FeedEvent, FeedEventKind};
use shared::models::Order;

/// Reduced view over the order change feed
#[derive(Debug, Default)]
pub struct OrderCache {
    orders: Vec<Order>,
    owner: Option<Uuid>,
}

impl OrderCache {
    /// Unscoped cache (sees every order)
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache scoped to a single owner's orders
    pub fn scoped_to(owner: Uuid) -> Self {
        Self {
            orders: Vec::new(),
            owner: Some(owner),
        }
    }

    /// Replace the contents from an initial fetch
    pub fn seed(&mut self, orders: Vec<Order>) {
        self.orders = match self.owner {
            Some(owner) => orders.into_iter().filter(|o| o.user_id == owner).collect(),
            None => orders,
        };
        self.resort();
    }

    /// Apply one feed event
    pub fn apply(&mut self, event: &FeedEvent) {
        if let Some(owner) = self.owner
            && event.order.user_id != owner
        {
            return;
        }

        match event.kind {
            FeedEventKind::Insert | FeedEventKind::Update => self.upsert(event.order.clone()),
            FeedEventKind::Delete => {
                self.orders.retain(|o| o.id != event.order.id);
            }
        }
    }

    fn upsert(&mut self, order: Order) {
        match self.orders.iter_mut().find(|o| o.id == order.id) {
            Some(existing) => *existing = order,
            None => self.orders.push(order),
        }
        self.resort();
    }

    fn resort(&mut self) {
        self.orders
            .sort_by_key(|o| std::cmp::Reverse(o.created_at));
    }

    /// Orders, newest first
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn get(&self, id: Uuid) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == id)
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}
