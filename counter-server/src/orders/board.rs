//! Live order board
//!
//! A reducer-backed view of every order, kept current by a listener on
//! the change feed. The admin dashboard reads snapshots from it instead
//! of hitting the store on every poll. The board is owned by this server
//! instance; a lagged receiver re-seeds from the store.

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use super::reducer::OrderCache;
use crate::core::AppState;
use crate::db::repository::order as order_repo;
use shared::feed::FeedEvent;
use shared::models::Order;

/// Shared handle to the reduced order collection
#[derive(Debug, Clone, Default)]
pub struct OrderBoard {
    inner: Arc<RwLock<OrderCache>>,
}

impl OrderBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current orders, newest first
    pub fn snapshot(&self) -> Vec<Order> {
        self.inner.read().orders().to_vec()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    fn apply(&self, event: &FeedEvent) {
        self.inner.write().apply(event);
    }

    fn replace(&self, orders: Vec<Order>) {
        self.inner.write().seed(orders);
    }
}

/// Feed listener keeping the board current
pub async fn run(state: AppState, shutdown: CancellationToken) {
    // Subscribe before seeding so no event falls between the two
    let mut rx = state.feed.subscribe();
    seed(&state).await;

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            result = rx.recv() => match result {
                Ok(event) => state.board.apply(&event),
                Err(RecvError::Lagged(missed)) => {
                    warn!(missed, "order board lagged behind the feed, re-seeding");
                    seed(&state).await;
                }
                Err(RecvError::Closed) => break,
            }
        }
    }
}

async fn seed(state: &AppState) {
    match order_repo::list(&state.pool, None).await {
        Ok(orders) => state.board.replace(orders),
        Err(e) => warn!(error = %e, "order board seed failed; keeping previous view"),
    }
}
