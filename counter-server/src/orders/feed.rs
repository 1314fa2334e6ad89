//! In-process order change feed
//!
//! Wraps a broadcast channel: repositories publish one event per
//! committed order mutation, any number of subscribers consume. A
//! subscriber that falls behind sees `Lagged` and should re-seed from
//! the store.

use tokio::sync::broadcast;
use tracing::trace;

use shared::feed::FeedEvent;

const DEFAULT_CAPACITY: usize = 1024;

/// Order change-feed bus
#[derive(Debug, Clone)]
pub struct FeedBus {
    tx: broadcast::Sender<FeedEvent>,
}

impl FeedBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish one event to all current subscribers
    ///
    /// No subscribers is fine — the event is simply dropped.
    pub fn publish(&self, event: FeedEvent) {
        match self.tx.send(event) {
            Ok(receivers) => trace!(receivers, "feed event published"),
            Err(_) => trace!("feed event dropped (no subscribers)"),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FeedEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for FeedBus {
    fn default() -> Self {
        Self::new()
    }
}
