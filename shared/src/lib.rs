//! Shared types for the brew-counter storefront
//!
//! Common types used across crates: order and settings models,
//! change-feed event types, and utility functions.

pub mod feed;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

// Feed re-exports (for convenient access)
pub use feed::{FeedEvent, FeedEventKind};
