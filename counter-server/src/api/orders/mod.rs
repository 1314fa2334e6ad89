//! Order API Module
//!
//! Checkout, order queries, status transitions and the live board.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::AppState;

/// Order router
pub fn router() -> Router<AppState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        // Checkout
        .route("/", post(handler::create).get(handler::list))
        // Live board (reducer-backed, no store hit)
        .route("/board", get(handler::board))
        // Single order
        .route("/{id}", get(handler::get_by_id))
        // Status transition
        .route("/{id}/status", post(handler::update_status))
}
