//! Availability API Module

mod handler;

use axum::{Router, routing::get};

use crate::core::AppState;

/// Availability router
pub fn router() -> Router<AppState> {
    Router::new().route("/api/availability", get(handler::status))
}
