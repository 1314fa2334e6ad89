//! Settings API Module
//!
//! Business hours, taxes, the manual kill switch and the order-number
//! start value. Writes that affect availability poke the watcher for an
//! immediate forced re-evaluation.

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::AppState;

/// Settings router
pub fn router() -> Router<AppState> {
    Router::new().nest("/api/settings", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/hours", get(handler::get_hours).put(handler::put_hours))
        .route("/taxes", get(handler::get_taxes).put(handler::put_taxes))
        .route("/unavailable", put(handler::put_unavailable))
        .route(
            "/order-number-start",
            get(handler::get_order_number_start).put(handler::put_order_number_start),
        )
}
