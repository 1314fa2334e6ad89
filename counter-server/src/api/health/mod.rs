//! Health API

use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::core::AppState;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Health router
pub fn router() -> Router<AppState> {
    Router::new().route("/api/health", get(health))
}

async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        service: "counter-server",
        version: env!("CARGO_PKG_VERSION"),
    })
}
