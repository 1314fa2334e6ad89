//! Availability API Handlers

use axum::{Json, extract::State};

use crate::availability::AvailabilityReport;
use crate::core::AppState;
use crate::utils::AppResult;

/// Current availability plus hours messaging
///
/// Triggers a floored refresh first so a fresh page load is never more
/// than the floor behind, then reports the evaluated state.
pub async fn status(State(state): State<AppState>) -> AppResult<Json<AvailabilityReport>> {
    state.availability.refresh(false).await?;
    let report = state.availability.describe().await?;
    Ok(Json(report))
}
