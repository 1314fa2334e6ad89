//! Settings API Handlers

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::availability::AvailabilityState;
use crate::core::AppState;
use crate::db::repository::settings;
use crate::utils::time::{parse_date, parse_hhmm};
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};
use shared::models::{CounterError, OrderNumberCounter, SpecialHour, TaxSettings, WeeklyHours};

/// Weekly schedule plus special date overrides
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoursSettings {
    pub weekly: WeeklyHours,
    #[serde(default)]
    pub special: Vec<SpecialHour>,
}

#[derive(Debug, Deserialize)]
pub struct UnavailableUpdate {
    pub unavailable: bool,
}

#[derive(Debug, Deserialize)]
pub struct OrderNumberStartUpdate {
    pub start: i64,
}

/// Get business hours
pub async fn get_hours(State(state): State<AppState>) -> AppResult<Json<HoursSettings>> {
    let weekly = settings::weekly_hours(&state.pool).await?;
    let special = settings::special_hours(&state.pool).await?;
    Ok(Json(HoursSettings { weekly, special }))
}

/// Replace business hours
pub async fn put_hours(
    State(state): State<AppState>,
    Json(payload): Json<HoursSettings>,
) -> AppResult<Json<AppResponse<HoursSettings>>> {
    validate_hours(&payload)?;
    settings::set_weekly_hours(&state.pool, &payload.weekly).await?;
    settings::set_special_hours(&state.pool, &payload.special).await?;

    // 营业时间变了，营业状态立即重估
    state.notify_config_changed();
    Ok(ok(payload))
}

fn validate_hours(payload: &HoursSettings) -> AppResult<()> {
    let weekly = &payload.weekly;
    for day in [
        &weekly.monday,
        &weekly.tuesday,
        &weekly.wednesday,
        &weekly.thursday,
        &weekly.friday,
        &weekly.saturday,
        &weekly.sunday,
    ] {
        parse_hhmm(&day.start_time)?;
        parse_hhmm(&day.end_time)?;
    }
    for special in &payload.special {
        parse_date(&special.date)?;
        parse_hhmm(&special.start_time)?;
        parse_hhmm(&special.end_time)?;
    }
    Ok(())
}

/// Get tax settings
pub async fn get_taxes(State(state): State<AppState>) -> AppResult<Json<TaxSettings>> {
    let taxes = settings::tax_settings(&state.pool).await?;
    Ok(Json(taxes))
}

/// Update tax settings
pub async fn put_taxes(
    State(state): State<AppState>,
    Json(payload): Json<TaxSettings>,
) -> AppResult<Json<AppResponse<TaxSettings>>> {
    settings::set_tax_settings(&state.pool, &payload).await?;
    Ok(ok(payload))
}

/// Flip the manual kill switch
///
/// The new availability is evaluated on the spot (forced, no floor) so
/// the response already reflects the change.
pub async fn put_unavailable(
    State(state): State<AppState>,
    Json(payload): Json<UnavailableUpdate>,
) -> AppResult<Json<AppResponse<AvailabilityState>>> {
    settings::set_manual_unavailable(&state.pool, payload.unavailable).await?;
    let outcome = state.availability.refresh(true).await?;
    state.notify_config_changed();

    let message = if payload.unavailable {
        "Ordering disabled"
    } else {
        "Ordering enabled"
    };
    Ok(ok_with_message(outcome.state, message))
}

/// Get the order-number counter
pub async fn get_order_number_start(
    State(state): State<AppState>,
) -> AppResult<Json<OrderNumberCounter>> {
    let counter = settings::order_counter(&state.pool).await?;
    Ok(Json(counter))
}

/// Move the order-number start value
///
/// Only possible while no order number has been assigned; afterwards the
/// counter is locked and the request is rejected with a conflict.
pub async fn put_order_number_start(
    State(state): State<AppState>,
    Json(payload): Json<OrderNumberStartUpdate>,
) -> AppResult<Json<OrderNumberCounter>> {
    // Sequencing rules first: range check and lock check
    let mut counter = settings::order_counter(&state.pool).await?;
    counter.set_start(payload.start)?;

    // Guarded write — a checkout may have advanced the counter since the
    // read above; the guard fails rather than overwriting an assignment.
    if !settings::write_counter_start(&state.pool, payload.start).await? {
        let fresh = settings::order_counter(&state.pool).await?;
        return Err(AppError::from(CounterError::CounterLocked {
            assigned: fresh.current_value - fresh.start_value,
        }));
    }

    Ok(Json(counter))
}
