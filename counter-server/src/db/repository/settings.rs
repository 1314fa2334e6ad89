//! Settings Repository
//!
//! Settings are independent key-value rows; values are stored as JSON
//! text. A missing row is a valid state and reads as the documented
//! default. The order-number counter lives here too — its advance is a
//! single-statement read-increment-return so concurrent checkouts can
//! never be handed the same number.

use serde_json::Value;
use sqlx::SqlitePool;
use tracing::warn;

use super::{RepoError, RepoResult};
use shared::models::settings::{self, keys};
use shared::models::{
    DEFAULT_ORDER_NUMBER_START, OrderNumberCounter, SpecialHour, TaxSettings, WeeklyHours,
};
use shared::util::now_millis;

const START_DESCRIPTION: &str = "The starting number for the order numbering sequence";
const CURRENT_DESCRIPTION: &str =
    "The current order number counter - next order will use this number then increment";

// ============================================================================
// Raw key-value access
// ============================================================================

/// Read one setting row, parsed as JSON
///
/// Rows written by older admin builds may hold bare strings; those read
/// back as JSON strings rather than failing.
pub async fn get_value(pool: &SqlitePool, key: &str) -> RepoResult<Option<Value>> {
    let raw: Option<String> = sqlx::query_scalar("SELECT value FROM app_settings WHERE key = ?1")
        .bind(key)
        .fetch_optional(pool)
        .await?;
    Ok(raw.map(|r| serde_json::from_str(&r).unwrap_or(Value::String(r))))
}

/// Upsert one setting row
pub async fn put_value(
    pool: &SqlitePool,
    key: &str,
    value: &Value,
    description: Option<&str>,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO app_settings (key, value, description, updated_at)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(key) DO UPDATE SET
             value = excluded.value,
             description = COALESCE(excluded.description, app_settings.description),
             updated_at = excluded.updated_at",
    )
    .bind(key)
    .bind(value.to_string())
    .bind(description)
    .bind(now_millis())
    .execute(pool)
    .await?;
    Ok(())
}

// ============================================================================
// Business hours
// ============================================================================

/// Weekly schedule; defaults to always-open when unset
pub async fn weekly_hours(pool: &SqlitePool) -> RepoResult<WeeklyHours> {
    match get_value(pool, keys::WEEKLY_HOURS).await? {
        Some(value) => Ok(serde_json::from_value(value).unwrap_or_else(|e| {
            warn!("Stored weekly hours unreadable ({}), using default", e);
            WeeklyHours::always_open()
        })),
        None => Ok(WeeklyHours::always_open()),
    }
}

/// Special date overrides; defaults to none
pub async fn special_hours(pool: &SqlitePool) -> RepoResult<Vec<SpecialHour>> {
    match get_value(pool, keys::SPECIAL_HOURS).await? {
        Some(value) => Ok(serde_json::from_value(value).unwrap_or_else(|e| {
            warn!("Stored special hours unreadable ({}), using none", e);
            Vec::new()
        })),
        None => Ok(Vec::new()),
    }
}

/// Format validation lives at the API layer; this only persists
pub async fn set_weekly_hours(pool: &SqlitePool, hours: &WeeklyHours) -> RepoResult<()> {
    let value = serde_json::to_value(hours)
        .map_err(|e| RepoError::Validation(e.to_string()))?;
    put_value(pool, keys::WEEKLY_HOURS, &value, None).await
}

/// Replace the special overrides; at most one override per calendar date
pub async fn set_special_hours(pool: &SqlitePool, specials: &[SpecialHour]) -> RepoResult<()> {
    let mut seen = std::collections::HashSet::new();
    for special in specials {
        if !seen.insert(special.date.clone()) {
            return Err(RepoError::Validation(format!(
                "Duplicate special hours for date: {}",
                special.date
            )));
        }
    }
    let value = serde_json::to_value(specials)
        .map_err(|e| RepoError::Validation(e.to_string()))?;
    put_value(pool, keys::SPECIAL_HOURS, &value, None).await
}

// ============================================================================
// Availability flag and taxes
// ============================================================================

/// Operator kill switch; defaults to available
pub async fn manual_unavailable(pool: &SqlitePool) -> RepoResult<bool> {
    Ok(get_value(pool, keys::APP_UNAVAILABLE)
        .await?
        .as_ref()
        .and_then(settings::value_as_bool)
        .unwrap_or(false))
}

pub async fn set_manual_unavailable(pool: &SqlitePool, unavailable: bool) -> RepoResult<()> {
    put_value(pool, keys::APP_UNAVAILABLE, &Value::Bool(unavailable), None).await
}

/// Tax settings; defaults to enabled at the fixed default rate
pub async fn tax_settings(pool: &SqlitePool) -> RepoResult<TaxSettings> {
    let enabled = get_value(pool, keys::TAXES_ENABLED)
        .await?
        .as_ref()
        .and_then(settings::value_as_bool)
        .unwrap_or(true);
    let rate = get_value(pool, keys::TAX_RATE)
        .await?
        .as_ref()
        .and_then(settings::value_as_f64)
        .unwrap_or(settings::DEFAULT_TAX_RATE);
    Ok(TaxSettings { enabled, rate })
}

pub async fn set_tax_settings(pool: &SqlitePool, taxes: &TaxSettings) -> RepoResult<()> {
    if !(0.0..=1.0).contains(&taxes.rate) {
        return Err(RepoError::Validation(format!(
            "Tax rate out of range: {}",
            taxes.rate
        )));
    }
    put_value(pool, keys::TAXES_ENABLED, &Value::Bool(taxes.enabled), None).await?;
    put_value(pool, keys::TAX_RATE, &serde_json::json!(taxes.rate), None).await
}

// ============================================================================
// Order number counter
// ============================================================================

/// Seed the counter rows if they do not exist yet
async fn ensure_counter_seeded(pool: &SqlitePool) -> RepoResult<()> {
    let now = now_millis();
    sqlx::query(
        "INSERT OR IGNORE INTO app_settings (key, value, description, updated_at)
         VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(keys::ORDER_NUMBER_START)
    .bind(DEFAULT_ORDER_NUMBER_START.to_string())
    .bind(START_DESCRIPTION)
    .bind(now)
    .execute(pool)
    .await?;
    sqlx::query(
        "INSERT OR IGNORE INTO app_settings (key, value, description, updated_at)
         VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(keys::CURRENT_ORDER_NUMBER)
    .bind(DEFAULT_ORDER_NUMBER_START.to_string())
    .bind(CURRENT_DESCRIPTION)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}

/// Read the persisted counter (seed defaults when rows are absent)
pub async fn order_counter(pool: &SqlitePool) -> RepoResult<OrderNumberCounter> {
    let start = get_value(pool, keys::ORDER_NUMBER_START)
        .await?
        .as_ref()
        .and_then(settings::value_as_i64)
        .unwrap_or(DEFAULT_ORDER_NUMBER_START);
    let current = get_value(pool, keys::CURRENT_ORDER_NUMBER)
        .await?
        .as_ref()
        .and_then(settings::value_as_i64)
        .unwrap_or(start);
    Ok(OrderNumberCounter {
        start_value: start,
        current_value: current,
    })
}

/// Assign the next order number
///
/// Read-increment-return is one statement; concurrent checkouts are
/// serialized by the store and can never see the same value.
pub async fn next_order_number(pool: &SqlitePool) -> RepoResult<i64> {
    ensure_counter_seeded(pool).await?;
    let assigned: i64 = sqlx::query_scalar(
        "UPDATE app_settings
         SET value = CAST(CAST(value AS INTEGER) + 1 AS TEXT), updated_at = ?1
         WHERE key = ?2
         RETURNING CAST(value AS INTEGER) - 1",
    )
    .bind(now_millis())
    .bind(keys::CURRENT_ORDER_NUMBER)
    .fetch_one(pool)
    .await?;
    Ok(assigned)
}

/// Move the counter start, guarded against a counter that has advanced
///
/// Returns `false` when the guard fails (a number was assigned since the
/// caller's pre-check) — the caller reports `CounterLocked` and leaves
/// both rows untouched.
pub async fn write_counter_start(pool: &SqlitePool, new_start: i64) -> RepoResult<bool> {
    ensure_counter_seeded(pool).await?;
    let now = now_millis();

    let mut tx = pool.begin().await?;
    let moved = sqlx::query(
        "UPDATE app_settings
         SET value = ?1, updated_at = ?2
         WHERE key = ?3
           AND CAST(value AS INTEGER) = (
               SELECT CAST(value AS INTEGER) FROM app_settings WHERE key = ?4
           )",
    )
    .bind(new_start.to_string())
    .bind(now)
    .bind(keys::CURRENT_ORDER_NUMBER)
    .bind(keys::ORDER_NUMBER_START)
    .execute(&mut *tx)
    .await?;

    if moved.rows_affected() == 0 {
        tx.rollback().await?;
        return Ok(false);
    }

    sqlx::query("UPDATE app_settings SET value = ?1, updated_at = ?2 WHERE key = ?3")
        .bind(new_start.to_string())
        .bind(now)
        .bind(keys::ORDER_NUMBER_START)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_defaults_when_rows_absent() {
        let pool = crate::db::open_in_memory().await;

        assert_eq!(weekly_hours(&pool).await.unwrap(), WeeklyHours::always_open());
        assert!(special_hours(&pool).await.unwrap().is_empty());
        assert!(!manual_unavailable(&pool).await.unwrap());

        let taxes = tax_settings(&pool).await.unwrap();
        assert!(taxes.enabled);
        assert_eq!(taxes.rate, settings::DEFAULT_TAX_RATE);

        let counter = order_counter(&pool).await.unwrap();
        assert_eq!(counter.start_value, DEFAULT_ORDER_NUMBER_START);
        assert!(!counter.has_advanced());
    }

    #[tokio::test]
    async fn test_legacy_string_booleans_are_readable() {
        let pool = crate::db::open_in_memory().await;
        put_value(&pool, keys::APP_UNAVAILABLE, &Value::String("true".into()), None)
            .await
            .unwrap();
        assert!(manual_unavailable(&pool).await.unwrap());
    }

    #[tokio::test]
    async fn test_weekly_hours_round_trip() {
        let pool = crate::db::open_in_memory().await;
        let mut hours = WeeklyHours::always_open();
        hours.sunday.enabled = false;
        hours.monday = shared::models::DayHours::new("08:00", "17:00", true);

        set_weekly_hours(&pool, &hours).await.unwrap();
        assert_eq!(weekly_hours(&pool).await.unwrap(), hours);
    }

    #[tokio::test]
    async fn test_duplicate_special_date_rejected() {
        let pool = crate::db::open_in_memory().await;
        let special = |id: &str| SpecialHour {
            id: id.to_string(),
            date: "2025-06-02".to_string(),
            start_time: "10:00".to_string(),
            end_time: "14:00".to_string(),
        };
        let err = set_special_hours(&pool, &[special("a"), special("b")])
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }

    #[tokio::test]
    async fn test_order_numbers_are_sequential() {
        let pool = crate::db::open_in_memory().await;
        let first = next_order_number(&pool).await.unwrap();
        assert_eq!(first, DEFAULT_ORDER_NUMBER_START);

        let assigned: Vec<i64> = {
            let mut out = vec![first];
            for _ in 0..4 {
                out.push(next_order_number(&pool).await.unwrap());
            }
            out
        };
        let expected: Vec<i64> = (0..5).map(|i| DEFAULT_ORDER_NUMBER_START + i).collect();
        assert_eq!(assigned, expected);

        let counter = order_counter(&pool).await.unwrap();
        assert_eq!(counter.current_value, DEFAULT_ORDER_NUMBER_START + 5);
        assert!(counter.has_advanced());
    }

    #[tokio::test]
    async fn test_counter_start_moves_until_first_assignment() {
        let pool = crate::db::open_in_memory().await;

        assert!(write_counter_start(&pool, 1050).await.unwrap());
        let counter = order_counter(&pool).await.unwrap();
        assert_eq!(counter.start_value, 1050);
        assert_eq!(counter.current_value, 1050);

        assert_eq!(next_order_number(&pool).await.unwrap(), 1050);

        // Locked now — both rows stay put
        assert!(!write_counter_start(&pool, 2000).await.unwrap());
        let counter = order_counter(&pool).await.unwrap();
        assert_eq!(counter.start_value, 1050);
        assert_eq!(counter.current_value, 1051);
    }
}
