//! Storefront availability
//!
//! One boolean decides whether checkout accepts new orders:
//! `unavailable = manual kill switch OR outside business hours`. The
//! aggregation is pure; [`AvailabilityService`] wires it to the settings
//! rows and holds the last evaluated state. Re-evaluation is floored at
//! ten seconds — frequent polls are absorbed, an operator flag change
//! goes through the forced path.

pub mod hours;
pub mod watcher;

use chrono::NaiveDateTime;
use parking_lot::Mutex;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::db::repository::{RepoResult, settings};
use hours::{HoursStatus, hours_status, is_within_hours};
use shared::models::{SpecialHour, WeeklyHours};
use shared::util::now_millis;

/// Re-evaluation floor — callers polling faster than this keep prior state
pub const MIN_EVAL_INTERVAL_MS: i64 = 10_000;

/// Why the storefront is not accepting orders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnavailableCause {
    /// Operator kill switch
    Manual,
    /// Outside the configured business hours
    OutsideHours,
}

/// Aggregated availability state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityState {
    pub manually_unavailable: bool,
    pub outside_business_hours: bool,
    /// `manually_unavailable || outside_business_hours` — never set directly
    pub is_unavailable: bool,
    pub last_evaluated_at: i64,
}

impl AvailabilityState {
    /// State before the first evaluation: accepting orders
    pub fn initial() -> Self {
        Self {
            manually_unavailable: false,
            outside_business_hours: false,
            is_unavailable: false,
            last_evaluated_at: 0,
        }
    }

    /// Attribution for UI messaging; manual wins when both apply
    pub fn cause(&self) -> Option<UnavailableCause> {
        if self.manually_unavailable {
            Some(UnavailableCause::Manual)
        } else if self.outside_business_hours {
            Some(UnavailableCause::OutsideHours)
        } else {
            None
        }
    }
}

/// Result of one evaluation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluation {
    Updated(AvailabilityState),
    /// Inside the re-evaluation floor; caller keeps prior state
    Skipped,
}

/// Evaluate availability, honoring the re-evaluation floor
pub fn evaluate(
    manual: bool,
    weekly: &WeeklyHours,
    specials: &[SpecialHour],
    now_wall: NaiveDateTime,
    now: i64,
    last_evaluated_at: i64,
) -> Evaluation {
    if now - last_evaluated_at < MIN_EVAL_INTERVAL_MS {
        return Evaluation::Skipped;
    }
    Evaluation::Updated(force_evaluate(manual, weekly, specials, now_wall, now))
}

/// Evaluate availability, bypassing the floor (operator flag changes)
pub fn force_evaluate(
    manual: bool,
    weekly: &WeeklyHours,
    specials: &[SpecialHour],
    now_wall: NaiveDateTime,
    now: i64,
) -> AvailabilityState {
    let outside_business_hours = !is_within_hours(weekly, specials, now_wall);
    AvailabilityState {
        manually_unavailable: manual,
        outside_business_hours,
        is_unavailable: manual || outside_business_hours,
        last_evaluated_at: now,
    }
}

/// Outcome of a service-level refresh
#[derive(Debug, Clone, Copy)]
pub struct RefreshOutcome {
    pub state: AvailabilityState,
    pub skipped: bool,
    /// Available → unavailable on this pass (drives the one-time UI notice)
    pub became_unavailable: bool,
    pub became_available: bool,
}

/// Availability report for the API
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityReport {
    pub accepting_orders: bool,
    pub manually_unavailable: bool,
    pub outside_business_hours: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<UnavailableCause>,
    pub hours: HoursStatus,
}

/// Holds the evaluated availability state for one server instance
#[derive(Debug)]
pub struct AvailabilityService {
    pool: SqlitePool,
    state: Mutex<AvailabilityState>,
}

impl AvailabilityService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            state: Mutex::new(AvailabilityState::initial()),
        }
    }

    pub fn current(&self) -> AvailabilityState {
        *self.state.lock()
    }

    pub fn is_accepting_orders(&self) -> bool {
        !self.current().is_unavailable
    }

    /// Re-read settings and re-evaluate
    ///
    /// `force` bypasses the ten-second floor; use it after an operator
    /// changes the manual flag or the hours.
    pub async fn refresh(&self, force: bool) -> RepoResult<RefreshOutcome> {
        let manual = settings::manual_unavailable(&self.pool).await?;
        let weekly = settings::weekly_hours(&self.pool).await?;
        let specials = settings::special_hours(&self.pool).await?;

        let now_wall = chrono::Local::now().naive_local();
        let now = now_millis();
        let prev = self.current();

        let evaluation = if force {
            Evaluation::Updated(force_evaluate(manual, &weekly, &specials, now_wall, now))
        } else {
            evaluate(manual, &weekly, &specials, now_wall, now, prev.last_evaluated_at)
        };

        match evaluation {
            Evaluation::Skipped => Ok(RefreshOutcome {
                state: prev,
                skipped: true,
                became_unavailable: false,
                became_available: false,
            }),
            Evaluation::Updated(next) => {
                *self.state.lock() = next;
                Ok(RefreshOutcome {
                    state: next,
                    skipped: false,
                    became_unavailable: !prev.is_unavailable && next.is_unavailable,
                    became_available: prev.is_unavailable && !next.is_unavailable,
                })
            }
        }
    }

    /// Current state plus hours messaging for the API
    pub async fn describe(&self) -> RepoResult<AvailabilityReport> {
        let weekly = settings::weekly_hours(&self.pool).await?;
        let specials = settings::special_hours(&self.pool).await?;
        let hours = hours_status(&weekly, &specials, chrono::Local::now().naive_local());
        let state = self.current();
        Ok(AvailabilityReport {
            accepting_orders: !state.is_unavailable,
            manually_unavailable: state.manually_unavailable,
            outside_business_hours: state.outside_business_hours,
            cause: state.cause(),
            hours,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 2)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn closed_all_week() -> WeeklyHours {
        let mut weekly = WeeklyHours::always_open();
        for day in [
            &mut weekly.monday,
            &mut weekly.tuesday,
            &mut weekly.wednesday,
            &mut weekly.thursday,
            &mut weekly.friday,
            &mut weekly.saturday,
            &mut weekly.sunday,
        ] {
            day.enabled = false;
        }
        weekly
    }

    const NOW: i64 = 1_750_000_000_000;

    #[test]
    fn test_aggregation_truth_table() {
        let open = WeeklyHours::always_open();
        let closed = closed_all_week();

        // manual only
        let state = force_evaluate(true, &open, &[], noon(), NOW);
        assert!(state.manually_unavailable);
        assert!(!state.outside_business_hours);
        assert!(state.is_unavailable);
        assert_eq!(state.cause(), Some(UnavailableCause::Manual));

        // hours only
        let state = force_evaluate(false, &closed, &[], noon(), NOW);
        assert!(!state.manually_unavailable);
        assert!(state.outside_business_hours);
        assert!(state.is_unavailable);
        assert_eq!(state.cause(), Some(UnavailableCause::OutsideHours));

        // neither
        let state = force_evaluate(false, &open, &[], noon(), NOW);
        assert!(!state.is_unavailable);
        assert_eq!(state.cause(), None);

        // both — manual wins the attribution
        let state = force_evaluate(true, &closed, &[], noon(), NOW);
        assert!(state.is_unavailable);
        assert_eq!(state.cause(), Some(UnavailableCause::Manual));
    }

    #[test]
    fn test_floor_skips_frequent_evaluation() {
        let open = WeeklyHours::always_open();
        let last = NOW - 5_000;
        assert_eq!(
            evaluate(false, &open, &[], noon(), NOW, last),
            Evaluation::Skipped
        );

        // Past the floor it evaluates
        let last = NOW - MIN_EVAL_INTERVAL_MS;
        assert!(matches!(
            evaluate(false, &open, &[], noon(), NOW, last),
            Evaluation::Updated(_)
        ));

        // Forced evaluation ignores the floor entirely
        let state = force_evaluate(true, &open, &[], noon(), NOW);
        assert!(state.is_unavailable);
        assert_eq!(state.last_evaluated_at, NOW);
    }

    #[tokio::test]
    async fn test_service_reports_manual_transition() {
        let pool = crate::db::open_in_memory().await;
        let service = AvailabilityService::new(pool.clone());

        let first = service.refresh(true).await.unwrap();
        assert!(!first.skipped);
        assert!(!first.state.manually_unavailable);

        settings::set_manual_unavailable(&pool, true).await.unwrap();

        // Within the floor an unforced refresh keeps prior state
        let skipped = service.refresh(false).await.unwrap();
        assert!(skipped.skipped);
        assert!(!skipped.state.is_unavailable);

        let forced = service.refresh(true).await.unwrap();
        assert!(forced.state.manually_unavailable);
        assert!(forced.state.is_unavailable);
        assert!(forced.became_unavailable);

        settings::set_manual_unavailable(&pool, false).await.unwrap();
        let back = service.refresh(true).await.unwrap();
        assert!(back.became_available);
    }
}
