//! Business-hours evaluator
//!
//! Pure functions over the weekly schedule and special date overrides,
//! evaluated against a caller-supplied wall-clock "now". A special
//! override for today's date replaces the weekly window entirely; a
//! disabled weekday is closed no matter what its window says. Window
//! bounds are inclusive at minute granularity.
//!
//! Windows are same-day only — an overnight range (`end < start`)
//! matches nothing past midnight.

use chrono::{Datelike, Days, NaiveDateTime, NaiveTime, Timelike};
use serde::Serialize;

use crate::utils::time::{format_time_12h, parse_hhmm_lenient};
use shared::models::{SpecialHour, WeeklyHours, special_for_date};

/// Evaluated open/closed state with a human-readable reason
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoursStatus {
    pub open: bool,
    pub message: String,
    /// Next opening time, when one exists within the coming week
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_open_at: Option<NaiveDateTime>,
    pub is_special: bool,
}

/// Whether the storefront is open at `now`
pub fn is_within_hours(
    weekly: &WeeklyHours,
    specials: &[SpecialHour],
    now: NaiveDateTime,
) -> bool {
    let today = now.date().format("%Y-%m-%d").to_string();
    let time = truncate_to_minute(now.time());

    // Special hours first - they override regular hours for the date
    if let Some(special) = special_for_date(specials, &today) {
        return within_window(&special.start_time, &special.end_time, time);
    }

    let day = weekly.day(now.date().weekday());
    day.enabled && within_window(&day.start_time, &day.end_time, time)
}

/// Open/closed state plus next-opening info for UI messaging
pub fn hours_status(
    weekly: &WeeklyHours,
    specials: &[SpecialHour],
    now: NaiveDateTime,
) -> HoursStatus {
    let today = now.date().format("%Y-%m-%d").to_string();
    let time = truncate_to_minute(now.time());
    let today_special = special_for_date(specials, &today);

    if is_within_hours(weekly, specials, now) {
        let message = if today_special.is_some() {
            "We're open with special hours today!"
        } else {
            "We're currently open!"
        };
        return HoursStatus {
            open: true,
            message: message.to_string(),
            next_open_at: None,
            is_special: today_special.is_some(),
        };
    }

    // Closed. Still opening later today?
    if let Some(special) = today_special {
        let start = parse_hhmm_lenient(&special.start_time);
        if time < start {
            return HoursStatus {
                open: false,
                message: format!(
                    "Closed - Opens today at {} (special hours)",
                    format_time_12h(&special.start_time)
                ),
                next_open_at: Some(now.date().and_time(start)),
                is_special: true,
            };
        }
    } else {
        let day = weekly.day(now.date().weekday());
        let start = parse_hhmm_lenient(&day.start_time);
        if day.enabled && time < start {
            return HoursStatus {
                open: false,
                message: format!(
                    "Closed - Opens today at {}",
                    format_time_12h(&day.start_time)
                ),
                next_open_at: Some(now.date().and_time(start)),
                is_special: false,
            };
        }
    }

    // Next enabled weekday within a week. Special overrides are not
    // projected into this search.
    for offset in 1..=7u64 {
        let Some(date) = now.date().checked_add_days(Days::new(offset)) else {
            break;
        };
        let schedule = weekly.day(date.weekday());
        if schedule.enabled {
            let label = if offset == 1 {
                "tomorrow".to_string()
            } else {
                WeeklyHours::day_label(date.weekday()).to_string()
            };
            return HoursStatus {
                open: false,
                message: format!(
                    "Closed - Opens {} at {}",
                    label,
                    format_time_12h(&schedule.start_time)
                ),
                next_open_at: Some(date.and_time(parse_hhmm_lenient(&schedule.start_time))),
                is_special: false,
            };
        }
    }

    HoursStatus {
        open: false,
        message: "Currently closed - Check our hours".to_string(),
        next_open_at: None,
        is_special: false,
    }
}

fn within_window(start: &str, end: &str, now: NaiveTime) -> bool {
    let start = parse_hhmm_lenient(start);
    let end = parse_hhmm_lenient(end);
    now >= start && now <= end
}

fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shared::models::DayHours;

    // 2025-06-02 is a Monday
    fn monday_at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 2)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn weekday_schedule() -> WeeklyHours {
        let mut hours = WeeklyHours::always_open();
        hours.monday = DayHours::new("08:00", "17:00", true);
        hours.tuesday = DayHours::new("08:00", "17:00", true);
        hours.wednesday = DayHours::new("08:00", "17:00", true);
        hours.thursday = DayHours::new("08:00", "17:00", true);
        hours.friday = DayHours::new("08:00", "17:00", true);
        hours.saturday = DayHours::new("09:00", "15:00", true);
        hours.sunday = DayHours::new("09:00", "15:00", false);
        hours
    }

    fn monday_special() -> Vec<SpecialHour> {
        vec![SpecialHour {
            id: "sh-1".to_string(),
            date: "2025-06-02".to_string(),
            start_time: "10:00".to_string(),
            end_time: "14:00".to_string(),
        }]
    }

    #[test]
    fn test_special_hours_fully_override_weekly() {
        let weekly = weekday_schedule();
        let specials = monday_special();

        // Weekly window says open at 09:30, but the override owns the date
        assert!(!is_within_hours(&weekly, &specials, monday_at(9, 30)));
        assert!(is_within_hours(&weekly, &specials, monday_at(10, 30)));
        assert!(!is_within_hours(&weekly, &specials, monday_at(14, 30)));
    }

    #[test]
    fn test_weekly_window_inclusive_bounds() {
        let weekly = weekday_schedule();
        assert!(is_within_hours(&weekly, &[], monday_at(8, 0)));
        assert!(is_within_hours(&weekly, &[], monday_at(17, 0)));
        assert!(!is_within_hours(&weekly, &[], monday_at(7, 59)));
        assert!(!is_within_hours(&weekly, &[], monday_at(17, 1)));
    }

    #[test]
    fn test_disabled_day_closed_regardless_of_time() {
        let mut weekly = weekday_schedule();
        weekly.monday.enabled = false;
        // 10:00 is inside monday's window, but the day is off
        assert!(!is_within_hours(&weekly, &[], monday_at(10, 0)));
    }

    #[test]
    fn test_status_before_todays_opening() {
        let weekly = weekday_schedule();
        let status = hours_status(&weekly, &[], monday_at(7, 0));
        assert!(!status.open);
        assert_eq!(status.message, "Closed - Opens today at 8:00 AM");
        assert_eq!(status.next_open_at, Some(monday_at(8, 0)));
        assert!(!status.is_special);
    }

    #[test]
    fn test_status_before_special_opening() {
        let weekly = weekday_schedule();
        let status = hours_status(&weekly, &monday_special(), monday_at(9, 0));
        assert!(!status.open);
        assert_eq!(
            status.message,
            "Closed - Opens today at 10:00 AM (special hours)"
        );
        assert!(status.is_special);
    }

    #[test]
    fn test_status_after_close_points_at_tomorrow() {
        let weekly = weekday_schedule();
        let status = hours_status(&weekly, &[], monday_at(20, 0));
        assert!(!status.open);
        assert_eq!(status.message, "Closed - Opens tomorrow at 8:00 AM");
        let tuesday = NaiveDate::from_ymd_opt(2025, 6, 3)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        assert_eq!(status.next_open_at, Some(tuesday));
    }

    #[test]
    fn test_status_skips_disabled_days_in_forward_scan() {
        let mut weekly = weekday_schedule();
        weekly.tuesday.enabled = false;
        weekly.wednesday.enabled = false;
        let status = hours_status(&weekly, &[], monday_at(20, 0));
        assert_eq!(status.message, "Closed - Opens Thursday at 8:00 AM");
    }

    #[test]
    fn test_status_when_every_day_disabled() {
        let mut weekly = weekday_schedule();
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
        let status = hours_status(&weekly, &[], monday_at(12, 0));
        assert!(!status.open);
        assert_eq!(status.message, "Currently closed - Check our hours");
        assert_eq!(status.next_open_at, None);
    }

    #[test]
    fn test_open_messages() {
        let weekly = weekday_schedule();
        let open = hours_status(&weekly, &[], monday_at(12, 0));
        assert!(open.open);
        assert_eq!(open.message, "We're currently open!");

        let special = hours_status(&weekly, &monday_special(), monday_at(12, 0));
        assert!(special.open);
        assert_eq!(special.message, "We're open with special hours today!");
        assert!(special.is_special);
    }

    #[test]
    fn test_overnight_window_is_not_supported() {
        let mut weekly = weekday_schedule();
        weekly.monday = DayHours::new("22:00", "02:00", true);
        // Literal comparison: nothing satisfies start <= t <= end
        assert!(!is_within_hours(&weekly, &[], monday_at(23, 0)));
        assert!(!is_within_hours(&weekly, &[], monday_at(1, 0)));
    }
}
