//! Business Hours Model

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// One weekday's opening window
///
/// Times are wall-clock `HH:MM`, zero-padded, no timezone — evaluated
/// against a caller-supplied "now". A disabled day is closed regardless
/// of its window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayHours {
    pub start_time: String,
    pub end_time: String,
    pub enabled: bool,
}

impl DayHours {
    pub fn new(start_time: &str, end_time: &str, enabled: bool) -> Self {
        Self {
            start_time: start_time.to_string(),
            end_time: end_time.to_string(),
            enabled,
        }
    }

    /// Open all day
    pub fn all_day() -> Self {
        Self::new("00:00", "23:59", true)
    }
}

/// Weekly schedule, one window per weekday
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyHours {
    pub monday: DayHours,
    pub tuesday: DayHours,
    pub wednesday: DayHours,
    pub thursday: DayHours,
    pub friday: DayHours,
    pub saturday: DayHours,
    pub sunday: DayHours,
}

impl WeeklyHours {
    /// Default when no schedule has been configured: open every day
    pub fn always_open() -> Self {
        Self {
            monday: DayHours::all_day(),
            tuesday: DayHours::all_day(),
            wednesday: DayHours::all_day(),
            thursday: DayHours::all_day(),
            friday: DayHours::all_day(),
            saturday: DayHours::all_day(),
            sunday: DayHours::all_day(),
        }
    }

    /// Window for a given weekday
    pub fn day(&self, weekday: Weekday) -> &DayHours {
        match weekday {
            Weekday::Mon => &self.monday,
            Weekday::Tue => &self.tuesday,
            Weekday::Wed => &self.wednesday,
            Weekday::Thu => &self.thursday,
            Weekday::Fri => &self.friday,
            Weekday::Sat => &self.saturday,
            Weekday::Sun => &self.sunday,
        }
    }

    /// Display label for a weekday ("Monday", ...)
    pub fn day_label(weekday: Weekday) -> &'static str {
        match weekday {
            Weekday::Mon => "Monday",
            Weekday::Tue => "Tuesday",
            Weekday::Wed => "Wednesday",
            Weekday::Thu => "Thursday",
            Weekday::Fri => "Friday",
            Weekday::Sat => "Saturday",
            Weekday::Sun => "Sunday",
        }
    }
}

impl Default for WeeklyHours {
    fn default() -> Self {
        Self::always_open()
    }
}

/// One-off override for a specific calendar date
///
/// When present for "today", the override fully replaces the weekly
/// window for that date — no merge. At most one override per date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialHour {
    pub id: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub start_time: String,
    pub end_time: String,
}

/// Find the override for a given date, if any
pub fn special_for_date<'a>(specials: &'a [SpecialHour], date: &str) -> Option<&'a SpecialHour> {
    specials.iter().find(|sh| sh.date == date)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekly_hours_wire_format() {
        let hours = WeeklyHours::always_open();
        let json = serde_json::to_value(&hours).unwrap();
        // Stored settings rows use camelCase field names
        assert_eq!(json["monday"]["startTime"], "00:00");
        assert_eq!(json["monday"]["enabled"], true);
    }

    #[test]
    fn test_day_lookup_covers_week() {
        let mut hours = WeeklyHours::always_open();
        hours.sunday.enabled = false;
        assert!(hours.day(Weekday::Mon).enabled);
        assert!(!hours.day(Weekday::Sun).enabled);
    }

    #[test]
    fn test_special_for_date() {
        let specials = vec![SpecialHour {
            id: "sh-1".to_string(),
            date: "2025-06-02".to_string(),
            start_time: "10:00".to_string(),
            end_time: "14:00".to_string(),
        }];
        assert!(special_for_date(&specials, "2025-06-02").is_some());
        assert!(special_for_date(&specials, "2025-06-03").is_none());
    }
}
