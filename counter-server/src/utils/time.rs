//! 时间工具函数 — 墙钟时间解析
//!
//! 营业时间全部以本地墙钟 `HH:MM` / `YYYY-MM-DD` 字符串存储，
//! 评估时由调用方提供 "now"。

use chrono::{NaiveDate, NaiveTime};

use super::AppError;
use super::result::AppResult;

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("Invalid date format: {}", date)))
}

/// 解析时间字符串 (HH:MM)，用于写入校验
pub fn parse_hhmm(time: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(time, "%H:%M")
        .map_err(|_| AppError::Validation(format!("Invalid time format: {}", time)))
}

/// 解析存量数据中的 HH:MM，失败回退 00:00
pub fn parse_hhmm_lenient(time: &str) -> NaiveTime {
    NaiveTime::parse_from_str(time, "%H:%M").unwrap_or_else(|e| {
        tracing::warn!(
            "Failed to parse stored time '{}': {}, falling back to 00:00",
            time,
            e
        );
        NaiveTime::MIN
    })
}

/// `HH:MM` → 12 小时制显示 ("14:30" → "2:30 PM")
pub fn format_time_12h(time: &str) -> String {
    let Some((hours, minutes)) = time.split_once(':') else {
        return time.to_string();
    };
    let Ok(hour24) = hours.parse::<u32>() else {
        return time.to_string();
    };
    let hour12 = match hour24 {
        0 => 12,
        h if h > 12 => h - 12,
        h => h,
    };
    let ampm = if hour24 >= 12 { "PM" } else { "AM" };
    format!("{}:{} {}", hour12, minutes, ampm)
}
