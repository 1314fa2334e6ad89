//! App Settings Model
//!
//! Settings are independent key-value rows; absence of a row is a valid
//! state and yields the documented default.

use serde::{Deserialize, Serialize};

/// Setting row keys
pub mod keys {
    pub const TAXES_ENABLED: &str = "taxes_enabled";
    pub const TAX_RATE: &str = "tax_rate";
    pub const APP_UNAVAILABLE: &str = "app_unavailable";
    pub const WEEKLY_HOURS: &str = "weekly_hours";
    pub const SPECIAL_HOURS: &str = "special_hours";
    pub const ORDER_NUMBER_START: &str = "order_number_start";
    pub const CURRENT_ORDER_NUMBER: &str = "current_order_number";
}

/// Default tax rate applied when no `tax_rate` row exists
pub const DEFAULT_TAX_RATE: f64 = 0.085;

/// Tax configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxSettings {
    pub enabled: bool,
    pub rate: f64,
}

impl Default for TaxSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            rate: DEFAULT_TAX_RATE,
        }
    }
}

// ============================================================================
// Value coercion
// ============================================================================
//
// Historic rows were written by several admin builds; booleans may be
// stored as JSON `true` or the string `"true"`, numbers as JSON numbers
// or digit strings. Readers coerce both forms.

/// Coerce a stored setting value to bool
pub fn value_as_bool(value: &serde_json::Value) -> Option<bool> {
    match value {
        serde_json::Value::Bool(b) => Some(*b),
        serde_json::Value::String(s) => match s.as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Coerce a stored setting value to i64
pub fn value_as_i64(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Coerce a stored setting value to f64
pub fn value_as_f64(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.parse().ok(),
        _ => None,
    }
}
