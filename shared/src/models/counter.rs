//! Order Number Counter
//!
//! Human-facing order numbers come from a single persisted counter. The
//! starting value is configurable only while the counter has never
//! advanced; after the first assignment it is locked. Cross-client
//! atomicity of the advance is the store's job — this type only captures
//! the sequencing rules.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Counter seed used when no settings rows exist yet
pub const DEFAULT_ORDER_NUMBER_START: i64 = 1001;

/// Sequencer errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CounterError {
    #[error("order number start is locked: {assigned} number(s) already assigned")]
    CounterLocked { assigned: i64 },

    #[error("invalid order number start: {0} (must be >= 1)")]
    InvalidStart(i64),
}

/// Persisted order-number counter (`order_number_start` +
/// `current_order_number` settings rows)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderNumberCounter {
    /// Configured starting value, locked once any order exists
    pub start_value: i64,
    /// Next number to assign
    pub current_value: i64,
}

impl OrderNumberCounter {
    pub fn new(start_value: i64) -> Result<Self, CounterError> {
        if start_value < 1 {
            return Err(CounterError::InvalidStart(start_value));
        }
        Ok(Self {
            start_value,
            current_value: start_value,
        })
    }

    /// Counter at the default seed
    pub fn seed() -> Self {
        Self {
            start_value: DEFAULT_ORDER_NUMBER_START,
            current_value: DEFAULT_ORDER_NUMBER_START,
        }
    }

    /// Whether any order number has ever been assigned
    pub fn has_advanced(&self) -> bool {
        self.current_value != self.start_value
    }

    /// Assign the next order number and advance the counter
    pub fn next_number(&mut self) -> i64 {
        let assigned = self.current_value;
        self.current_value += 1;
        assigned
    }

    /// Move the starting value; fails once the counter has advanced
    ///
    /// On success both values move together so the counter reads as
    /// never-advanced at the new start.
    pub fn set_start(&mut self, new_start: i64) -> Result<(), CounterError> {
        if new_start < 1 {
            return Err(CounterError::InvalidStart(new_start));
        }
        if self.has_advanced() {
            return Err(CounterError::CounterLocked {
                assigned: self.current_value - self.start_value,
            });
        }
        self.start_value = new_start;
        self.current_value = new_start;
        Ok(())
    }
}

impl Default for OrderNumberCounter {
    fn default() -> Self {
        Self::seed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_start_before_first_assignment() {
        let mut counter = OrderNumberCounter::new(1001).unwrap();
        assert!(counter.set_start(1050).is_ok());
        assert_eq!(counter.start_value, 1050);
        assert_eq!(counter.current_value, 1050);
    }

    #[test]
    fn test_set_start_locked_after_assignment() {
        let mut counter = OrderNumberCounter::new(1001).unwrap();
        assert_eq!(counter.next_number(), 1001);
        assert_eq!(counter.current_value, 1002);

        let err = counter.set_start(2000).unwrap_err();
        assert_eq!(err, CounterError::CounterLocked { assigned: 1 });
        // Both values unchanged on failure
        assert_eq!(counter.start_value, 1001);
        assert_eq!(counter.current_value, 1002);
    }

    #[test]
    fn test_sequential_numbers_have_no_gaps_or_repeats() {
        let mut counter = OrderNumberCounter::new(500).unwrap();
        let assigned: Vec<i64> = (0..5).map(|_| counter.next_number()).collect();
        assert_eq!(assigned, vec![500, 501, 502, 503, 504]);
    }

    #[test]
    fn test_invalid_start_rejected() {
        assert_eq!(
            OrderNumberCounter::new(0).unwrap_err(),
            CounterError::InvalidStart(0)
        );
        let mut counter = OrderNumberCounter::seed();
        assert!(counter.set_start(-5).is_err());
    }
}
