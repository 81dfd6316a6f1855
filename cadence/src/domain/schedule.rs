//! Calendar-aware next-due-date arithmetic.
//!
//! The next occurrence of a recurring task is anchored on the date it was
//! actually completed, not on a fixed schedule. Month and year additions use
//! calendar rollover with clamping: adding one month to 2024-01-31 lands on
//! 2024-02-29, the last valid day of the shorter month.

use chrono::{Days, Months, NaiveDate};

use super::interval::{IntervalError, ParsedInterval, Unit};

/// Computes the next due date from a completion date and a parsed interval.
///
/// Pure function of its inputs; wall-clock "now" never participates. The
/// result is a date-only value.
///
/// # Errors
/// Returns `IntervalError::DateOutOfRange` if the addition leaves chrono's
/// representable date range.
pub fn next_due(
    completed_on: NaiveDate,
    interval: &ParsedInterval,
) -> Result<NaiveDate, IntervalError> {
    let next = match interval.unit {
        Unit::Days => completed_on.checked_add_days(Days::new(u64::from(interval.amount))),
        Unit::Weeks => {
            completed_on.checked_add_days(Days::new(u64::from(interval.amount) * 7))
        }
        Unit::Months => completed_on.checked_add_months(Months::new(interval.amount)),
        Unit::Years => completed_on
            .checked_add_months(Months::new(interval.amount.saturating_mul(12))),
    };
    next.ok_or(IntervalError::DateOutOfRange)
}

// =============================================================================
// Unit Tests
// =============================================================================
