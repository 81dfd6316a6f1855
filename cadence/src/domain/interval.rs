//! Recurrence-spec parsing.
//!
//! A recurring spec is a free-form string supplied by the task owner, e.g.
//! `"1 week"` or `"3 Months"`. The accepted shape is a positive integer, some
//! whitespace, and a unit word; anything after the unit word is ignored.

use once_cell::sync::Lazy;
use regex::Regex;

/// Leading `<integer> <word>` token; the rest of the string is ignored.
static SPEC_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d+)\s+([A-Za-z]+)").expect("interval pattern is valid")
});

// =============================================================================
// Types
// =============================================================================

/// Calendar unit of a recurrence interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    /// Calendar days.
    Days,
    /// Calendar weeks (7 days).
    Weeks,
    /// Calendar months, clamped to the last valid day on overflow.
    Months,
    /// Calendar years (12 months).
    Years,
}

impl Unit {
    /// Maps a unit word (case-insensitive, singular or plural) to a `Unit`.
    fn from_word(word: &str) -> Option<Self> {
        match word.to_ascii_lowercase().as_str() {
            "day" | "days" => Some(Self::Days),
            "week" | "weeks" => Some(Self::Weeks),
            "month" | "months" => Some(Self::Months),
            "year" | "years" => Some(Self::Years),
            _ => None,
        }
    }
}

/// A structured recurrence interval: amount plus calendar unit.
///
/// Ephemeral: produced and consumed within a single recurrence computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedInterval {
    /// Number of units; always at least 1.
    pub amount: u32,
    /// Calendar unit.
    pub unit: Unit,
}

/// Reasons a recurring spec fails to parse or apply.
#[derive(Debug, Clone, thiserror::Error)]
pub enum IntervalError {
    /// The spec does not start with `<integer> <word>`.
    #[error("recurring spec {0:?} does not match \"<amount> <unit>\"")]
    Malformed(String),
    /// The unit word is not a known calendar unit.
    #[error("unknown recurrence unit {0:?}")]
    UnknownUnit(String),
    /// The amount is zero or does not fit the supported range.
    #[error("recurrence amount {0:?} is out of range")]
    AmountOutOfRange(String),
    /// Applying the interval pushed the date outside the representable range.
    #[error("computed due date is out of range")]
    DateOutOfRange,
}

// =============================================================================
// Parsing
// =============================================================================

impl ParsedInterval {
    /// Parses a free-form recurring spec into a structured interval.
    ///
    /// Pure function; no I/O. Trailing text after the unit word is ignored,
    /// so `"2 weeks after completion"` parses as two weeks.
    ///
    /// # Errors
    /// Returns `IntervalError` when the leading `<integer> <unit>` token is
    /// missing, the unit word is unknown, or the amount is zero or too large.
    pub fn parse(spec: &str) -> Result<Self, IntervalError> {
        let captures = SPEC_PATTERN
            .captures(spec)
            .ok_or_else(|| IntervalError::Malformed(spec.to_string()))?;

        let amount_text = &captures[1];
        let amount: u32 = amount_text
            .parse()
            .map_err(|_| IntervalError::AmountOutOfRange(amount_text.to_string()))?;
        if amount == 0 {
            return Err(IntervalError::AmountOutOfRange(amount_text.to_string()));
        }

        let unit_word = &captures[2];
        let unit = Unit::from_word(unit_word)
            .ok_or_else(|| IntervalError::UnknownUnit(unit_word.to_string()))?;

        Ok(Self { amount, unit })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
