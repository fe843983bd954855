//! Duration input: separate unit fields or a single duration string.

use serde::{Deserialize, Serialize};

use super::error::ParseError;
use crate::types::CountdownSpec;

pub const MAX_DAYS: u64 = 365;
pub const MAX_HOURS: u64 = 23;
pub const MAX_MINUTES: u64 = 59;
pub const MAX_SECONDS: u64 = 59;

// ============================================================================
// DurationFields
// ============================================================================

/// Days/hours/minutes/seconds entered as separate fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DurationFields {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl DurationFields {
    /// Creates fields from their values.
    pub fn new(days: u64, hours: u64, minutes: u64, seconds: u64) -> Self {
        Self {
            days,
            hours,
            minutes,
            seconds,
        }
    }

    /// Checks each field against its range.
    pub fn validate(&self) -> Result<(), ParseError> {
        check_range("days", self.days, MAX_DAYS)?;
        check_range("hours", self.hours, MAX_HOURS)?;
        check_range("minutes", self.minutes, MAX_MINUTES)?;
        check_range("seconds", self.seconds, MAX_SECONDS)?;
        Ok(())
    }

    /// Total length in seconds, or `None` if it does not fit in a `u64`.
    pub fn total_seconds(&self) -> Option<u64> {
        self.days
            .checked_mul(86_400)?
            .checked_add(self.hours.checked_mul(3_600)?)?
            .checked_add(self.minutes.checked_mul(60)?)?
            .checked_add(self.seconds)
    }

    /// Returns true if every field is zero.
    pub fn is_zero(&self) -> bool {
        self.days == 0 && self.hours == 0 && self.minutes == 0 && self.seconds == 0
    }

    /// Validates the fields and builds a duration spec.
    ///
    /// A zero total is returned as-is; rejecting it is the engine's job.
    pub fn to_spec(&self) -> Result<CountdownSpec, ParseError> {
        self.validate()?;
        let total = self.total_seconds().ok_or(ParseError::OutOfRange {
            field: "days",
            value: self.days,
            max: MAX_DAYS,
        })?;
        Ok(CountdownSpec::duration(total))
    }
}

fn check_range(field: &'static str, value: u64, max: u64) -> Result<(), ParseError> {
    if value > max {
        return Err(ParseError::OutOfRange { field, value, max });
    }
    Ok(())
}

// ============================================================================
// parse_duration
// ============================================================================

/// Parses a duration string into whole seconds.
///
/// Accepted forms:
/// - plain seconds: `90`
/// - clock notation: `MM:SS`, `HH:MM:SS`, `D:HH:MM:SS`
/// - unit notation: `1d2h3m4s`, `1h 30m`, `45S`
pub fn parse_duration(input: &str) -> Result<u64, ParseError> {
    let text = input.trim();
    let invalid = || ParseError::InvalidDuration(input.to_string());

    if text.is_empty() {
        return Err(invalid());
    }
    if text.bytes().all(|b| b.is_ascii_digit()) {
        return text.parse::<u64>().map_err(|_| invalid());
    }
    if text.contains(':') {
        return parse_clock(text).ok_or_else(invalid);
    }
    parse_units(text).ok_or_else(invalid)
}

/// `[[D:]HH:]MM:SS`; the leading component is unbounded.
fn parse_clock(text: &str) -> Option<u64> {
    let parts: Vec<&str> = text.split(':').collect();
    if !(2..=4).contains(&parts.len()) {
        return None;
    }

    // (multiplier, limit for non-leading position), from the right
    const UNITS: [(u64, u64); 4] = [(1, 60), (60, 60), (3_600, 24), (86_400, u64::MAX)];

    let mut total: u64 = 0;
    for (index, part) in parts.iter().rev().enumerate() {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let value: u64 = part.parse().ok()?;
        let (multiplier, limit) = UNITS[index];
        let leading = index == parts.len() - 1;
        if !leading && value >= limit {
            return None;
        }
        total = total.checked_add(value.checked_mul(multiplier)?)?;
    }
    Some(total)
}

/// Sequences of `<number><unit>` with units d, h, m, s, each used once.
fn parse_units(text: &str) -> Option<u64> {
    let mut total: u64 = 0;
    let mut number: Option<u64> = None;
    let mut seen = [false; 4];

    for c in text.chars() {
        if c.is_whitespace() {
            continue;
        }
        if let Some(digit) = c.to_digit(10) {
            let current = number.unwrap_or(0);
            number = Some(current.checked_mul(10)?.checked_add(u64::from(digit))?);
            continue;
        }

        let (slot, multiplier) = match c.to_ascii_lowercase() {
            'd' => (0, 86_400),
            'h' => (1, 3_600),
            'm' => (2, 60),
            's' => (3, 1),
            _ => return None,
        };
        if seen[slot] {
            return None;
        }
        seen[slot] = true;

        let value = number.take()?;
        total = total.checked_add(value.checked_mul(multiplier)?)?;
    }

    // A trailing number without a unit, or no component at all, is rejected
    if number.is_some() || !seen.iter().any(|s| *s) {
        return None;
    }
    Some(total)
}

// ============================================================================
// Tests
// ============================================================================
