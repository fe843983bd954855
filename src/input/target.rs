//! Target date-time input.

use chrono::{DateTime, Days, Local, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

use super::error::ParseError;

const DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

const TIME_FORMATS: [&str; 2] = ["%H:%M:%S", "%H:%M"];

/// Parses a target date-time in the local time zone.
///
/// See [`parse_target_in`] for the accepted forms.
pub fn parse_target(input: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, ParseError> {
    parse_target_in(input, now, &Local)
}

/// Parses a target date-time, reading zone-less forms in `tz`.
///
/// Accepted forms:
/// - RFC 3339 with an explicit offset: `2026-12-31T23:59:00+09:00`
/// - date and time: `2026-12-31T23:59`, `2026-12-31 23:59:30`
/// - date only (midnight): `2026-12-31`
/// - time only: `18:00` (today, or tomorrow once that time has passed)
///
/// Whether the result lies in the future is not checked here.
pub fn parse_target_in<Tz: TimeZone>(
    input: &str,
    now: DateTime<Utc>,
    tz: &Tz,
) -> Result<DateTime<Utc>, ParseError> {
    let text = input.trim();
    let invalid = || ParseError::InvalidTarget(input.to_string());

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Some(naive) = DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
    {
        return localize(tz, &naive).ok_or_else(invalid);
    }

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .and_then(|midnight| localize(tz, &midnight))
            .ok_or_else(invalid);
    }

    if let Some(time) = TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(text, fmt).ok())
    {
        let today = now.with_timezone(tz).date_naive();
        let candidate = localize(tz, &today.and_time(time)).ok_or_else(invalid)?;
        if candidate > now {
            return Ok(candidate);
        }
        let tomorrow = today.checked_add_days(Days::new(1)).ok_or_else(invalid)?;
        return localize(tz, &tomorrow.and_time(time)).ok_or_else(invalid);
    }

    Err(invalid())
}

/// Maps a wall-clock time in `tz` to UTC.
///
/// Times repeated by a DST fall-back resolve to the earlier instant; times
/// skipped by a spring-forward do not exist.
fn localize<Tz: TimeZone>(tz: &Tz, naive: &NaiveDateTime) -> Option<DateTime<Utc>> {
    match tz.from_local_datetime(naive) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(first, second) => {
            Some(first.with_timezone(&Utc).min(second.with_timezone(&Utc)))
        }
        LocalResult::None => None,
    }
}

// ============================================================================
// Tests
// ============================================================================
