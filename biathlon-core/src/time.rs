//! Time-of-day and duration helpers
//!
//! Event timestamps are wall-clock times with millisecond precision
//! (`HH:MM:SS.mmm`). Durations (start window, lap times, penalty time) are
//! `chrono::Duration` values and may exceed 24 hours.

use crate::types::{RaceError, Result};
use chrono::{Duration, NaiveTime, Timelike};

const MILLIS_PER_SECOND: i64 = 1_000;
const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;
const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;

/// Parse a time of day in `HH:MM:SS.mmm` format
///
/// The fractional part must have exactly three digits.
pub fn parse_time_of_day(s: &str) -> Result<NaiveTime> {
    let invalid = || RaceError::InvalidTime(s.to_string());

    let (hms, fraction) = s.split_once('.').ok_or_else(invalid)?;
    let millis = parse_millis(fraction).ok_or_else(invalid)?;

    // chrono reads second 60 as a leap second; a timestamp never carries one
    NaiveTime::parse_from_str(hms, "%H:%M:%S")
        .ok()
        .filter(|t| t.nanosecond() < 1_000_000_000)
        .and_then(|t| t.with_nanosecond(millis * 1_000_000))
        .ok_or_else(invalid)
}

/// Parse a duration in `HH:MM:SS[.mmm]` format
///
/// Hours are unbounded; minutes and seconds are summed as given.
pub fn parse_duration(s: &str) -> Result<Duration> {
    let invalid = || RaceError::InvalidDuration(s.to_string());

    let mut parts = s.split(':');
    let (hours, minutes, seconds) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(h), Some(m), Some(sec), None) => (h, m, sec),
        _ => return Err(invalid()),
    };

    let (seconds, millis) = match seconds.split_once('.') {
        Some((whole, fraction)) => (whole, parse_millis(fraction).ok_or_else(invalid)?),
        None => (seconds, 0),
    };

    let hours = parse_digits(hours).ok_or_else(invalid)?;
    let minutes = parse_digits(minutes).ok_or_else(invalid)?;
    let seconds = parse_digits(seconds).ok_or_else(invalid)?;

    let total = hours
        .checked_mul(MILLIS_PER_HOUR)
        .and_then(|ms| ms.checked_add(minutes.checked_mul(MILLIS_PER_MINUTE)?))
        .and_then(|ms| ms.checked_add(seconds.checked_mul(MILLIS_PER_SECOND)?))
        .and_then(|ms| ms.checked_add(i64::from(millis)))
        .ok_or_else(invalid)?;

    Ok(Duration::milliseconds(total))
}

/// Format a time of day as `HH:MM:SS.mmm`
pub fn format_time_of_day(t: NaiveTime) -> String {
    t.format("%H:%M:%S%.3f").to_string()
}

/// Format a duration as `HH:MM:SS.mmm`
///
/// Hours are not wrapped at 24. Negative durations (a log that crosses
/// midnight) keep their magnitude and get a leading `-`.
pub fn format_duration(d: Duration) -> String {
    let total = d.num_milliseconds();
    let sign = if total < 0 { "-" } else { "" };
    let total = total.unsigned_abs();

    let hours = total / MILLIS_PER_HOUR as u64;
    let minutes = (total / MILLIS_PER_MINUTE as u64) % 60;
    let seconds = (total / MILLIS_PER_SECOND as u64) % 60;
    let millis = total % MILLIS_PER_SECOND as u64;

    format!("{}{:02}:{:02}:{:02}.{:03}", sign, hours, minutes, seconds, millis)
}

/// Average speed in m/s over `length` meters, with three decimals
///
/// Returns `"0.000"` when the duration is zero or negative.
pub fn format_speed(length: u32, d: Duration) -> String {
    let millis = d.num_milliseconds();
    if millis <= 0 {
        return "0.000".to_string();
    }
    let seconds = millis as f64 / MILLIS_PER_SECOND as f64;
    format!("{:.3}", f64::from(length) / seconds)
}

fn parse_digits(s: &str) -> Option<i64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn parse_millis(fraction: &str) -> Option<u32> {
    if fraction.len() != 3 {
        return None;
    }
    parse_digits(fraction).map(|ms| ms as u32)
}
