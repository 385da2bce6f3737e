//! Timestamp service for the interchange formats.
//!
//! The wire formats carry dates as `yyyyMMdd` and date-times as
//! `yyyyMMddTHHmmss` with an optional trailing `Z`. Values without a
//! zone designator are treated as UTC; the codec layer is timezone-free
//! and works in milliseconds since the Unix epoch throughout.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::error::{CoreError, CoreResult};

/// Parses a `yyyyMMdd` date into epoch milliseconds (midnight UTC).
///
/// ## Errors
/// Returns `CoreError::InvalidTimestamp` if the text is not a valid date.
pub fn parse_date(text: &str) -> CoreResult<i64> {
    let date = NaiveDate::parse_from_str(text.trim(), "%Y%m%d")
        .map_err(|e| CoreError::InvalidTimestamp(format!("{text}: {e}")))?;
    let dt = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| CoreError::InvalidTimestamp(text.to_string()))?;
    Ok(dt.and_utc().timestamp_millis())
}

/// Parses a `yyyyMMddTHHmmss` or `yyyyMMddTHHmmssZ` date-time into epoch
/// milliseconds.
///
/// ## Errors
/// Returns `CoreError::InvalidTimestamp` if the text matches neither form.
pub fn parse_date_time(text: &str) -> CoreResult<i64> {
    let trimmed = text.trim();
    let bare = trimmed.strip_suffix(['Z', 'z']).unwrap_or(trimmed);
    let dt = NaiveDateTime::parse_from_str(bare, "%Y%m%dT%H%M%S")
        .map_err(|e| CoreError::InvalidTimestamp(format!("{text}: {e}")))?;
    Ok(dt.and_utc().timestamp_millis())
}

/// Formats a timestamp as a `yyyyMMdd` date.
#[must_use]
pub fn compose_date(timestamp: i64) -> String {
    utc(timestamp).format("%Y%m%d").to_string()
}

/// Formats a timestamp as a `yyyyMMddTHHmmssZ` date-time.
#[must_use]
pub fn compose_date_time(timestamp: i64) -> String {
    utc(timestamp).format("%Y%m%dT%H%M%SZ").to_string()
}

/// Terse date-only form used for EXDATE lists.
#[must_use]
pub fn compose_date1(timestamp: i64) -> String {
    compose_date(timestamp)
}

fn utc(timestamp: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(timestamp).unwrap_or_else(|| {
        tracing::warn!(timestamp, "timestamp out of range, clamping to epoch");
        DateTime::default()
    })
}
