use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::AppError;

/// Canonical form every stored and returned date uses.
const CANONICAL: &str = "%Y-%m-%d";

/// Normalizes any accepted date representation to `YYYY-MM-DD`.
///
/// Accepts the canonical form itself (idempotent), RFC 3339 datetimes,
/// `YYYY-MM-DD HH:MM:SS`, and `MM/DD/YYYY`. The time component, if any,
/// is dropped; the calendar date is taken as written (UTC for RFC 3339
/// inputs).
pub fn normalize(input: &str) -> Result<String, AppError> {
    let trimmed = input.trim();

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, CANONICAL) {
        return Ok(date.format(CANONICAL).to_string());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.to_utc().date_naive().format(CANONICAL).to_string());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt.date().format(CANONICAL).to_string());
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%m/%d/%Y") {
        return Ok(date.format(CANONICAL).to_string());
    }

    Err(AppError::InvalidDate(input.to_string()))
}

/// Read-side normalization: stored values are already canonical, but a DATE
/// column rendered with a time component still comes back as a plain date.
/// Values that no longer parse are passed through unchanged.
pub fn normalize_lossy(stored: &str) -> String {
    normalize(stored).unwrap_or_else(|_| stored.to_string())
}
