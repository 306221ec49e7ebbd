//! Calendar date parsing and timestamps

use chrono::{DateTime, NaiveDate};

use crate::error::{StoreError, StoreResult};

/// Current time in Unix milliseconds
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Parse a due date at day granularity
///
/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp, keeping only its calendar date.
pub fn parse_date(input: &str) -> StoreResult<NaiveDate> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(StoreError::validation("due date is required"));
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }

    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.date_naive())
        .map_err(|_| StoreError::validation(format!("invalid date '{}', expected YYYY-MM-DD", trimmed)))
}
