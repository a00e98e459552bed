//! Timestamp helpers.
//!
//! SQLite's `datetime('now')` produces `YYYY-MM-DD HH:MM:SS` in UTC; API
//! responses carry RFC 3339.

use chrono::NaiveDateTime;

const SQLITE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Convert a SQLite UTC timestamp to RFC 3339 (e.g. `2024-01-15T10:30:00Z`).
///
/// Values that do not parse are returned unchanged.
pub fn to_rfc3339(datetime_str: &str) -> String {
    match NaiveDateTime::parse_from_str(datetime_str, SQLITE_FORMAT) {
        Ok(naive) => naive.and_utc().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        Err(_) => datetime_str.to_string(),
    }
}
