//! Time and timestamp helpers.

use chrono::{DateTime, Utc};

/// UTC timestamp used for `started_at`, `completed_at`, `last_run_at`, etc.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Parse an RFC 3339 string (the storage representation) into a UTC timestamp.
///
/// # Errors
///
/// Returns [`chrono::ParseError`] if `text` is not valid RFC 3339.
pub fn parse_rfc3339(text: &str) -> Result<Timestamp, chrono::ParseError> {
    DateTime::parse_from_rfc3339(text).map(|dt| dt.to_utc())
}
