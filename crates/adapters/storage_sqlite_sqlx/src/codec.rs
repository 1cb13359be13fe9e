//! Column encoding shared by the repositories.
//!
//! Identifiers are stored as hyphenated UUID text, timestamps as RFC 3339
//! with a fixed microsecond precision so that text order is time order.

use std::str::FromStr;

use chrono::SecondsFormat;

use fieldops_domain::time::{self, Timestamp};

pub(crate) fn decode_err<E>(err: E) -> sqlx::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    sqlx::Error::Decode(Box::new(err))
}

pub(crate) fn encode_ts(ts: Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn decode_ts(text: &str) -> Result<Timestamp, sqlx::Error> {
    time::parse_rfc3339(text).map_err(decode_err)
}

pub(crate) fn decode_id<T>(text: &str) -> Result<T, sqlx::Error>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    T::from_str(text).map_err(decode_err)
}

/// Read a non-negative `INTEGER` column into an unsigned Rust integer.
pub(crate) fn decode_count<T>(value: i64) -> Result<T, sqlx::Error>
where
    T: TryFrom<i64, Error = std::num::TryFromIntError>,
{
    T::try_from(value).map_err(decode_err)
}

/// Map a non-`std::error::Error` parse failure (e.g. a status enum) into a decode error.
pub(crate) fn decode_msg(message: String) -> sqlx::Error {
    sqlx::Error::Decode(message.into())
}
