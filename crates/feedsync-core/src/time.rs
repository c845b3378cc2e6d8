//! Parsing of Graph API `created_time` values.

use chrono::{DateTime, FixedOffset};

use crate::{Error, Result};

/// Graph API timestamps look like `2024-01-15T10:30:00+0000`.
pub const CREATED_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Parse a `created_time` string into an offset-aware timestamp.
///
/// Malformed input is an error; there is no fallback value.
pub fn parse_created_time(value: &str) -> Result<DateTime<FixedOffset>> {
  DateTime::parse_from_str(value, CREATED_TIME_FORMAT).map_err(|e| {
    Error::InvalidTimestamp {
      value:  value.to_owned(),
      reason: e.to_string(),
    }
  })
}
