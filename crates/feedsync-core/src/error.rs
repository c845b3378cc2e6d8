//! Error types for `feedsync-core`.

use thiserror::Error;

use crate::validation::Violation;

#[derive(Debug, Error)]
pub enum Error {
  #[error("feed not found with id: {0}")]
  PostNotFound(String),

  #[error("validation failed: {}", summarize(.0))]
  Validation(Vec<Violation>),

  #[error("invalid created_time {value:?}: {reason}")]
  InvalidTimestamp { value: String, reason: String },

  #[error("token expiry {0}s is out of range")]
  InvalidExpiry(i64),
}

fn summarize(violations: &[Violation]) -> String {
  violations
    .iter()
    .map(|v| format!("{}: {}", v.field, v.message))
    .collect::<Vec<_>>()
    .join("; ")
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
