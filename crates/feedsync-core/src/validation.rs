//! Composable field validation for inbound commands.
//!
//! Checks accumulate every [`Violation`] instead of stopping at the first, so
//! a 400 response can enumerate all offending fields at once.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A single failed constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
  pub field:   String,
  pub message: String,
}

/// Implemented by request bodies that can check themselves.
pub trait Validate {
  fn validate(&self) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct Validator {
  violations: Vec<Violation>,
}

impl Validator {
  pub fn new() -> Self { Self::default() }

  /// Record a violation for `field` unless `ok` holds. Use this for
  /// cross-field rules such as `start < end`.
  pub fn check(mut self, field: &str, ok: bool, message: impl Into<String>) -> Self {
    if !ok {
      self.violations.push(Violation {
        field:   field.to_owned(),
        message: message.into(),
      });
    }
    self
  }

  pub fn not_blank(self, field: &str, value: &str) -> Self {
    self.check(field, !value.trim().is_empty(), "must not be blank")
  }

  /// Character count of `value` must lie in `min..=max`.
  pub fn length(self, field: &str, value: &str, min: usize, max: usize) -> Self {
    let len = value.chars().count();
    self.check(
      field,
      (min..=max).contains(&len),
      format!("size must be between {min} and {max}"),
    )
  }

  pub fn range(self, field: &str, value: i64, min: i64, max: i64) -> Self {
    self.check(
      field,
      (min..=max).contains(&value),
      format!("must be between {min} and {max}"),
    )
  }

  pub fn at_least(self, field: &str, value: i64, min: i64) -> Self {
    self.check(
      field,
      value >= min,
      format!("must be greater than or equal to {min}"),
    )
  }

  pub fn finish(self) -> Result<()> {
    if self.violations.is_empty() {
      Ok(())
    } else {
      Err(Error::Validation(self.violations))
    }
  }
}
