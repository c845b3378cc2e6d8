//! The long-lived Graph API credential.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// The currently valid long-lived access token.
///
/// Exactly one token exists at a time; storing a new one replaces the old.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
  pub access_token: String,
  pub token_type:   String,
  pub expires_at:   DateTime<Utc>,
}

impl AccessToken {
  /// Fixed row identifier of the single stored token.
  pub const ROW_ID: i64 = 1;

  /// Build a token that expires `expires_in` seconds after `now`.
  ///
  /// Fails when the expiry falls outside the representable date range.
  pub fn issued(
    access_token: String,
    token_type: String,
    expires_in: i64,
    now: DateTime<Utc>,
  ) -> Result<Self> {
    let expires_at = TimeDelta::try_seconds(expires_in)
      .and_then(|delta| now.checked_add_signed(delta))
      .ok_or(Error::InvalidExpiry(expires_in))?;
    Ok(Self { access_token, token_type, expires_at })
  }

  pub fn is_expired(&self, now: DateTime<Utc>) -> bool { now >= self.expires_at }
}

// Keeps the secret out of logs.
impl fmt::Debug for AccessToken {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("AccessToken")
      .field("access_token", &"<redacted>")
      .field("token_type", &self.token_type)
      .field("expires_at", &self.expires_at)
      .finish()
  }
}
