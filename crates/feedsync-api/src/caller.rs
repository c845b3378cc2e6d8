//! The calling principal, as forwarded by the gateway.

use std::convert::Infallible;

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, request::Parts},
};

/// Header carrying the caller's roles, comma-separated.
pub const ROLES_HEADER: &str = "x-user-roles";

/// Role allowed to exchange access tokens.
pub const ADMIN_ROLE: &str = "ADMIN_ROLE";

/// Roles of the current request. Absent or unreadable headers mean no roles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Caller {
  roles: Vec<String>,
}

impl Caller {
  pub fn with_roles<I, R>(roles: I) -> Self
  where
    I: IntoIterator<Item = R>,
    R: Into<String>,
  {
    Self { roles: roles.into_iter().map(Into::into).collect() }
  }

  pub fn from_headers(headers: &HeaderMap) -> Self {
    let roles = headers
      .get_all(ROLES_HEADER)
      .iter()
      .filter_map(|v| v.to_str().ok())
      .flat_map(|v| v.split(','))
      .map(str::trim)
      .filter(|r| !r.is_empty())
      .map(str::to_owned)
      .collect();
    Self { roles }
  }

  pub fn has_role(&self, role: &str) -> bool { self.roles.iter().any(|r| r == role) }

  pub fn is_admin(&self) -> bool { self.has_role(ADMIN_ROLE) }
}

impl<S: Send + Sync> FromRequestParts<S> for Caller {
  type Rejection = Infallible;

  async fn from_request_parts(
    parts: &mut Parts,
    _state: &S,
  ) -> Result<Self, Self::Rejection> {
    Ok(Caller::from_headers(&parts.headers))
  }
}
