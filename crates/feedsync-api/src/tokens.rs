//! Handler for `POST /api/token/exchange`.
//!
//! Body: `{"accessToken":"<short-lived token>"}`. Admin only; 204 on success.

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
  http::StatusCode,
};
use feedsync_core::{
  Result as CoreResult,
  store::FeedStore,
  validation::{Validate, Validator},
};
use feedsync_graph::GraphApi;
use serde::Deserialize;

use crate::{
  ApiError, AppState,
  caller::{ADMIN_ROLE, Caller},
};

/// Largest `accessToken` accepted by the exchange endpoint.
pub const ACCESS_TOKEN_MAX_LEN: usize = 512;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeTokenRequest {
  #[serde(default)]
  pub access_token: String,
}

impl Validate for ExchangeTokenRequest {
  fn validate(&self) -> CoreResult<()> {
    Validator::new()
      .not_blank("accessToken", &self.access_token)
      .length("accessToken", &self.access_token, 1, ACCESS_TOKEN_MAX_LEN)
      .finish()
  }
}

/// `POST /api/token/exchange`
pub async fn exchange<S, G>(
  State(state): State<AppState<S, G>>,
  caller: Caller,
  body: Result<Json<ExchangeTokenRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError>
where
  S: FeedStore,
  G: GraphApi,
{
  if !caller.is_admin() {
    return Err(ApiError::Forbidden(format!("{ADMIN_ROLE} required")));
  }
  let Json(body) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
  body.validate()?;

  state.tokens.exchange(&body.access_token).await?;
  Ok(StatusCode::NO_CONTENT)
}
