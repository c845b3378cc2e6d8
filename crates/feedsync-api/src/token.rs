//! Access-token lifecycle: read the stored long-lived token and exchange
//! tokens with the Graph API.

use std::{fmt, sync::Arc};

use chrono::Utc;
use feedsync_core::{store::FeedStore, token::AccessToken};
use feedsync_graph::{GraphApi, TokenExchangeRequest, mapper::map_access_token};

use crate::ApiError;

/// Grant type of the short-lived → long-lived exchange.
pub const FB_EXCHANGE_GRANT: &str = "fb_exchange_token";

/// App credentials sent with every exchange.
#[derive(Clone)]
pub struct Credentials {
  pub client_id:     String,
  pub client_secret: String,
}

impl fmt::Debug for Credentials {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Credentials")
      .field("client_id", &self.client_id)
      .field("client_secret", &"<redacted>")
      .finish()
  }
}

pub struct TokenService<S, G> {
  store:       Arc<S>,
  graph:       Arc<G>,
  credentials: Credentials,
}

impl<S, G> TokenService<S, G>
where
  S: FeedStore,
  G: GraphApi,
{
  pub fn new(store: Arc<S>, graph: Arc<G>, credentials: Credentials) -> Self {
    Self { store, graph, credentials }
  }

  pub async fn current_token(&self) -> Result<Option<AccessToken>, ApiError> {
    self
      .store
      .current_token()
      .await
      .map_err(|e| ApiError::Store(Box::new(e)))
  }

  /// Exchange `token` for a long-lived one and store it as the current
  /// token.
  pub async fn exchange(&self, token: &str) -> Result<AccessToken, ApiError> {
    let dto = self
      .graph
      .exchange_token(TokenExchangeRequest {
        grant_type:        FB_EXCHANGE_GRANT,
        client_id:         &self.credentials.client_id,
        client_secret:     &self.credentials.client_secret,
        fb_exchange_token: token,
      })
      .await?;

    let token = self
      .store
      .store_token(map_access_token(dto, Utc::now())?)
      .await
      .map_err(|e| ApiError::Store(Box::new(e)))?;

    tracing::info!(expires_at = %token.expires_at, "access token exchanged");
    Ok(token)
  }

  /// Re-exchange the stored token so the next Graph API call uses a fresh
  /// one. `None` when no token has ever been stored or the stored one has
  /// expired; an admin has to exchange a new token first.
  pub async fn refresh(&self) -> Result<Option<AccessToken>, ApiError> {
    let Some(current) = self.current_token().await? else {
      return Ok(None);
    };
    if current.is_expired(Utc::now()) {
      tracing::warn!(expires_at = %current.expires_at, "stored access token has expired");
      return Ok(None);
    }
    tracing::debug!(expires_at = %current.expires_at, "refreshing stored token");
    self.exchange(&current.access_token).await.map(Some)
  }
}
