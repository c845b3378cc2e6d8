//! Async HTTP client for the Graph API.

use std::{future::Future, time::Duration};

use feedsync_core::problem::ProblemDetail;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::{
  Error, Result,
  dto::{AccessTokenDto, GraphApiResponse, GraphErrorEnvelope},
};

/// Parameters of the short-lived → long-lived token exchange.
#[derive(Clone, Copy)]
pub struct TokenExchangeRequest<'a> {
  pub grant_type:        &'a str,
  pub client_id:         &'a str,
  pub client_secret:     &'a str,
  pub fb_exchange_token: &'a str,
}

/// The two Graph API calls the feed mirror needs.
///
/// [`GraphClient`] is the HTTP implementation; tests substitute in-process
/// fakes.
pub trait GraphApi: Send + Sync {
  /// `GET /{page-id}/feed?fields=..&limit=..&access_token=..`
  fn fetch_feed<'a>(
    &'a self,
    fields: &'a str,
    limit: u32,
    access_token: &'a str,
  ) -> impl Future<Output = Result<GraphApiResponse>> + Send + 'a;

  /// `GET /oauth/access_token?grant_type=..&client_id=..&client_secret=..&fb_exchange_token=..`
  fn exchange_token<'a>(
    &'a self,
    request: TokenExchangeRequest<'a>,
  ) -> impl Future<Output = Result<AccessTokenDto>> + Send + 'a;
}

/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct GraphClient {
  client:   Client,
  base_url: String,
  page_id:  String,
}

impl GraphClient {
  /// Every request is bounded by `timeout`.
  pub fn new(
    base_url: impl Into<String>,
    page_id: impl Into<String>,
    timeout: Duration,
  ) -> Result<Self> {
    let client = Client::builder()
      .timeout(timeout)
      .build()
      .map_err(Error::Client)?;
    Ok(Self {
      client,
      base_url: base_url.into(),
      page_id: page_id.into(),
    })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.base_url.trim_end_matches('/'), path)
  }

  async fn get_json<T: DeserializeOwned>(
    &self,
    endpoint: &'static str,
    request: RequestBuilder,
  ) -> Result<T> {
    // Strip the URL from transport errors: it carries the access token.
    let resp = request.send().await.map_err(|e| {
      tracing::error!(endpoint, error = %e.without_url(), "graph api request failed");
      Error::Unreachable {
        endpoint,
        problem: ProblemDetail::bad_gateway(),
      }
    })?;

    let status = resp.status();
    let body = resp.bytes().await.map_err(|e| {
      tracing::error!(endpoint, error = %e.without_url(), "graph api body read failed");
      Error::Unreachable {
        endpoint,
        problem: ProblemDetail::bad_gateway(),
      }
    })?;

    if !status.is_success() {
      let envelope: GraphErrorEnvelope =
        serde_json::from_slice(&body).unwrap_or_default();
      tracing::error!(
        endpoint,
        status = status.as_u16(),
        code = envelope.error.code,
        kind = %envelope.error.kind,
        message = %envelope.error.message,
        fbtrace_id = envelope.error.fbtrace_id.as_deref().unwrap_or("-"),
        "graph api answered with an error"
      );
      return Err(Error::Upstream {
        endpoint,
        status: status.as_u16(),
        problem: ProblemDetail::bad_gateway(),
      });
    }

    serde_json::from_slice(&body).map_err(|source| Error::Decode { endpoint, source })
  }
}

impl GraphApi for GraphClient {
  async fn fetch_feed<'a>(
    &'a self,
    fields: &'a str,
    limit: u32,
    access_token: &'a str,
  ) -> Result<GraphApiResponse> {
    tracing::debug!(page_id = %self.page_id, limit, "requesting page feed");
    let limit = limit.to_string();
    let request = self
      .client
      .get(self.url(&format!("/{}/feed", self.page_id)))
      .query(&[
        ("fields", fields),
        ("limit", limit.as_str()),
        ("access_token", access_token),
      ]);
    self.get_json("feed", request).await
  }

  async fn exchange_token<'a>(
    &'a self,
    request: TokenExchangeRequest<'a>,
  ) -> Result<AccessTokenDto> {
    tracing::debug!(grant_type = request.grant_type, "requesting token exchange");
    let http = self.client.get(self.url("/oauth/access_token")).query(&[
      ("grant_type", request.grant_type),
      ("client_id", request.client_id),
      ("client_secret", request.client_secret),
      ("fb_exchange_token", request.fb_exchange_token),
    ]);
    self.get_json("oauth/access_token", http).await
  }
}
