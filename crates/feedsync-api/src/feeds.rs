//! Handlers for `/api/feeds` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/api/feeds` | `?page=0&size=20`, sliced from the cached feed |
//! | `GET`  | `/api/feeds/all` | Whole cached feed |
//! | `GET`  | `/api/feeds/save` | Populate the cache and persist it; 204 |
//! | `POST` | `/api/feeds/fetch-new` | Evict the cache and fetch again |
//! | `GET`  | `/api/feeds/{id}` | Persisted post; 404 if not found |

use axum::{
  extract::{Path, Query, State, rejection::QueryRejection},
  http::StatusCode,
};
use feedsync_core::{
  Result as CoreResult,
  page::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, Page, PageRequest},
  store::FeedStore,
  validation::{Validate, Validator},
};
use feedsync_graph::GraphApi;
use serde::Deserialize;

use crate::{
  ApiError, AppState,
  assembler::{self, FeedCollectionModel, FeedModel, Hal},
  caller::Caller,
};

// ─── Paging parameters ───────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
  pub page: Option<i64>,
  pub size: Option<i64>,
}

impl Validate for PageParams {
  fn validate(&self) -> CoreResult<()> {
    let page = self.page.unwrap_or(0);
    let size = self.size.unwrap_or(DEFAULT_PAGE_SIZE as i64);
    Validator::new()
      .at_least("page", page, 0)
      .range("size", size, 1, MAX_PAGE_SIZE as i64)
      .finish()
  }
}

impl PageParams {
  /// Validate and convert to a [`PageRequest`].
  pub fn into_request(self) -> CoreResult<PageRequest> {
    self.validate()?;
    Ok(PageRequest::new(
      self.page.unwrap_or(0) as usize,
      self.size.map_or(DEFAULT_PAGE_SIZE, |s| s as usize),
    ))
  }
}

// ─── Handlers ────────────────────────────────────────────────────────────────

/// `GET /api/feeds[?page=<n>&size=<n>]`
pub async fn page<S, G>(
  State(state): State<AppState<S, G>>,
  caller: Caller,
  params: Result<Query<PageParams>, QueryRejection>,
) -> Result<Hal<FeedCollectionModel>, ApiError>
where
  S: FeedStore,
  G: GraphApi,
{
  let Query(params) = params.map_err(|e| ApiError::BadRequest(e.body_text()))?;
  let request = params.into_request()?;
  let page = state.feeds.feeds(request).await?;
  Ok(Hal(assembler::page(&page, &caller)))
}

/// `GET /api/feeds/all`
pub async fn all<S, G>(
  State(state): State<AppState<S, G>>,
  caller: Caller,
) -> Result<Hal<FeedCollectionModel>, ApiError>
where
  S: FeedStore,
  G: GraphApi,
{
  let posts = state.feeds.all_feeds().await?;
  Ok(Hal(assembler::collection(&posts, &caller)))
}

/// `GET /api/feeds/save`
pub async fn save<S, G>(
  State(state): State<AppState<S, G>>,
) -> Result<StatusCode, ApiError>
where
  S: FeedStore,
  G: GraphApi,
{
  state.feeds.save_feeds().await?;
  Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/feeds/fetch-new`
pub async fn fetch_new<S, G>(
  State(state): State<AppState<S, G>>,
  caller: Caller,
) -> Result<Hal<FeedCollectionModel>, ApiError>
where
  S: FeedStore,
  G: GraphApi,
{
  let posts = state.feeds.refresh().await?;
  let page = Page::unpaged(posts.to_vec());
  Ok(Hal(assembler::refreshed(&page, &caller)))
}

/// `GET /api/feeds/{id}`
pub async fn get_one<S, G>(
  State(state): State<AppState<S, G>>,
  caller: Caller,
  Path(id): Path<String>,
) -> Result<Hal<FeedModel>, ApiError>
where
  S: FeedStore,
  G: GraphApi,
{
  let post = state.feeds.feed_by_id(&id).await?;
  Ok(Hal(assembler::item(&post, &caller)))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_apply_when_absent() {
    let request = PageParams::default().into_request().unwrap();
    assert_eq!(request, PageRequest::new(0, DEFAULT_PAGE_SIZE));
  }

  #[test]
  fn out_of_range_values_are_all_reported() {
    let err = PageParams { page: Some(-1), size: Some(0) }
      .into_request()
      .unwrap_err();
    let feedsync_core::Error::Validation(violations) = err else {
      panic!("expected validation error");
    };
    let fields: Vec<_> = violations.iter().map(|v| v.field.as_str()).collect();
    assert_eq!(fields, ["page", "size"]);
    assert_eq!(violations[0].message, "must be greater than or equal to 0");
    assert_eq!(violations[1].message, format!("must be between 1 and {MAX_PAGE_SIZE}"));
  }

  #[test]
  fn size_above_maximum_is_rejected() {
    let params = PageParams { page: Some(0), size: Some(MAX_PAGE_SIZE as i64 + 1) };
    assert!(params.into_request().is_err());
    let params = PageParams { page: Some(3), size: Some(MAX_PAGE_SIZE as i64) };
    assert_eq!(params.into_request().unwrap(), PageRequest::new(3, MAX_PAGE_SIZE));
  }
}
