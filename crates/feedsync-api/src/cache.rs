//! Single-slot feed cache with single-flight population.
//!
//! Every caller shares one entry, whatever parameters the read came with.
//! The slot lock is held for the whole upstream fetch, so callers arriving
//! during a population wait for it and then read its result instead of
//! issuing their own request.

use std::{future::Future, sync::Arc};

use feedsync_core::post::Post;
use tokio::sync::Mutex;

/// Name of the one cache entry.
pub const FEED_CACHE_NAME: &str = "facebookFeeds";

#[derive(Default)]
pub struct FeedCache {
  slot: Mutex<Option<Arc<Vec<Post>>>>,
}

impl FeedCache {
  pub fn new() -> Self { Self::default() }

  pub async fn get(&self) -> Option<Arc<Vec<Post>>> {
    self.slot.lock().await.clone()
  }

  /// Return the cached feed, or run `fetch` and cache its result.
  ///
  /// Errors and empty results are returned to the caller but never stored.
  pub async fn get_or_try_populate<F, Fut, E>(&self, fetch: F) -> Result<Arc<Vec<Post>>, E>
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Vec<Post>, E>>,
  {
    let mut slot = self.slot.lock().await;
    if let Some(posts) = slot.as_ref() {
      tracing::debug!(cache = FEED_CACHE_NAME, "cache hit");
      return Ok(Arc::clone(posts));
    }

    tracing::debug!(cache = FEED_CACHE_NAME, "cache miss");
    let posts = Arc::new(fetch().await?);
    if !posts.is_empty() {
      *slot = Some(Arc::clone(&posts));
    }
    Ok(posts)
  }

  pub async fn invalidate(&self) {
    if self.slot.lock().await.take().is_some() {
      tracing::debug!(cache = FEED_CACHE_NAME, "cache evicted");
    }
  }
}
