//! Feed fetching, caching and querying.

use std::sync::Arc;

use feedsync_core::{
  Error,
  page::{Page, PageRequest, paginate},
  post::Post,
  store::FeedStore,
};
use feedsync_graph::{GraphApi, mapper::map_feed};

use crate::{ApiError, cache::FeedCache, token::TokenService};

/// What to ask the Graph API for on each fetch.
#[derive(Debug, Clone)]
pub struct FeedSettings {
  pub fields: String,
  pub limit:  u32,
}

pub struct FeedService<S, G> {
  store:    Arc<S>,
  graph:    Arc<G>,
  tokens:   Arc<TokenService<S, G>>,
  cache:    FeedCache,
  settings: FeedSettings,
}

impl<S, G> FeedService<S, G>
where
  S: FeedStore,
  G: GraphApi,
{
  pub fn new(
    store: Arc<S>,
    graph: Arc<G>,
    tokens: Arc<TokenService<S, G>>,
    settings: FeedSettings,
  ) -> Self {
    Self { store, graph, tokens, cache: FeedCache::new(), settings }
  }

  // ── Fetch ─────────────────────────────────────────────────────────────────

  /// The full current feed, served from the cache when populated.
  pub async fn fetch_feeds(&self) -> Result<Arc<Vec<Post>>, ApiError> {
    self.cache.get_or_try_populate(|| self.fetch_uncached()).await
  }

  /// Evict the cache and fetch again.
  pub async fn refresh(&self) -> Result<Arc<Vec<Post>>, ApiError> {
    self.cache.invalidate().await;
    self.fetch_feeds().await
  }

  async fn fetch_uncached(&self) -> Result<Vec<Post>, ApiError> {
    let Some(token) = self.tokens.refresh().await? else {
      tracing::warn!("no access token stored; serving an empty feed");
      return Ok(Vec::new());
    };

    let response = self
      .graph
      .fetch_feed(&self.settings.fields, self.settings.limit, &token.access_token)
      .await?;
    if response.data.is_none() {
      tracing::warn!("graph api returned no feed data");
    }

    let posts = map_feed(response)?;
    tracing::info!(count = posts.len(), "fetched feed");
    Ok(posts)
  }

  /// Fetch (through the cache) and persist the snapshot.
  pub async fn save_feeds(&self) -> Result<usize, ApiError> {
    let posts = self.fetch_feeds().await?;
    let saved = self
      .store
      .save_posts(posts.to_vec())
      .await
      .map_err(|e| ApiError::Store(Box::new(e)))?;
    tracing::info!(saved, "persisted feed snapshot");
    Ok(saved)
  }

  // ── Query ─────────────────────────────────────────────────────────────────

  pub async fn all_feeds(&self) -> Result<Arc<Vec<Post>>, ApiError> {
    self.fetch_feeds().await
  }

  pub async fn feeds(&self, request: PageRequest) -> Result<Page<Post>, ApiError> {
    let posts = self.fetch_feeds().await?;
    let page = paginate(&posts, request);
    tracing::debug!(
      page = page.number,
      size = page.size,
      total = page.total,
      "paged feed"
    );
    Ok(page)
  }

  /// Look a post up in persisted storage.
  pub async fn feed_by_id(&self, graph_api_id: &str) -> Result<Post, ApiError> {
    self
      .store
      .get_post(graph_api_id)
      .await
      .map_err(|e| ApiError::Store(Box::new(e)))?
      .ok_or_else(|| Error::PostNotFound(graph_api_id.to_owned()).into())
  }
}
