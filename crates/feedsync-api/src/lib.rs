//! HTTP surface of the feed mirror.
//!
//! Exposes an axum [`Router`] backed by any [`FeedStore`] and [`GraphApi`].
//! Authentication happens upstream; the gateway forwards the caller's roles
//! in the `X-User-Roles` header.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = feedsync_api::api_router(AppState::new(store, graph, credentials, settings));
//! ```

pub mod assembler;
pub mod cache;
pub mod caller;
pub mod error;
pub mod feeds;
pub mod service;
pub mod token;
pub mod tokens;

use std::sync::Arc;

use axum::{
  Router, middleware,
  routing::{get, post},
};
use feedsync_core::store::FeedStore;
use feedsync_graph::GraphApi;

pub use error::ApiError;
pub use service::{FeedService, FeedSettings};
pub use token::{Credentials, TokenService};

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S, G> {
  pub feeds:  Arc<FeedService<S, G>>,
  pub tokens: Arc<TokenService<S, G>>,
}

impl<S, G> Clone for AppState<S, G> {
  fn clone(&self) -> Self {
    Self {
      feeds:  Arc::clone(&self.feeds),
      tokens: Arc::clone(&self.tokens),
    }
  }
}

impl<S, G> AppState<S, G>
where
  S: FeedStore,
  G: GraphApi,
{
  /// Wire the services together; the token service is shared by the feed
  /// service and the exchange endpoint.
  pub fn new(
    store: Arc<S>,
    graph: Arc<G>,
    credentials: Credentials,
    settings: FeedSettings,
  ) -> Self {
    let tokens = Arc::new(TokenService::new(
      Arc::clone(&store),
      Arc::clone(&graph),
      credentials,
    ));
    let feeds = Arc::new(FeedService::new(store, graph, Arc::clone(&tokens), settings));
    Self { feeds, tokens }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the API router for `state`.
pub fn api_router<S, G>(state: AppState<S, G>) -> Router<()>
where
  S: FeedStore + 'static,
  G: GraphApi + 'static,
{
  Router::new()
    // Feeds
    .route("/api/feeds", get(feeds::page::<S, G>))
    .route("/api/feeds/all", get(feeds::all::<S, G>))
    .route("/api/feeds/save", get(feeds::save::<S, G>))
    .route("/api/feeds/fetch-new", post(feeds::fetch_new::<S, G>))
    .route("/api/feeds/{id}", get(feeds::get_one::<S, G>))
    // Token
    .route("/api/token/exchange", post(tokens::exchange::<S, G>))
    .layer(middleware::from_fn(error::fill_problem_instance))
    .with_state(state)
}
