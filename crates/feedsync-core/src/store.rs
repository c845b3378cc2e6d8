//! The `FeedStore` trait.
//!
//! Implemented by storage backends (e.g. `feedsync-store-sqlite`). Higher
//! layers (`feedsync-api`) depend on this abstraction, not on any concrete
//! backend.

use std::future::Future;

use crate::{post::Post, token::AccessToken};

/// Abstraction over persisted posts and the single stored access token.
///
/// A post is always written together with its whole attachment graph.
/// Re-saving a post replaces the previous graph: attachments and
/// sub-attachments that are no longer present are deleted.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait FeedStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Posts ─────────────────────────────────────────────────────────────

  /// Persist `posts`, replacing any stored post with the same graph id.
  /// Returns the number of posts written.
  fn save_posts(
    &self,
    posts: Vec<Post>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Retrieve a post and its attachment graph. Returns `None` if not found.
  fn get_post<'a>(
    &'a self,
    graph_api_id: &'a str,
  ) -> impl Future<Output = Result<Option<Post>, Self::Error>> + Send + 'a;

  // ── Access token ──────────────────────────────────────────────────────

  /// The current access token, if one has ever been stored.
  fn current_token(
    &self,
  ) -> impl Future<Output = Result<Option<AccessToken>, Self::Error>> + Send + '_;

  /// Store `token` as the single current token, overwriting the previous one.
  fn store_token(
    &self,
    token: AccessToken,
  ) -> impl Future<Output = Result<AccessToken, Self::Error>> + Send + '_;
}
