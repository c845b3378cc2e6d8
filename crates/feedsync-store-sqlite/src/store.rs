//! [`SqliteStore`] — the SQLite implementation of [`FeedStore`].

use std::{collections::HashMap, path::Path};

use feedsync_core::{post::Post, store::FeedStore, token::AccessToken};
use rusqlite::OptionalExtension as _;

use crate::{
  Result,
  encode::{RawAttachment, RawPost, RawSubAttachment, RawToken},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A feed store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Load one post with its full attachment tree.
  async fn load(&self, graph_api_id: String) -> Result<Option<Post>> {
    let raw = self
      .conn
      .call(move |conn| Ok(load_raw(conn, &graph_api_id)?))
      .await?;
    raw.map(RawPost::into_post).transpose()
  }
}

// ─── Row loading ─────────────────────────────────────────────────────────────

fn load_raw(
  conn: &rusqlite::Connection,
  graph_api_id: &str,
) -> rusqlite::Result<Option<RawPost>> {
  let Some(mut post) = conn
    .query_row(
      "SELECT graph_api_id, message, created_time FROM posts WHERE graph_api_id = ?1",
      rusqlite::params![graph_api_id],
      |row| {
        Ok(RawPost {
          graph_api_id: row.get(0)?,
          message:      row.get(1)?,
          created_time: row.get(2)?,
          attachments:  Vec::new(),
        })
      },
    )
    .optional()?
  else {
    return Ok(None);
  };

  let mut subs: HashMap<String, Vec<RawSubAttachment>> = HashMap::new();
  {
    let mut stmt = conn.prepare(
      "SELECT s.sub_attachment_id, s.attachment_id, s.position, s.kind, s.url,
              s.media_json, s.target_json
       FROM sub_attachments s
       JOIN attachments a ON a.attachment_id = s.attachment_id
       WHERE a.post_id = ?1
       ORDER BY s.attachment_id, s.position",
    )?;
    let rows = stmt.query_map(rusqlite::params![graph_api_id], |row| {
      Ok(RawSubAttachment {
        sub_attachment_id: row.get(0)?,
        attachment_id:     row.get(1)?,
        position:          row.get(2)?,
        kind:              row.get(3)?,
        url:               row.get(4)?,
        media_json:        row.get(5)?,
        target_json:       row.get(6)?,
      })
    })?;
    for row in rows {
      let row = row?;
      subs.entry(row.attachment_id.clone()).or_default().push(row);
    }
  }

  let mut stmt = conn.prepare(
    "SELECT attachment_id, post_id, position, media_type, kind, media_json
     FROM attachments
     WHERE post_id = ?1
     ORDER BY position",
  )?;
  let rows = stmt.query_map(rusqlite::params![graph_api_id], |row| {
    Ok(RawAttachment {
      attachment_id:   row.get(0)?,
      post_id:         row.get(1)?,
      position:        row.get(2)?,
      media_type:      row.get(3)?,
      kind:            row.get(4)?,
      media_json:      row.get(5)?,
      sub_attachments: Vec::new(),
    })
  })?;
  for row in rows {
    let mut row = row?;
    row.sub_attachments = subs.remove(&row.attachment_id).unwrap_or_default();
    post.attachments.push(row);
  }
  Ok(Some(post))
}

fn insert_post(tx: &rusqlite::Transaction<'_>, post: &RawPost) -> rusqlite::Result<()> {
  // Cascades to attachments and sub-attachments.
  tx.execute(
    "DELETE FROM posts WHERE graph_api_id = ?1",
    rusqlite::params![post.graph_api_id],
  )?;
  tx.execute(
    "INSERT INTO posts (graph_api_id, message, created_time) VALUES (?1, ?2, ?3)",
    rusqlite::params![post.graph_api_id, post.message, post.created_time],
  )?;

  for a in &post.attachments {
    tx.execute(
      "INSERT INTO attachments (
         attachment_id, post_id, position, media_type, kind, media_json
       ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
      rusqlite::params![
        a.attachment_id,
        post.graph_api_id,
        a.position,
        a.media_type,
        a.kind,
        a.media_json,
      ],
    )?;

    for s in &a.sub_attachments {
      tx.execute(
        "INSERT INTO sub_attachments (
           sub_attachment_id, attachment_id, position, kind, url,
           media_json, target_json
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        rusqlite::params![
          s.sub_attachment_id,
          s.attachment_id,
          s.position,
          s.kind,
          s.url,
          s.media_json,
          s.target_json,
        ],
      )?;
    }
  }
  Ok(())
}

// ─── FeedStore impl ──────────────────────────────────────────────────────────

impl FeedStore for SqliteStore {
  type Error = crate::Error;

  // ── Posts ─────────────────────────────────────────────────────────────────

  async fn save_posts(&self, posts: Vec<Post>) -> Result<usize> {
    let raws = posts.iter().map(RawPost::encode).collect::<Result<Vec<_>>>()?;
    let count = raws.len();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        for raw in &raws {
          insert_post(&tx, raw)?;
        }
        tx.commit()?;
        Ok(())
      })
      .await?;

    tracing::debug!(count, "saved posts");
    Ok(count)
  }

  async fn get_post(&self, graph_api_id: &str) -> Result<Option<Post>> {
    self.load(graph_api_id.to_owned()).await
  }

  // ── Access token ──────────────────────────────────────────────────────────

  async fn current_token(&self) -> Result<Option<AccessToken>> {
    let raw: Option<RawToken> = self
      .conn
      .call(|conn| {
        Ok(conn
          .query_row(
            "SELECT access_token, token_type, expires_at FROM access_token WHERE id = ?1",
            rusqlite::params![AccessToken::ROW_ID],
            |row| {
              Ok(RawToken {
                access_token: row.get(0)?,
                token_type:   row.get(1)?,
                expires_at:   row.get(2)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawToken::into_token).transpose()
  }

  async fn store_token(&self, token: AccessToken) -> Result<AccessToken> {
    let raw = RawToken::encode(&token);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO access_token (id, access_token, token_type, expires_at)
           VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT (id) DO UPDATE SET
             access_token = excluded.access_token,
             token_type   = excluded.token_type,
             expires_at   = excluded.expires_at",
          rusqlite::params![
            AccessToken::ROW_ID,
            raw.access_token,
            raw.token_type,
            raw.expires_at,
          ],
        )?;
        Ok(())
      })
      .await?;

    tracing::debug!(expires_at = %token.expires_at, "stored access token");
    Ok(token)
  }
}
