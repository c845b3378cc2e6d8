//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{DateTime, TimeZone, Utc};
use feedsync_core::{
  post::{Attachment, Image, Media, Post, SubAttachment, Target},
  store::FeedStore,
  token::AccessToken,
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn post(id: &str, created: &str, attachments: usize) -> Post {
  let attachments = (0..attachments)
    .map(|position| {
      let attachment_id = Attachment::derive_id(id, position);
      Attachment {
        id:              attachment_id,
        post_id:         id.into(),
        media_type:      Some("album".into()),
        kind:            Some("album".into()),
        media:           Some(Media {
          source: None,
          image:  Some(Image { height: 720, width: 1280, src: Some("https://img/a.jpg".into()) }),
        }),
        sub_attachments: vec![SubAttachment {
          id:            SubAttachment::derive_id(attachment_id, 0),
          attachment_id,
          kind:          Some("photo".into()),
          url:           Some("https://fb/p/1".into()),
          media:         None,
          target:        Some(Target { id: Some("t1".into()), url: None }),
        }],
      }
    })
    .collect();

  Post {
    graph_api_id: id.into(),
    message: Some(format!("post {id}")),
    created_time: DateTime::parse_from_rfc3339(created).unwrap(),
    attachments,
  }
}

// ─── Posts ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn save_and_get_full_graph() {
  let s = store().await;
  let original = post("p1", "2024-01-15T10:30:00+02:00", 2);

  assert_eq!(s.save_posts(vec![original.clone()]).await.unwrap(), 1);

  let fetched = s.get_post("p1").await.unwrap().unwrap();
  assert_eq!(fetched, original);
  assert!(fetched.is_linked());
  assert_eq!(fetched.created_time.offset().local_minus_utc(), 2 * 3600);
}

#[tokio::test]
async fn get_post_missing_returns_none() {
  let s = store().await;
  assert!(s.get_post("nope").await.unwrap().is_none());
}

#[tokio::test]
async fn attachments_are_stored_under_the_enclosing_post() {
  let s = store().await;
  let mut stray = post("p1", "2024-01-15T10:30:00+00:00", 2);
  stray.attachments[0].post_id = "elsewhere".into();
  stray.attachments[1].post_id = String::new();
  assert!(!stray.is_linked());

  s.save_posts(vec![stray]).await.unwrap();

  let fetched = s.get_post("p1").await.unwrap().unwrap();
  assert_eq!(fetched.attachments.len(), 2);
  assert!(fetched.attachments.iter().all(|a| a.post_id == "p1"));
  assert!(fetched.is_linked());
  assert!(s.get_post("elsewhere").await.unwrap().is_none());
}

#[tokio::test]
async fn resaving_replaces_attachment_tree() {
  let s = store().await;
  s.save_posts(vec![post("p1", "2024-01-15T10:30:00+00:00", 3)])
    .await
    .unwrap();

  let mut shrunk = post("p1", "2024-01-15T10:30:00+00:00", 1);
  shrunk.message = Some("edited".into());
  s.save_posts(vec![shrunk.clone()]).await.unwrap();

  let fetched = s.get_post("p1").await.unwrap().unwrap();
  assert_eq!(fetched, shrunk);
  assert_eq!(fetched.attachments.len(), 1);
}

#[tokio::test]
async fn post_without_attachments_or_message() {
  let s = store().await;
  let mut bare = post("bare", "2024-01-15T10:30:00+00:00", 0);
  bare.message = None;
  s.save_posts(vec![bare.clone()]).await.unwrap();

  assert_eq!(s.get_post("bare").await.unwrap(), Some(bare));
}

#[tokio::test]
async fn saving_nothing_is_a_no_op() {
  let s = store().await;
  assert_eq!(s.save_posts(vec![]).await.unwrap(), 0);
  assert!(s.get_post("p1").await.unwrap().is_none());
}

// ─── Access token ────────────────────────────────────────────────────────────

#[tokio::test]
async fn token_absent_initially() {
  let s = store().await;
  assert!(s.current_token().await.unwrap().is_none());
}

#[tokio::test]
async fn storing_token_overwrites_single_row() {
  let s = store().await;
  let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

  let first = AccessToken::issued("first".into(), "bearer".into(), 60, now).unwrap();
  s.store_token(first).await.unwrap();

  let second =
    AccessToken::issued("second".into(), "bearer".into(), 5_184_000, now).unwrap();
  let stored = s.store_token(second.clone()).await.unwrap();
  assert_eq!(stored, second);

  let current = s.current_token().await.unwrap().unwrap();
  assert_eq!(current, second);
  assert_eq!(current.access_token, "second");
}

#[tokio::test]
async fn file_store_survives_reopen() {
  let dir = std::env::temp_dir().join(format!("feedsync-{}", uuid::Uuid::new_v4()));
  std::fs::create_dir_all(&dir).unwrap();
  let path = dir.join("feeds.db");

  {
    let s = SqliteStore::open(&path).await.unwrap();
    s.save_posts(vec![post("p1", "2024-01-15T10:30:00+00:00", 1)])
      .await
      .unwrap();
  }

  let reopened = SqliteStore::open(&path).await.unwrap();
  assert!(reopened.get_post("p1").await.unwrap().is_some());

  std::fs::remove_dir_all(&dir).ok();
}
