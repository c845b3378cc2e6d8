//! Parent lookup over a set of posts.
//!
//! Children only store their parent's identifier. [`FeedIndex`] resolves
//! those identifiers back to the owning entities in O(1).

use std::collections::HashMap;

use uuid::Uuid;

use crate::post::{Attachment, Post, SubAttachment};

/// Borrowing index over a slice of posts.
pub struct FeedIndex<'a> {
  posts:       HashMap<&'a str, &'a Post>,
  attachments: HashMap<Uuid, &'a Attachment>,
}

impl<'a> FeedIndex<'a> {
  pub fn new(posts: &'a [Post]) -> Self {
    let mut by_id = HashMap::with_capacity(posts.len());
    let mut attachments = HashMap::new();
    for post in posts {
      by_id.insert(post.graph_api_id.as_str(), post);
      for attachment in &post.attachments {
        attachments.insert(attachment.id, attachment);
      }
    }
    Self { posts: by_id, attachments }
  }

  pub fn post(&self, graph_api_id: &str) -> Option<&'a Post> {
    self.posts.get(graph_api_id).copied()
  }

  pub fn attachment(&self, id: Uuid) -> Option<&'a Attachment> {
    self.attachments.get(&id).copied()
  }

  /// The post owning `attachment`.
  pub fn post_of(&self, attachment: &Attachment) -> Option<&'a Post> {
    self.post(&attachment.post_id)
  }

  /// The attachment owning `sub`.
  pub fn attachment_of(&self, sub: &SubAttachment) -> Option<&'a Attachment> {
    self.attachment(sub.attachment_id)
  }
}

#[cfg(test)]
mod tests {
  use chrono::DateTime;

  use super::*;

  fn graph() -> Vec<Post> {
    let a0 = Attachment::derive_id("p1", 0);
    let a1 = Attachment::derive_id("p1", 1);
    vec![Post {
      graph_api_id: "p1".into(),
      message:      Some("hello".into()),
      created_time: DateTime::parse_from_rfc3339("2024-01-15T10:30:00Z").unwrap(),
      attachments:  vec![
        Attachment {
          id:              a0,
          post_id:         "p1".into(),
          media_type:      Some("photo".into()),
          kind:            Some("photo".into()),
          media:           None,
          sub_attachments: vec![],
        },
        Attachment {
          id:              a1,
          post_id:         "p1".into(),
          media_type:      Some("album".into()),
          kind:            Some("album".into()),
          media:           None,
          sub_attachments: vec![SubAttachment {
            id:            SubAttachment::derive_id(a1, 0),
            attachment_id: a1,
            kind:          Some("photo".into()),
            url:           None,
            media:         None,
            target:        None,
          }],
        },
      ],
    }]
  }

  #[test]
  fn resolves_parents_by_identifier() {
    let posts = graph();
    let index = FeedIndex::new(&posts);

    let album = &posts[0].attachments[1];
    let sub = &album.sub_attachments[0];

    assert_eq!(index.attachment_of(sub).map(|a| a.id), Some(album.id));
    assert_eq!(
      index.post_of(album).map(|p| p.graph_api_id.as_str()),
      Some("p1")
    );
  }

  #[test]
  fn unknown_identifiers_resolve_to_none() {
    let posts = graph();
    let index = FeedIndex::new(&posts);
    assert!(index.post("missing").is_none());
    assert!(index.attachment(Uuid::nil()).is_none());
  }
}
