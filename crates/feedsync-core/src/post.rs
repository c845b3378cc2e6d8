//! The post graph — posts, their attachments and nested sub-attachments.
//!
//! Ownership flows strictly downward: a [`Post`] owns its attachments and an
//! [`Attachment`] owns its sub-attachments. Children name their parent by
//! identifier (`post_id`, `attachment_id`) rather than by reference, so the
//! graph stays acyclic while every child can still answer "who owns me".
//! Use [`FeedIndex`](crate::index::FeedIndex) to resolve those identifiers.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Identifier namespaces ───────────────────────────────────────────────────

const ATTACHMENT_NAMESPACE: Uuid =
  Uuid::from_u128(0x6c1e_0f4a_2b7d_5e93_a1c4_8d2f_3b6e_9a01);

const SUB_ATTACHMENT_NAMESPACE: Uuid =
  Uuid::from_u128(0x9f3b_27c8_4e1a_5d06_b8e2_71c9_04af_d352);

// ─── Value objects ───────────────────────────────────────────────────────────

/// Dimensions and location of a rendered image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
  pub height: u32,
  pub width:  u32,
  pub src:    Option<String>,
}

/// Media carried by an attachment: a source URL (videos) and/or an image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
  pub source: Option<String>,
  pub image:  Option<Image>,
}

/// The object a sub-attachment points at on the social platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
  pub id:  Option<String>,
  pub url: Option<String>,
}

// ─── Entities ────────────────────────────────────────────────────────────────

/// A single item of an album-style attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubAttachment {
  pub id:            Uuid,
  /// Identifier of the owning [`Attachment`].
  pub attachment_id: Uuid,
  pub kind:          Option<String>,
  pub url:           Option<String>,
  pub media:         Option<Media>,
  pub target:        Option<Target>,
}

impl SubAttachment {
  /// Stable identifier for the sub-attachment at `position` inside
  /// `attachment_id`.
  pub fn derive_id(attachment_id: Uuid, position: usize) -> Uuid {
    Uuid::new_v5(
      &SUB_ATTACHMENT_NAMESPACE,
      format!("{attachment_id}/{position}").as_bytes(),
    )
  }
}

/// Media or link item attached to a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
  pub id:              Uuid,
  /// Graph id of the owning [`Post`].
  pub post_id:         String,
  pub media_type:      Option<String>,
  pub kind:            Option<String>,
  pub media:           Option<Media>,
  pub sub_attachments: Vec<SubAttachment>,
}

impl Attachment {
  /// Stable identifier for the attachment at `position` inside the post
  /// `post_id`.
  pub fn derive_id(post_id: &str, position: usize) -> Uuid {
    Uuid::new_v5(
      &ATTACHMENT_NAMESPACE,
      format!("{post_id}/{position}").as_bytes(),
    )
  }
}

/// A post mirrored from the Graph API, keyed by its external graph id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
  pub graph_api_id: String,
  pub message:      Option<String>,
  pub created_time: DateTime<FixedOffset>,
  pub attachments:  Vec<Attachment>,
}

impl Post {
  /// `true` when every attachment names this post as its owner and every
  /// sub-attachment names its enclosing attachment.
  pub fn is_linked(&self) -> bool {
    self.attachments.iter().all(|a| {
      a.post_id == self.graph_api_id
        && a.sub_attachments.iter().all(|s| s.attachment_id == a.id)
    })
  }

  pub fn sub_attachment_count(&self) -> usize {
    self.attachments.iter().map(|a| a.sub_attachments.len()).sum()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn post() -> Post {
    let attachment_id = Attachment::derive_id("p1", 0);
    Post {
      graph_api_id: "p1".into(),
      message:      None,
      created_time: DateTime::parse_from_rfc3339("2024-01-15T10:30:00Z").unwrap(),
      attachments:  vec![Attachment {
        id:              attachment_id,
        post_id:         "p1".into(),
        media_type:      Some("album".into()),
        kind:            Some("album".into()),
        media:           None,
        sub_attachments: vec![SubAttachment {
          id:            SubAttachment::derive_id(attachment_id, 0),
          attachment_id,
          kind:          Some("photo".into()),
          url:           None,
          media:         None,
          target:        None,
        }],
      }],
    }
  }

  #[test]
  fn derived_ids_are_stable_and_position_sensitive() {
    assert_eq!(Attachment::derive_id("p1", 0), Attachment::derive_id("p1", 0));
    assert_ne!(Attachment::derive_id("p1", 0), Attachment::derive_id("p1", 1));
    assert_ne!(Attachment::derive_id("p1", 0), Attachment::derive_id("p2", 0));

    let a = Attachment::derive_id("p1", 0);
    assert_ne!(SubAttachment::derive_id(a, 0), SubAttachment::derive_id(a, 1));
  }

  #[test]
  fn linked_post_passes_integrity_check() {
    let p = post();
    assert!(p.is_linked());
    assert_eq!(p.sub_attachment_count(), 1);
  }

  #[test]
  fn foreign_back_reference_fails_integrity_check() {
    let mut p = post();
    p.attachments[0].post_id = "other".into();
    assert!(!p.is_linked());

    let mut p = post();
    p.attachments[0].sub_attachments[0].attachment_id = Uuid::nil();
    assert!(!p.is_linked());
  }
}
