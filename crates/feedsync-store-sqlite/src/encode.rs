//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings. Embedded value objects (media, target)
//! are compact JSON. UUIDs are hyphenated lowercase strings.

use chrono::{DateTime, FixedOffset, Utc};
use feedsync_core::{
  post::{Attachment, Media, Post, SubAttachment, Target},
  token::AccessToken,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn decode_created_time(s: &str) -> Result<DateTime<FixedOffset>> {
  DateTime::parse_from_rfc3339(s).map_err(|e| Error::DateParse(e.to_string()))
}

pub fn decode_utc(s: &str) -> Result<DateTime<Utc>> {
  decode_created_time(s).map(|dt| dt.with_timezone(&Utc))
}

fn encode_json<T: serde::Serialize>(value: Option<&T>) -> Result<Option<String>> {
  Ok(value.map(serde_json::to_string).transpose()?)
}

fn decode_media(s: Option<&str>) -> Result<Option<Media>> {
  Ok(s.map(serde_json::from_str).transpose()?)
}

fn decode_target(s: Option<&str>) -> Result<Option<Target>> {
  Ok(s.map(serde_json::from_str).transpose()?)
}

// ─── Raw rows ────────────────────────────────────────────────────────────────

/// A `posts` row together with its attachment rows.
pub struct RawPost {
  pub graph_api_id: String,
  pub message:      Option<String>,
  pub created_time: String,
  pub attachments:  Vec<RawAttachment>,
}

pub struct RawAttachment {
  pub attachment_id:   String,
  pub post_id:         String,
  pub position:        i64,
  pub media_type:      Option<String>,
  pub kind:            Option<String>,
  pub media_json:      Option<String>,
  pub sub_attachments: Vec<RawSubAttachment>,
}

pub struct RawSubAttachment {
  pub sub_attachment_id: String,
  pub attachment_id:     String,
  pub position:          i64,
  pub kind:              Option<String>,
  pub url:               Option<String>,
  pub media_json:        Option<String>,
  pub target_json:       Option<String>,
}

pub struct RawToken {
  pub access_token: String,
  pub token_type:   String,
  pub expires_at:   String,
}

// ─── Post graph ──────────────────────────────────────────────────────────────

impl RawPost {
  pub fn encode(post: &Post) -> Result<Self> {
    let attachments = post
      .attachments
      .iter()
      .enumerate()
      .map(|(position, a)| RawAttachment::encode(a, &post.graph_api_id, position))
      .collect::<Result<Vec<_>>>()?;

    Ok(Self {
      graph_api_id: post.graph_api_id.clone(),
      message: post.message.clone(),
      created_time: post.created_time.to_rfc3339(),
      attachments,
    })
  }

  pub fn into_post(self) -> Result<Post> {
    Ok(Post {
      graph_api_id: self.graph_api_id,
      message:      self.message,
      created_time: decode_created_time(&self.created_time)?,
      attachments:  self
        .attachments
        .into_iter()
        .map(RawAttachment::into_attachment)
        .collect::<Result<_>>()?,
    })
  }
}

impl RawAttachment {
  /// Rows are keyed on the enclosing post and attachment, whatever the
  /// entities' own parent fields say.
  fn encode(attachment: &Attachment, post_id: &str, position: usize) -> Result<Self> {
    let attachment_id = encode_uuid(attachment.id);
    let sub_attachments = attachment
      .sub_attachments
      .iter()
      .enumerate()
      .map(|(position, s)| RawSubAttachment::encode(s, &attachment_id, position))
      .collect::<Result<Vec<_>>>()?;

    Ok(Self {
      post_id: post_id.to_owned(),
      position: position as i64,
      media_type: attachment.media_type.clone(),
      kind: attachment.kind.clone(),
      media_json: encode_json(attachment.media.as_ref())?,
      attachment_id,
      sub_attachments,
    })
  }

  fn into_attachment(self) -> Result<Attachment> {
    Ok(Attachment {
      id:              decode_uuid(&self.attachment_id)?,
      post_id:         self.post_id,
      media_type:      self.media_type,
      kind:            self.kind,
      media:           decode_media(self.media_json.as_deref())?,
      sub_attachments: self
        .sub_attachments
        .into_iter()
        .map(RawSubAttachment::into_sub_attachment)
        .collect::<Result<_>>()?,
    })
  }
}

impl RawSubAttachment {
  fn encode(sub: &SubAttachment, attachment_id: &str, position: usize) -> Result<Self> {
    Ok(Self {
      sub_attachment_id: encode_uuid(sub.id),
      attachment_id:     attachment_id.to_owned(),
      position:          position as i64,
      kind:              sub.kind.clone(),
      url:               sub.url.clone(),
      media_json:        encode_json(sub.media.as_ref())?,
      target_json:       encode_json(sub.target.as_ref())?,
    })
  }

  fn into_sub_attachment(self) -> Result<SubAttachment> {
    Ok(SubAttachment {
      id:            decode_uuid(&self.sub_attachment_id)?,
      attachment_id: decode_uuid(&self.attachment_id)?,
      kind:          self.kind,
      url:           self.url,
      media:         decode_media(self.media_json.as_deref())?,
      target:        decode_target(self.target_json.as_deref())?,
    })
  }
}

// ─── Token ───────────────────────────────────────────────────────────────────

impl RawToken {
  pub fn encode(token: &AccessToken) -> Self {
    Self {
      access_token: token.access_token.clone(),
      token_type:   token.token_type.clone(),
      expires_at:   token.expires_at.to_rfc3339(),
    }
  }

  pub fn into_token(self) -> Result<AccessToken> {
    Ok(AccessToken {
      access_token: self.access_token,
      token_type:   self.token_type,
      expires_at:   decode_utc(&self.expires_at)?,
    })
  }
}
