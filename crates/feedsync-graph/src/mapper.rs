//! Wire tree → entity graph.
//!
//! Mapping happens in two passes. The first copies fields, leaving every
//! identifier blank. The second, [`link_back_references`], walks each post
//! and assigns attachment and sub-attachment identifiers together with the
//! parent identifiers that point back up the tree.

use chrono::{DateTime, Utc};
use feedsync_core::{
  post::{Attachment, Image, Media, Post, SubAttachment, Target},
  time::parse_created_time,
  token::AccessToken,
};
use uuid::Uuid;

use crate::{
  Result,
  dto::{
    AccessTokenDto, AttachmentDto, FeedDto, GraphApiResponse, ImageDto,
    MediaDto, SubAttachmentDto, TargetDto,
  },
};

/// Map a whole feed response. A missing `data` list yields no posts.
pub fn map_feed(response: GraphApiResponse) -> Result<Vec<Post>> {
  response
    .data
    .unwrap_or_default()
    .into_iter()
    .map(map_post)
    .collect()
}

/// Map one post and link its attachment tree.
///
/// Fails when `created_time` does not parse.
pub fn map_post(dto: FeedDto) -> Result<Post> {
  let created_time = parse_created_time(&dto.created_time)?;
  let mut post = Post {
    graph_api_id: dto.id,
    message: dto.message,
    created_time,
    attachments: dto.attachments.into_iter().map(map_attachment).collect(),
  };
  link_back_references(&mut post);
  Ok(post)
}

/// Assign every child its identifier and its parent's identifier.
///
/// Identifiers derive from the post id and each child's position, so
/// mapping the same payload twice yields identical graphs.
pub fn link_back_references(post: &mut Post) {
  for (position, attachment) in post.attachments.iter_mut().enumerate() {
    attachment.id = Attachment::derive_id(&post.graph_api_id, position);
    attachment.post_id.clone_from(&post.graph_api_id);
    for (sub_position, sub) in attachment.sub_attachments.iter_mut().enumerate() {
      sub.id = SubAttachment::derive_id(attachment.id, sub_position);
      sub.attachment_id = attachment.id;
    }
  }
}

/// Turn an exchange response into the token to persist, expiring
/// `expires_in` seconds after `now`.
pub fn map_access_token(
  dto: AccessTokenDto,
  now: DateTime<Utc>,
) -> Result<AccessToken> {
  Ok(AccessToken::issued(
    dto.access_token,
    dto.token_type,
    dto.expires_in,
    now,
  )?)
}

// ─── Field copies ────────────────────────────────────────────────────────────

fn map_attachment(dto: AttachmentDto) -> Attachment {
  Attachment {
    id:              Uuid::nil(),
    post_id:         String::new(),
    media_type:      dto.media_type,
    kind:            dto.kind,
    media:           dto.media.map(map_media),
    sub_attachments: dto
      .sub_attachments
      .into_iter()
      .map(map_sub_attachment)
      .collect(),
  }
}

fn map_sub_attachment(dto: SubAttachmentDto) -> SubAttachment {
  SubAttachment {
    id:            Uuid::nil(),
    attachment_id: Uuid::nil(),
    kind:          dto.kind,
    url:           dto.url,
    media:         dto.media.map(map_media),
    target:        dto.target.map(map_target),
  }
}

fn map_media(dto: MediaDto) -> Media {
  Media { source: dto.source, image: dto.image.map(map_image) }
}

fn map_image(dto: ImageDto) -> Image {
  Image { height: dto.height, width: dto.width, src: dto.src }
}

fn map_target(dto: TargetDto) -> Target { Target { id: dto.id, url: dto.url } }
