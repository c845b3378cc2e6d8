//! Wire types mirroring the Graph API JSON schema.
//!
//! Nested collections arrive wrapped in `{ "data": [...] }` containers that
//! may be absent, `null`, or hold a `null` list. All of those normalise to an
//! empty `Vec` here, so callers never see a missing container.

use serde::{Deserialize, Deserializer};

// ─── Feed ────────────────────────────────────────────────────────────────────

/// Root object of `GET /{page-id}/feed`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GraphApiResponse {
  #[serde(default)]
  pub data: Option<Vec<FeedDto>>,
}

/// A single post of the feed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FeedDto {
  pub id:           String,
  /// `yyyy-MM-dd'T'HH:mm:ssZ`, parsed by the mapper.
  pub created_time: String,
  #[serde(default)]
  pub message:      Option<String>,
  #[serde(default, deserialize_with = "container")]
  pub attachments:  Vec<AttachmentDto>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AttachmentDto {
  #[serde(default)]
  pub media_type:      Option<String>,
  #[serde(default, rename = "type")]
  pub kind:            Option<String>,
  #[serde(default)]
  pub media:           Option<MediaDto>,
  #[serde(default, rename = "subattachments", deserialize_with = "container")]
  pub sub_attachments: Vec<SubAttachmentDto>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SubAttachmentDto {
  #[serde(default)]
  pub media:  Option<MediaDto>,
  #[serde(default)]
  pub target: Option<TargetDto>,
  #[serde(default, rename = "type")]
  pub kind:   Option<String>,
  #[serde(default)]
  pub url:    Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MediaDto {
  #[serde(default)]
  pub image:  Option<ImageDto>,
  #[serde(default)]
  pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImageDto {
  #[serde(default)]
  pub height: u32,
  #[serde(default)]
  pub src:    Option<String>,
  #[serde(default)]
  pub width:  u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TargetDto {
  #[serde(default)]
  pub id:  Option<String>,
  #[serde(default)]
  pub url: Option<String>,
}

// ─── Token exchange ──────────────────────────────────────────────────────────

/// Body of `GET /oauth/access_token`.
#[derive(Clone, PartialEq, Deserialize)]
pub struct AccessTokenDto {
  pub access_token: String,
  #[serde(default = "default_token_type")]
  pub token_type:   String,
  /// Lifetime in seconds.
  #[serde(default)]
  pub expires_in:   i64,
}

fn default_token_type() -> String { "bearer".to_owned() }

impl std::fmt::Debug for AccessTokenDto {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("AccessTokenDto")
      .field("access_token", &"<redacted>")
      .field("token_type", &self.token_type)
      .field("expires_in", &self.expires_in)
      .finish()
  }
}

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Error envelope the Graph API returns with non-2xx statuses. Only used for
/// logging.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphErrorEnvelope {
  #[serde(default)]
  pub error: GraphErrorBody,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphErrorBody {
  #[serde(default)]
  pub message:       String,
  #[serde(default, rename = "type")]
  pub kind:          String,
  #[serde(default)]
  pub code:          i64,
  #[serde(default)]
  pub error_subcode: Option<i64>,
  #[serde(default)]
  pub fbtrace_id:    Option<String>,
}

// ─── Container normalisation ─────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct Container<T> {
  #[serde(default)]
  data: Option<Vec<T>>,
}

/// `{ "data": [...] }`, `{ "data": null }`, `{}` and `null` → `Vec<T>`.
fn container<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  let wrapped: Option<Container<T>> = Option::deserialize(deserializer)?;
  Ok(wrapped.and_then(|c| c.data).unwrap_or_default())
}
