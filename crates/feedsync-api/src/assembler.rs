//! HAL views of posts.
//!
//! Every view carries navigation links. Admin callers additionally get a
//! HAL-FORMS `exchangeToken` template describing the token exchange action.

use std::collections::BTreeMap;

use axum::{
  Json,
  http::{HeaderValue, header},
  response::{IntoResponse, Response},
};
use chrono::{DateTime, FixedOffset};
use feedsync_core::{
  page::Page,
  post::{Attachment, Media, Post, SubAttachment, Target},
};
use serde::Serialize;
use uuid::Uuid;

use crate::{caller::Caller, tokens::ACCESS_TOKEN_MAX_LEN};

pub const HAL_JSON: &str = "application/hal+json";

pub const FEEDS_PATH: &str = "/api/feeds";
pub const ALL_FEEDS_PATH: &str = "/api/feeds/all";
pub const FETCH_NEW_PATH: &str = "/api/feeds/fetch-new";
pub const EXCHANGE_TOKEN_PATH: &str = "/api/token/exchange";

// ─── Response wrapper ────────────────────────────────────────────────────────

/// JSON body served as `application/hal+json`.
pub struct Hal<T>(pub T);

impl<T: Serialize> IntoResponse for Hal<T> {
  fn into_response(self) -> Response {
    (
      [(header::CONTENT_TYPE, HeaderValue::from_static(HAL_JSON))],
      Json(self.0),
    )
      .into_response()
  }
}

// ─── Links and templates ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
  pub href:      String,
  #[serde(skip_serializing_if = "std::ops::Not::not")]
  pub templated: bool,
}

impl Link {
  pub fn new(href: impl Into<String>) -> Self {
    Self { href: href.into(), templated: false }
  }

  pub fn templated(href: impl Into<String>) -> Self {
    Self { href: href.into(), templated: true }
  }
}

pub type Links = BTreeMap<&'static str, Link>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Templates {
  #[serde(rename = "exchangeToken")]
  pub exchange_token: Template,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
  pub method:       &'static str,
  pub target:       &'static str,
  pub content_type: &'static str,
  pub properties:   Vec<TemplateProperty>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateProperty {
  pub name:       &'static str,
  pub required:   bool,
  pub min_length: usize,
  pub max_length: usize,
}

impl Templates {
  fn exchange_token() -> Self {
    Self {
      exchange_token: Template {
        method:       "POST",
        target:       EXCHANGE_TOKEN_PATH,
        content_type: "application/json",
        properties:   vec![TemplateProperty {
          name:       "accessToken",
          required:   true,
          min_length: 1,
          max_length: ACCESS_TOKEN_MAX_LEN,
        }],
      },
    }
  }

  fn for_caller(caller: &Caller) -> Option<Self> {
    caller.is_admin().then(Self::exchange_token)
  }
}

// ─── Models ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedModel {
  pub graph_api_id: String,
  pub message:      Option<String>,
  pub created_time: DateTime<FixedOffset>,
  pub attachments:  Vec<AttachmentModel>,
  #[serde(rename = "_links")]
  pub links:        Links,
  #[serde(rename = "_templates", skip_serializing_if = "Option::is_none")]
  pub templates:    Option<Templates>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentModel {
  pub id:              Uuid,
  pub media_type:      Option<String>,
  #[serde(rename = "type")]
  pub kind:            Option<String>,
  pub media:           Option<Media>,
  pub sub_attachments: Vec<SubAttachmentModel>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubAttachmentModel {
  pub id:     Uuid,
  #[serde(rename = "type")]
  pub kind:   Option<String>,
  pub url:    Option<String>,
  pub media:  Option<Media>,
  pub target: Option<Target>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Embedded {
  pub feeds: Vec<FeedModel>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
  pub size:           usize,
  pub total_elements: usize,
  pub total_pages:    usize,
  pub number:         usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedCollectionModel {
  #[serde(rename = "_embedded")]
  pub embedded:  Embedded,
  #[serde(rename = "_links")]
  pub links:     Links,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub page:      Option<PageMetadata>,
  #[serde(rename = "_templates", skip_serializing_if = "Option::is_none")]
  pub templates: Option<Templates>,
}

// ─── Assembly ────────────────────────────────────────────────────────────────

fn feeds_link() -> Link { Link::templated(format!("{FEEDS_PATH}{{?page,size}}")) }

fn page_href(number: usize, size: usize) -> String {
  format!("{FEEDS_PATH}?page={number}&size={size}")
}

fn attachment(a: &Attachment) -> AttachmentModel {
  AttachmentModel {
    id:              a.id,
    media_type:      a.media_type.clone(),
    kind:            a.kind.clone(),
    media:           a.media.clone(),
    sub_attachments: a.sub_attachments.iter().map(sub_attachment).collect(),
  }
}

fn sub_attachment(s: &SubAttachment) -> SubAttachmentModel {
  SubAttachmentModel {
    id:     s.id,
    kind:   s.kind.clone(),
    url:    s.url.clone(),
    media:  s.media.clone(),
    target: s.target.clone(),
  }
}

fn model(post: &Post) -> FeedModel {
  let links = Links::from([
    ("self", Link::new(format!("{FEEDS_PATH}/{}", post.graph_api_id))),
    ("feeds", feeds_link()),
  ]);
  FeedModel {
    graph_api_id: post.graph_api_id.clone(),
    message: post.message.clone(),
    created_time: post.created_time,
    attachments: post.attachments.iter().map(attachment).collect(),
    links,
    templates: None,
  }
}

/// A single post.
pub fn item(post: &Post, caller: &Caller) -> FeedModel {
  FeedModel { templates: Templates::for_caller(caller), ..model(post) }
}

/// Every post, without paging metadata.
pub fn collection(posts: &[Post], caller: &Caller) -> FeedCollectionModel {
  FeedCollectionModel {
    embedded:  Embedded { feeds: posts.iter().map(model).collect() },
    links:     Links::from([
      ("self", Link::new(ALL_FEEDS_PATH)),
      ("feeds", feeds_link()),
    ]),
    page:      None,
    templates: Templates::for_caller(caller),
  }
}

/// One page, with paging metadata and `first`/`prev`/`next`/`last` links.
pub fn page(page: &Page<Post>, caller: &Caller) -> FeedCollectionModel {
  let mut links = Links::from([
    ("self", Link::new(page_href(page.number, page.size))),
    ("feeds", feeds_link()),
    ("all", Link::new(ALL_FEEDS_PATH)),
    ("first", Link::new(page_href(0, page.size))),
    ("last", Link::new(page_href(page.total_pages().saturating_sub(1), page.size))),
  ]);
  if page.has_previous() {
    // A page past the end points back at the last real page.
    let prev = page.number.saturating_sub(1).min(page.total_pages().saturating_sub(1));
    links.insert("prev", Link::new(page_href(prev, page.size)));
  }
  if page.has_next() {
    links.insert("next", Link::new(page_href(page.number + 1, page.size)));
  }

  FeedCollectionModel {
    embedded: Embedded { feeds: page.content.iter().map(model).collect() },
    links,
    page: Some(metadata(page)),
    templates: Templates::for_caller(caller),
  }
}

/// A freshly fetched feed returned as a single page.
pub fn refreshed(page: &Page<Post>, caller: &Caller) -> FeedCollectionModel {
  FeedCollectionModel {
    embedded:  Embedded { feeds: page.content.iter().map(model).collect() },
    links:     Links::from([
      ("self", Link::new(FETCH_NEW_PATH)),
      ("feeds", feeds_link()),
      ("all", Link::new(ALL_FEEDS_PATH)),
    ]),
    page:      Some(metadata(page)),
    templates: Templates::for_caller(caller),
  }
}

fn metadata<T>(page: &Page<T>) -> PageMetadata {
  PageMetadata {
    size:           page.size,
    total_elements: page.total,
    total_pages:    page.total_pages(),
    number:         page.number,
  }
}
