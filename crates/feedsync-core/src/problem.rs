//! Problem-detail payload (RFC 9457) shared by the API boundary and the
//! Graph API client.

use serde::{Deserialize, Serialize};

use crate::validation::Violation;

/// Documentation root used as the `type` of upstream Graph API failures.
pub const GRAPH_API_PROBLEM_TYPE: &str =
  "https://developers.facebook.com/docs/graph-api/";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemDetail {
  #[serde(rename = "type")]
  pub kind:     String,
  pub title:    String,
  pub status:   u16,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub detail:   Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub instance: Option<String>,
  /// Field-level violations; only present on validation failures.
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub errors:   Vec<Violation>,
}

impl ProblemDetail {
  pub fn new(status: u16, title: impl Into<String>) -> Self {
    Self {
      kind:     "about:blank".to_owned(),
      title:    title.into(),
      status,
      detail:   None,
      instance: None,
      errors:   Vec::new(),
    }
  }

  /// The fixed problem reported whenever the Graph API call fails. The
  /// upstream cause is never carried.
  pub fn bad_gateway() -> Self {
    Self::new(502, "Facebook Graph API error")
      .with_type(GRAPH_API_PROBLEM_TYPE)
      .with_detail("Unknown error while calling the Facebook/Instagram API.")
  }

  pub fn with_type(mut self, kind: impl Into<String>) -> Self {
    self.kind = kind.into();
    self
  }

  pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
    self.detail = Some(detail.into());
    self
  }

  pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
    self.instance = Some(instance.into());
    self
  }

  pub fn with_errors(mut self, errors: Vec<Violation>) -> Self {
    self.errors = errors;
    self
  }
}
