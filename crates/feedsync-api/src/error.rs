//! API error type, its problem-detail rendering, and the middleware that
//! stamps each problem with the request path.

use axum::{
  Json,
  extract::Request,
  http::{HeaderValue, StatusCode, header},
  middleware::Next,
  response::{IntoResponse, Response},
};
use feedsync_core::problem::ProblemDetail;
use thiserror::Error;

pub const PROBLEM_JSON: &str = "application/problem+json";

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Core(#[from] feedsync_core::Error),

  #[error(transparent)]
  Graph(#[from] feedsync_graph::Error),

  #[error("forbidden: {0}")]
  Forbidden(String),

  /// The request could not be decoded at all (malformed JSON, non-numeric
  /// query values).
  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// The problem detail sent to the client. Internal causes never appear in
  /// it.
  pub fn problem(&self) -> ProblemDetail {
    match self {
      ApiError::Core(e) => core_problem(e),
      ApiError::Graph(e) => match e {
        feedsync_graph::Error::Upstream { problem, .. }
        | feedsync_graph::Error::Unreachable { problem, .. } => problem.clone(),
        feedsync_graph::Error::Decode { .. } => mapping_failure(),
        feedsync_graph::Error::Core(core) => core_problem(core),
        feedsync_graph::Error::Client(_) => internal(),
      },
      ApiError::Forbidden(m) => ProblemDetail::new(403, "Forbidden").with_detail(m),
      ApiError::BadRequest(m) => {
        ProblemDetail::new(400, "Bad request").with_detail(m)
      }
      ApiError::Store(_) => internal(),
    }
  }
}

fn core_problem(e: &feedsync_core::Error) -> ProblemDetail {
  use feedsync_core::Error;
  match e {
    Error::PostNotFound(_) => {
      ProblemDetail::new(404, "Feed not found").with_detail(e.to_string())
    }
    Error::Validation(violations) => ProblemDetail::new(400, "Validation failed")
      .with_detail("Request validation failed.")
      .with_errors(violations.clone()),
    Error::InvalidTimestamp { .. } | Error::InvalidExpiry(_) => mapping_failure(),
  }
}

fn mapping_failure() -> ProblemDetail {
  ProblemDetail::new(500, "Feed mapping failure")
    .with_detail("The Graph API payload could not be mapped.")
}

fn internal() -> ProblemDetail {
  ProblemDetail::new(500, "Internal error")
    .with_detail("An unexpected error occurred.")
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let problem = self.problem();
    if problem.status >= 500 {
      tracing::error!(status = problem.status, error = %self, "request failed");
    } else {
      tracing::debug!(status = problem.status, error = %self, "request rejected");
    }
    let status = StatusCode::from_u16(problem.status)
      .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    problem_response(status, problem)
  }
}

/// Render `problem` as `application/problem+json`. The problem is also kept
/// in the response extensions for [`fill_problem_instance`].
pub fn problem_response(status: StatusCode, problem: ProblemDetail) -> Response {
  let mut res = (
    status,
    [(header::CONTENT_TYPE, HeaderValue::from_static(PROBLEM_JSON))],
    Json(&problem),
  )
    .into_response();
  res.extensions_mut().insert(problem);
  res
}

/// Middleware: set `instance` to the request path on problem responses that
/// lack one.
pub async fn fill_problem_instance(req: Request, next: Next) -> Response {
  let path = req.uri().path().to_owned();
  let mut res = next.run(req).await;

  match res.extensions_mut().remove::<ProblemDetail>() {
    Some(problem) if problem.instance.is_none() => {
      problem_response(res.status(), problem.with_instance(path))
    }
    Some(problem) => {
      res.extensions_mut().insert(problem);
      res
    }
    None => res,
  }
}

#[cfg(test)]
mod tests {
  use feedsync_core::{problem::GRAPH_API_PROBLEM_TYPE, validation::Violation};

  use super::*;

  #[test]
  fn not_found_echoes_id() {
    let problem = ApiError::from(feedsync_core::Error::PostNotFound("42_7".into())).problem();
    assert_eq!(problem.status, 404);
    assert!(problem.detail.unwrap().contains("42_7"));
  }

  #[test]
  fn validation_lists_violations() {
    let problem = ApiError::from(feedsync_core::Error::Validation(vec![Violation {
      field:   "size".into(),
      message: "must be between 1 and 100".into(),
    }]))
    .problem();
    assert_eq!(problem.status, 400);
    assert_eq!(problem.errors.len(), 1);
  }

  #[test]
  fn upstream_problem_is_passed_through() {
    let problem = ApiError::from(feedsync_graph::Error::Upstream {
      endpoint: "feed",
      status:   400,
      problem:  ProblemDetail::bad_gateway(),
    })
    .problem();
    assert_eq!(problem.status, 502);
    assert_eq!(problem.kind, GRAPH_API_PROBLEM_TYPE);
  }

  #[test]
  fn timestamp_failure_is_mapping_failure() {
    let err = feedsync_core::Error::InvalidTimestamp {
      value:  "x".into(),
      reason: "input contains invalid characters".into(),
    };
    let problem = ApiError::from(feedsync_graph::Error::from(err)).problem();
    assert_eq!(problem.status, 500);
    assert_eq!(problem.title, "Feed mapping failure");
    assert!(!problem.detail.unwrap().contains("invalid characters"));
  }

  #[test]
  fn expiry_failure_is_mapping_failure() {
    let err = feedsync_graph::Error::from(feedsync_core::Error::InvalidExpiry(i64::MAX));
    let problem = ApiError::from(err).problem();
    assert_eq!(problem.status, 500);
    assert_eq!(problem.title, "Feed mapping failure");
  }

  #[test]
  fn store_failure_hides_cause() {
    let err = ApiError::Store("disk I/O error".into());
    let problem = err.problem();
    assert_eq!(problem.status, 500);
    assert!(!problem.detail.unwrap().contains("disk"));
  }
}
