//! Error type for `feedsync-graph`.

use feedsync_core::problem::ProblemDetail;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The Graph API answered with a non-2xx status.
  #[error("graph api {endpoint} answered {status}")]
  Upstream {
    endpoint: &'static str,
    status:   u16,
    problem:  ProblemDetail,
  },

  /// The request never produced a response (connect failure, timeout). The
  /// transport cause is logged at the call site and not carried.
  #[error("graph api {endpoint} unreachable")]
  Unreachable {
    endpoint: &'static str,
    problem:  ProblemDetail,
  },

  #[error("graph api {endpoint} returned an unexpected payload: {source}")]
  Decode {
    endpoint: &'static str,
    #[source]
    source:   serde_json::Error,
  },

  #[error("core error: {0}")]
  Core(#[from] feedsync_core::Error),

  #[error("failed to build http client: {0}")]
  Client(#[source] reqwest::Error),
}

impl Error {
  /// The problem detail to surface for upstream failures, if this is one.
  pub fn problem(&self) -> Option<&ProblemDetail> {
    match self {
      Error::Upstream { problem, .. } | Error::Unreachable { problem, .. } => {
        Some(problem)
      }
      _ => None,
    }
  }

  /// Status reported by the Graph API, when it answered at all.
  pub fn upstream_status(&self) -> Option<u16> {
    match self {
      Error::Upstream { status, .. } => Some(*status),
      _ => None,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
