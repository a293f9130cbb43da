//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use stargate_core::{Classify, FailureKind};
use thiserror::Error;

/// An error returned by an API handler, already classified for the caller.
#[derive(Debug, Error)]
#[error("{source}")]
pub struct ApiError {
  pub kind: FailureKind,
  #[source]
  source:   Box<dyn std::error::Error + Send + Sync>,
}

impl ApiError {
  /// Wrap any store or core error.
  pub fn failure<E>(e: E) -> Self
  where
    E: std::error::Error + Classify + Send + Sync + 'static,
  {
    Self { kind: e.failure_kind(), source: Box::new(e) }
  }
}

impl From<stargate_core::Error> for ApiError {
  fn from(e: stargate_core::Error) -> Self { Self::failure(e) }
}

pub fn status_for(kind: FailureKind) -> StatusCode {
  match kind {
    FailureKind::PersonNotFound | FailureKind::DutyNotFound => {
      StatusCode::NOT_FOUND
    }
    FailureKind::InvalidInput
    | FailureKind::EnrollmentRequiresSpaceman
    | FailureKind::CareerEnded => StatusCode::BAD_REQUEST,
    FailureKind::DuplicateDuty
    | FailureKind::PersonNameTaken
    | FailureKind::ConcurrencyConflict => StatusCode::CONFLICT,
    FailureKind::StorageUnavailable => StatusCode::SERVICE_UNAVAILABLE,
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let message = match self.kind {
      // Storage detail stays in the log.
      FailureKind::StorageUnavailable => {
        tracing::error!(error = %self.source, "storage failure");
        "storage is temporarily unavailable; retry the request".to_owned()
      }
      _ => self.source.to_string(),
    };
    let body = json!({
      "error":     message,
      "kind":      self.kind,
      "retryable": self.kind.is_retryable(),
    });
    (status_for(self.kind), Json(body)).into_response()
  }
}
