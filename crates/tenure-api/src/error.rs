//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("bad request: {0}")]
  BadRequest(String),

  #[error(transparent)]
  Domain(#[from] tenure_core::Error),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, retryable, message) = match &self {
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, false, m.clone()),
      ApiError::Domain(err) => (status_for(err), err.is_retryable(), err.to_string()),
    };

    if status == StatusCode::INTERNAL_SERVER_ERROR {
      tracing::error!(error = %message, "ledger operation failed");
    }

    (status, Json(json!({ "error": message, "retryable": retryable }))).into_response()
  }
}

/// Conflicts are 409, validation failures 400, missing records 404.
/// `ConcurrentConflict` shares 409 but is the only kind marked retryable.
fn status_for(err: &tenure_core::Error) -> StatusCode {
  use tenure_core::Error as E;

  match err {
    E::ResourceBusy { .. }
    | E::DuplicateAssignment { .. }
    | E::ResearcherAlreadySupervising { .. }
    | E::StudentAlreadySupervised { .. }
    | E::SupervisionAlreadyRecorded { .. }
    | E::ConcurrentConflict => StatusCode::CONFLICT,

    E::InvalidInterval { .. } | E::EmptyTheme | E::ThemeTooLong { .. } => {
      StatusCode::BAD_REQUEST
    }

    E::AssignmentNotFound { .. }
    | E::SupervisionNotFound { .. }
    | E::UnknownHolder(_)
    | E::UnknownResource(_) => StatusCode::NOT_FOUND,

    E::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
  }
}
