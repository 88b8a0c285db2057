//! Application error type shared by every operation.
//!
//! All failure classes from the handlers funnel into `AppError`, which renders
//! as the wire shape `{error, details}`. Not-found maps to 404, everything
//! else to 500. No error is retried.

use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use thiserror::Error;

use crate::protocol::ErrorOut;

#[derive(Debug, Error)]
pub enum AppError {
  /// No chat client was configured at startup (missing OPENAI_API_KEY).
  #[error("model API not configured (set OPENAI_API_KEY)")]
  ModelUnavailable,
  /// Upstream chat-completion call failed (network, auth, rate limit).
  #[error("model call failed: {0}")]
  Api(String),
  /// Completion content did not decode into the expected JSON shape.
  #[error("invalid model payload: {0}")]
  ModelPayload(String),
  /// A referenced document, or a step inside one, does not exist.
  #[error("{0} not found")]
  NotFound(String),
  /// Document store rejected a read or write.
  #[error("store error: {0}")]
  Store(String),
}

impl AppError {
  fn status(&self) -> StatusCode {
    match self {
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  /// Short caller-facing label; the variant message goes into `details`.
  fn public_label(&self) -> &'static str {
    match self {
      AppError::ModelUnavailable => "Model API not configured",
      AppError::Api(_) => "Upstream model call failed",
      AppError::ModelPayload(_) => "Model returned an unusable payload",
      AppError::NotFound(_) => "Not found",
      AppError::Store(_) => "Document store operation failed",
    }
  }
}

impl IntoResponse for AppError {
  fn into_response(self) -> Response {
    tracing::error!(target: "mathquest_backend", error = %self, "Request failed");
    let body = ErrorOut {
      error: self.public_label().to_string(),
      details: Some(self.to_string()),
    };
    (self.status(), Json(body)).into_response()
  }
}
