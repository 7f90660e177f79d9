//! API error taxonomy and its [`axum::response::IntoResponse`] translation.
//!
//! Every store and compiler outcome is folded into [`ApiError`] at the
//! orchestrator boundary; the `IntoResponse` impl is the single point where
//! the taxonomy becomes an HTTP response. No raw collaborator error crosses
//! into a response body.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use folio_core::store::StoreError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// The document failed a compiler rule, or the store rejected the composed
  /// event sequence as semantically invalid. Client fault; never retried.
  #[error("invalid request: {0}")]
  Validation(String),

  #[error("{0}")]
  NotFound(String),

  /// The store could not read or durably append. Retrying is the caller's
  /// decision, not this layer's.
  #[error("persistence failure")]
  Persistence(#[source] Box<dyn std::error::Error + Send + Sync>),

  /// An unclassified collaborator failure, logged where it was caught.
  /// Deliberately carries no detail.
  #[error("encountered an unhandled fault")]
  Unhandled,

  /// A required identity header is missing; rejected before the core runs.
  #[error("missing authenticated identity: {0}")]
  Unauthorized(String),
}

impl From<StoreError> for ApiError {
  /// Translate a store outcome into the response taxonomy.
  ///
  /// Unclassified faults are logged with their type and message here, before
  /// they collapse into the generic [`ApiError::Unhandled`] response.
  fn from(err: StoreError) -> Self {
    match err {
      StoreError::NoSuchSubmission(id) => {
        Self::NotFound(format!("no submission found with id {id}"))
      }
      StoreError::InvalidEvent(e) => Self::Validation(e.to_string()),
      StoreError::Persistence(e) => Self::Persistence(e),
      StoreError::Other(e) => {
        tracing::error!(fault = ?e, message = %e, "unhandled event store fault");
        Self::Unhandled
      }
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::Validation(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::Persistence(_) => (
        StatusCode::INTERNAL_SERVER_ERROR,
        "problem interacting with the event store".to_owned(),
      ),
      ApiError::Unhandled => (
        StatusCode::INTERNAL_SERVER_ERROR,
        "encountered an unhandled fault".to_owned(),
      ),
      ApiError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, m.clone()),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
