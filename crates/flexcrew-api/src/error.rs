//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  NotFound(String),

  #[error("{0}")]
  BadRequest(String),

  /// The request is well-formed but collides with the current state:
  /// a full schedule, an occupied schedule, or a lost concurrent update.
  #[error("{0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<flexcrew_core::Error> for ApiError {
  fn from(e: flexcrew_core::Error) -> Self {
    use flexcrew_core::Error as E;
    match e {
      E::NotFound { .. } | E::NoSchedulesAvailable => Self::NotFound(e.to_string()),
      E::InvalidInput(_) => Self::BadRequest(e.to_string()),
      E::CapacityExceeded { .. }
      | E::ScheduleOccupied { .. }
      | E::ConflictOnConcurrentUpdate(_) => Self::Conflict(e.to_string()),
      E::Store(inner) => Self::Store(inner),
    }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self { Self::BadRequest(rejection.body_text()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
