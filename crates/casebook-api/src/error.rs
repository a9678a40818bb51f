//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use casebook_core::{Error as CoreError, Record, store::StoreError};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub fn missing(record: Record) -> Self {
    Self::NotFound(format!("{record} not found"))
  }

  /// Classify a backend error by the domain error it wraps, if any.
  pub fn from_store<E: StoreError>(err: E) -> Self {
    if let Some(domain) = err.as_domain() {
      let message = domain.to_string();
      match domain {
        CoreError::NotFound(_) => return Self::NotFound(message),
        CoreError::PartyInUse { .. } => return Self::Conflict(message),
        e if e.is_construction() => return Self::BadRequest(message),
        _ => {}
      }
    }
    Self::Store(Box::new(err))
  }
}

impl From<CoreError> for ApiError {
  fn from(err: CoreError) -> Self { Self::from_store(err) }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    Self::BadRequest(rejection.body_text())
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
