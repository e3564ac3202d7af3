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
///
/// Every variant renders as `{"error": "..."}`. Store failures are logged and
/// reported to the caller with a generic message only.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found")]
  NotFound,

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("{context}: {source}")]
  Store {
    context: &'static str,
    #[source]
    source:  Box<dyn std::error::Error + Send + Sync>,
  },
}

impl ApiError {
  /// Adapter for `map_err` that wraps a store error under `context`, the
  /// message the caller will see.
  pub fn store<E>(context: &'static str) -> impl FnOnce(E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    move |e| Self::Store { context, source: Box::new(e) }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    Self::BadRequest(rejection.body_text())
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match self {
      ApiError::NotFound => (StatusCode::NOT_FOUND, "not found".to_owned()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
      ApiError::Store { context, source } => {
        tracing::error!(error = %source, "{context}");
        (StatusCode::INTERNAL_SERVER_ERROR, context.to_owned())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
