//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::multipart::MultipartError,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by a handler.
#[derive(Debug, Error)]
pub enum Error {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("analyser error: {0}")]
  Analyser(#[source] vocab_collatinus::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Store(Box::new(e))
  }
}

impl From<vocab_collatinus::Error> for Error {
  fn from(e: vocab_collatinus::Error) -> Self {
    if e.is_input_error() {
      Self::BadRequest(e.to_string())
    } else {
      Self::Analyser(e)
    }
  }
}

impl From<vocab_core::Error> for Error {
  fn from(e: vocab_core::Error) -> Self { Self::BadRequest(e.to_string()) }
}

impl From<MultipartError> for Error {
  fn from(e: MultipartError) -> Self { Self::BadRequest(e.body_text()) }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      Error::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      Error::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      Error::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      Error::Analyser(e) => {
        tracing::error!(error = %e, "analyser failed");
        (StatusCode::BAD_GATEWAY, e.to_string())
      }
      Error::Store(e) => {
        tracing::error!(error = %e, "store operation failed");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          "failed to save or read the corpus; please retry".to_owned(),
        )
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
