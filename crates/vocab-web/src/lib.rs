//! JSON HTTP API for vocabularium.
//!
//! Exposes an axum [`Router`] that lemmatises uploaded Latin texts through a
//! [`TextProcessor`] and stores the result in any [`CorpusStore`].

pub mod error;
pub mod handlers;

pub use error::{Error, Result};

use std::{path::PathBuf, sync::Arc, time::Duration};

use axum::{
  Router,
  extract::DefaultBodyLimit,
  routing::{get, post},
};
use serde::Deserialize;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use vocab_collatinus::{Analyser, Language, TextProcessor, analyser};
use vocab_core::store::CorpusStore;

use handlers::{upload, words, works};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `VOCAB_*` environment variables. Every key has a default.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:                  String,
  pub port:                  u16,
  pub store_path:            PathBuf,
  pub analyser_path:         PathBuf,
  /// Two-letter translation language code.
  pub language:              String,
  pub analyser_timeout_secs: u64,
  pub max_upload_bytes:      usize,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:                  "0.0.0.0".to_owned(),
      port:                  4321,
      store_path:            PathBuf::from("vocabularium.db"),
      analyser_path:         PathBuf::from(analyser::DEFAULT_EXECUTABLE),
      language:              Language::default().code().to_owned(),
      analyser_timeout_secs: analyser::DEFAULT_TIMEOUT.as_secs(),
      max_upload_bytes:      16 * 1024 * 1024,
    }
  }
}

impl ServerConfig {
  /// Build the analyser this configuration describes.
  pub fn analyser(&self) -> Result<Analyser, vocab_collatinus::Error> {
    let language: Language = self.language.parse()?;
    Ok(
      Analyser::new(&self.analyser_path, language)
        .with_timeout(Duration::from_secs(self.analyser_timeout_secs)),
    )
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: CorpusStore> {
  pub store:     Arc<S>,
  pub processor: Arc<TextProcessor>,
  pub config:    Arc<ServerConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the vocabularium server.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: CorpusStore + Clone + 'static,
{
  let body_limit = state.config.max_upload_bytes;

  Router::new()
    .route("/healthz", get(healthz))
    // Uploads
    .route("/lemmatise", post(upload::lemmatise::<S>))
    // Works
    .route("/works", get(works::list::<S>))
    .route("/works/{id}/delete", post(works::delete::<S>))
    // Word lists
    .route("/frequency-list/{id}/{skip_known}", get(words::frequency_by_work::<S>))
    .route(
      "/frequency-list-author/{id}/{skip_known}",
      get(words::frequency_by_author::<S>),
    )
    .route("/glossary/{id}/{skip_known}", get(words::glossary_by_work::<S>))
    .route("/toggle-known-status/{id}", post(words::toggle_known::<S>))
    .with_state(state)
    .layer(DefaultBodyLimit::disable())
    .layer(RequestBodyLimitLayer::new(body_limit))
    .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str { "ok" }

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(all(test, unix))]
mod tests;
