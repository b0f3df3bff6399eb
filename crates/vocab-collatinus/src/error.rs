//! Error types for the Collatinus text pipeline.
//!
//! Line-level problems in analyser output are not errors; see
//! [`crate::mapper::Diagnostic`].

use std::time::Duration;

use thiserror::Error;

use crate::language::Language;

#[derive(Debug, Error)]
pub enum Error {
  #[error(
    "sentence {sentence} is {length} characters long; the maximum supported \
     sentence length is {max} characters, longer sentences must be broken up \
     by a full stop"
  )]
  ChunkTooLong {
    sentence: usize,
    length:   usize,
    max:      usize,
  },

  #[error(
    "unsupported language {0:?}; must be one of \"ca\", \"de\", \"en\", \
     \"es\", \"eu\", \"fr\", \"gl\", \"it\", \"nl\" or \"pt\""
  )]
  UnsupportedLanguage(String),

  #[error("failed to set analyser language to {language}: {reason}")]
  LanguageConfigurationFailed { language: Language, reason: String },

  #[error("failed to lemmatise chunk {chunk}: {source}")]
  LemmatisationFailed {
    chunk:  usize,
    #[source]
    source: std::io::Error,
  },

  #[error("analyser did not finish chunk {chunk} within {after:?}")]
  AnalyserTimedOut { chunk: usize, after: Duration },
}

impl Error {
  /// Whether the caller can fix this by changing the submitted text.
  pub fn is_input_error(&self) -> bool { matches!(self, Self::ChunkTooLong { .. }) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
