//! Lexical entries ("words"), the deduplicated lemma/translation pairs shared by
//! every work that uses them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::identity;

/// A persisted lexical entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
  pub word_id:         Uuid,
  pub lemma_raw:       String,
  /// Citation form with quantities and inflection class, e.g. `ĕgō̆, mei, pron.`
  pub lemma_rich:      String,
  pub translation:     String,
  /// Frequency of the lemma in the LASLA reference corpus; 0 when unknown.
  pub lasla_frequency: i64,
  /// Set by the reader, never by the pipeline.
  pub known:           bool,
  pub created_at:      DateTime<Utc>,
  pub modified_at:     DateTime<Utc>,
  pub deleted_at:      Option<DateTime<Utc>>,
}

/// A lexical entry as produced by the text pipeline, before persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWord {
  pub word_id:         Uuid,
  pub lemma_raw:       String,
  pub lemma_rich:      String,
  pub translation:     String,
  pub lasla_frequency: i64,
  /// `None` leaves a stored `known` flag untouched on upsert; new rows
  /// default to `false`.
  pub known:           Option<bool>,
}

impl NewWord {
  /// Build an entry whose identity is derived from `lemma_rich` and
  /// `translation`.
  pub fn new(
    lemma_raw: impl Into<String>,
    lemma_rich: impl Into<String>,
    translation: impl Into<String>,
    lasla_frequency: i64,
  ) -> Self {
    let lemma_rich = lemma_rich.into();
    let translation = translation.into();
    Self {
      word_id: identity::word_id(&lemma_rich, &translation),
      lemma_raw: lemma_raw.into(),
      lemma_rich,
      translation,
      lasla_frequency,
      known: None,
    }
  }
}
