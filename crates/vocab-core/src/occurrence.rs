//! Occurrences ("work words"): one token at one position in one work.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkWord {
  /// Fresh on every insert; not content-derived.
  pub work_word_id:   Uuid,
  pub work_id:        Uuid,
  pub word_id:        Uuid,
  pub word_index:     u32,
  pub sentence_index: u32,
  pub original_form:  String,
  pub tag:            String,
  pub morph_analysis: String,
  pub created_at:     DateTime<Utc>,
  pub modified_at:    DateTime<Utc>,
  pub deleted_at:     Option<DateTime<Utc>>,
}

/// An occurrence as produced by the text pipeline.
///
/// `word_index` and `sentence_index` are assigned in source order by the
/// mapper and are never renumbered afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewWorkWord {
  /// `None` when the analyser had no lexical entry for the token. Such
  /// occurrences are counted but never persisted.
  pub word_id:        Option<Uuid>,
  pub word_index:     u32,
  pub sentence_index: u32,
  pub original_form:  String,
  pub tag:            String,
  pub morph_analysis: String,
}

impl NewWorkWord {
  pub fn is_persistable(&self) -> bool {
    self.word_id.is_some_and(|id| !id.is_nil())
  }
}
