//! Word-list views over a work or an author.
//!
//! The set of lists is closed: each variant names its owner kind and its
//! ordering, and every variant is served by the same fetch-owner, fetch-words,
//! optionally-drop-known procedure.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which entity a [`WordList`] is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOwner {
  Work,
  Author,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordList {
  /// Distinct words of one work, most frequent first.
  FrequencyByWork,
  /// Distinct words across all live works of one author, most frequent first.
  FrequencyByAuthor,
  /// Every occurrence of one work in reading order, with per-word counts.
  GlossaryByWork,
}

impl WordList {
  pub fn owner(self) -> ListOwner {
    match self {
      Self::FrequencyByWork | Self::GlossaryByWork => ListOwner::Work,
      Self::FrequencyByAuthor => ListOwner::Author,
    }
  }

  pub fn heading(self) -> &'static str {
    match self {
      Self::FrequencyByWork | Self::FrequencyByAuthor => "Frequency list",
      Self::GlossaryByWork => "Glossary",
    }
  }
}

/// One row of a word list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordInWork {
  pub word_id:     Uuid,
  pub lemma_rich:  String,
  pub translation: String,
  pub known:       bool,
  /// Occurrences of this word within the list's scope.
  pub count:       u32,
}

/// Drop every row the reader has already marked as known.
pub fn skip_known(words: Vec<WordInWork>) -> Vec<WordInWork> {
  words.into_iter().filter(|w| !w.known).collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn row(known: bool) -> WordInWork {
    WordInWork {
      word_id: Uuid::new_v4(),
      lemma_rich: "ămo, as, are".into(),
      translation: "to love".into(),
      known,
      count: 1,
    }
  }

  #[test]
  fn skip_known_preserves_order_of_unknown_rows() {
    let rows = vec![row(false), row(true), row(false)];
    let ids: Vec<_> = [&rows[0], &rows[2]].iter().map(|r| r.word_id).collect();
    let kept = skip_known(rows);
    assert_eq!(kept.iter().map(|r| r.word_id).collect::<Vec<_>>(), ids);
  }

  #[test]
  fn owners() {
    assert_eq!(WordList::FrequencyByAuthor.owner(), ListOwner::Author);
    assert_eq!(WordList::GlossaryByWork.owner(), ListOwner::Work);
    assert_eq!(WordList::GlossaryByWork.heading(), "Glossary");
  }
}
