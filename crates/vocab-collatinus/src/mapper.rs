//! Parsing of analyser output into occurrences and lexical entries.
//!
//! The analyser prints one tab-separated line per token:
//!
//! | Column | Content |
//! |--------|---------|
//! | 0, 1   | ordinals (unused) |
//! | 2      | position of the token within its sentence |
//! | 3      | surface form |
//! | 4      | morphological tag |
//! | 5      | lemma, plain |
//! | 6      | lemma, rich citation form |
//! | 7      | LASLA frequency (may be empty) |
//! | 8      | translation, or `unknown` |
//! | 9      | full morpho-syntactic analysis |
//!
//! Mapping never fails. A line that cannot be used is dropped and recorded as
//! a [`Diagnostic`]; every non-blank line still consumes a token number so
//! diagnostics line up with the raw output.

use std::{collections::BTreeMap, fmt};

use uuid::Uuid;
use vocab_core::{
  occurrence::NewWorkWord,
  store::WorkUpload,
  word::NewWord,
  work::NewWork,
};

/// Number of columns in a well-formed analyser line.
pub const COLUMNS: usize = 10;

/// Marker the analyser prints when it has no translation for a token.
pub const UNKNOWN: &str = "unknown";

const POSITION: usize = 2;
const SURFACE: usize = 3;
const TAG: usize = 4;
const LEMMA_RAW: usize = 5;
const LEMMA_RICH: usize = 6;
const FREQUENCY: usize = 7;
const TRANSLATION: usize = 8;
const ANALYSIS: usize = 9;

// ─── Diagnostics ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
  /// The analyser could not translate the token. An occurrence without a
  /// lexical entry is still emitted.
  TranslationUnknown,
  MalformedLine { columns: usize },
  InvalidPosition(String),
  InvalidFrequency(String),
}

/// A non-fatal problem with one analyser line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
  /// 1-based number of the non-blank line the problem was found on.
  pub token:   u32,
  pub kind:    DiagnosticKind,
  pub columns: Vec<String>,
}

impl fmt::Display for Diagnostic {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "SKIPPED word #{}: ", self.token)?;
    match &self.kind {
      DiagnosticKind::TranslationUnknown => {
        write!(f, "translation unknown: {:?}", self.columns)
      }
      DiagnosticKind::MalformedLine { columns } => write!(
        f,
        "malformed line ({columns} columns, expected {COLUMNS}): {:?}",
        self.columns
      ),
      DiagnosticKind::InvalidPosition(value) => {
        write!(f, "word index in sentence is not an integer: {value:?}")
      }
      DiagnosticKind::InvalidFrequency(value) => {
        write!(f, "frequency in LASLA is not an integer: {value:?}")
      }
    }
  }
}

// ─── Output ──────────────────────────────────────────────────────────────────

/// Result of mapping one run of analyser output.
#[derive(Debug, Clone, Default)]
pub struct Mapped {
  /// Occurrences in source order, including ones without a lexical entry.
  pub occurrences: Vec<NewWorkWord>,
  /// Distinct lexical entries keyed by content-derived identity.
  pub words:       BTreeMap<Uuid, NewWord>,
  pub diagnostics: Vec<Diagnostic>,
}

impl Mapped {
  /// Occurrences that reference a lexical entry and can be persisted.
  pub fn persistable(&self) -> usize {
    self.occurrences.iter().filter(|o| o.is_persistable()).count()
  }

  /// Pair the mapped records with their work, splitting off the diagnostics.
  pub fn into_upload(self, work: NewWork) -> (WorkUpload, Vec<Diagnostic>) {
    let upload = WorkUpload {
      work,
      words: self.words,
      occurrences: self.occurrences,
    };
    (upload, self.diagnostics)
  }
}

/// Map newline-delimited analyser output.
pub fn map_output(text: &str) -> Mapped { map_lines(text.lines()) }

/// Map a stream of analyser output lines.
pub fn map_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Mapped {
  let mut mapper = Mapper::default();
  for line in lines {
    mapper.line(line);
  }
  mapper.out
}

// ─── Mapper state ────────────────────────────────────────────────────────────

struct Mapper {
  token:             u32,
  sentence:          u32,
  previous_position: i64,
  out:               Mapped,
}

impl Default for Mapper {
  fn default() -> Self {
    Self {
      token:             0,
      sentence:          1,
      previous_position: 0,
      out:               Mapped::default(),
    }
  }
}

impl Mapper {
  fn line(&mut self, line: &str) {
    if line.trim().is_empty() {
      return;
    }
    self.token += 1;

    let cols: Vec<&str> = line.split('\t').collect();

    if cols.iter().any(|c| c.trim() == UNKNOWN) {
      self.unknown(&cols);
      return;
    }

    if cols.len() != COLUMNS {
      self.skip(DiagnosticKind::MalformedLine { columns: cols.len() }, &cols);
      return;
    }

    let Ok(position) = cols[POSITION].trim().parse::<i64>() else {
      let value = cols[POSITION].to_owned();
      self.skip(DiagnosticKind::InvalidPosition(value), &cols);
      return;
    };
    let sentence = self.advance_sentence(position);

    let lasla_frequency = match cols[FREQUENCY].trim() {
      "" => 0,
      raw => match raw.parse::<i64>() {
        Ok(frequency) => frequency,
        Err(_) => {
          let value = cols[FREQUENCY].to_owned();
          self.skip(DiagnosticKind::InvalidFrequency(value), &cols);
          return;
        }
      },
    };

    let word = NewWord::new(
      cols[LEMMA_RAW].trim(),
      cols[LEMMA_RICH].trim(),
      cols[TRANSLATION].trim(),
      lasla_frequency,
    );
    let word_id = word.word_id;
    self.out.words.entry(word_id).or_insert(word);

    self.out.occurrences.push(NewWorkWord {
      word_id: Some(word_id),
      word_index: self.token,
      sentence_index: sentence,
      original_form: cols[SURFACE].trim().to_owned(),
      tag: cols[TAG].trim().to_owned(),
      morph_analysis: cols[ANALYSIS].trim().to_owned(),
    });
  }

  /// A sentence-local position that does not increase starts a new sentence.
  fn advance_sentence(&mut self, position: i64) -> u32 {
    if position <= self.previous_position {
      self.sentence += 1;
    }
    self.previous_position = position;
    self.sentence
  }

  fn unknown(&mut self, cols: &[&str]) {
    self.diagnose(DiagnosticKind::TranslationUnknown, cols);

    if let Some(position) = cols
      .get(POSITION)
      .and_then(|c| c.trim().parse::<i64>().ok())
    {
      self.advance_sentence(position);
    }

    self.out.occurrences.push(NewWorkWord {
      word_id: None,
      word_index: self.token,
      sentence_index: self.sentence,
      original_form: cols
        .get(SURFACE)
        .map(|c| c.trim().to_owned())
        .unwrap_or_default(),
      ..Default::default()
    });
  }

  fn skip(&mut self, kind: DiagnosticKind, cols: &[&str]) {
    self.diagnose(kind, cols);
  }

  fn diagnose(&mut self, kind: DiagnosticKind, cols: &[&str]) {
    self.out.diagnostics.push(Diagnostic {
      token: self.token,
      kind,
      columns: cols.iter().map(|c| (*c).to_owned()).collect(),
    });
  }
}

#[cfg(test)]
mod tests {
  use vocab_core::identity::word_id;

  use super::*;

  const PEDICABO: &str = "1\t1\t1\tPedicabo\tv1 \tpedico\tpēdīco, as, are\t4\tto \
                          perform anal intercourse; to commit sodomy with;\t\
                          pēdīcābō̆ future indicative active 1st singular";
  const EGO: &str = "2\t1\t2\tego\tp11\tego\tĕgō̆, mei, pron.\t14846\tmoi, \
                     me\tĕgō̆ masculine nominative singular";
  const VOS: &str = "3\t1\t3\tvos\tp32\tvos\tvōs, uestrum, pl. pron.\t2402\tyou \
                     (pl.), ye;\tvōs masculine accusative plural";
  const ET: &str = "1\t1\t1\tet\td   (c  )\tet\tĕt, conj. adv.\t42726\tand, and \
                    even; also, even; (et ... et = both ... and);\tĕt";
  const IRRUMABO: &str = "2\t1\t2\tirrumabo\tv1 \tinrumo\tīnrŭmo, as, \
                          are\t6\tto extend the breast to, to give \
                          suck;\tīrrŭmābō̆ future indicative active 1st \
                          singular";

  fn indices(mapped: &Mapped) -> Vec<(u32, u32)> {
    mapped
      .occurrences
      .iter()
      .map(|o| (o.word_index, o.sentence_index))
      .collect()
  }

  #[test]
  fn two_sentences() {
    let text = ["", PEDICABO, EGO, VOS, ET, IRRUMABO, ""].join("\n");
    let mapped = map_output(&text);

    assert!(mapped.diagnostics.is_empty());
    assert_eq!(indices(&mapped), [(1, 1), (2, 1), (3, 1), (4, 2), (5, 2)]);
    assert_eq!(mapped.words.len(), 5);

    let first = &mapped.occurrences[0];
    assert_eq!(first.original_form, "Pedicabo");
    assert_eq!(first.tag, "v1");
    assert_eq!(
      first.morph_analysis,
      "pēdīcābō̆ future indicative active 1st singular"
    );
    let id = word_id(
      "pēdīco, as, are",
      "to perform anal intercourse; to commit sodomy with;",
    );
    assert_eq!(first.word_id, Some(id));

    let word = &mapped.words[&id];
    assert_eq!(word.lemma_raw, "pedico");
    assert_eq!(word.lasla_frequency, 4);
    assert_eq!(word.known, None);
  }

  #[test]
  fn malformed_line_is_skipped_but_counted() {
    let truncated = "1\t1\t1\tet\td   (c  )\tet\tĕt, conj. adv.\t42726\tand, an";
    let text = [PEDICABO, EGO, VOS, truncated, IRRUMABO].join("\n");
    let mapped = map_output(&text);

    assert_eq!(indices(&mapped), [(1, 1), (2, 1), (3, 1), (5, 2)]);
    assert_eq!(mapped.diagnostics.len(), 1);
    assert_eq!(mapped.diagnostics[0].token, 4);
    assert_eq!(
      mapped.diagnostics[0].kind,
      DiagnosticKind::MalformedLine { columns: 9 }
    );
    assert!(mapped.diagnostics[0].to_string().starts_with("SKIPPED word #4:"));
  }

  #[test]
  fn unknown_translation_keeps_position_without_word() {
    let text = [PEDICABO, EGO, VOS, "1\t1\t1\tet\t\tunknown", IRRUMABO].join("\n");
    let mapped = map_output(&text);

    assert_eq!(indices(&mapped), [(1, 1), (2, 1), (3, 1), (4, 2), (5, 2)]);
    let unknown = &mapped.occurrences[3];
    assert_eq!(unknown.word_id, None);
    assert_eq!(unknown.original_form, "et");
    assert!(!unknown.is_persistable());

    assert_eq!(mapped.words.len(), 4);
    assert_eq!(mapped.persistable(), 4);
    assert_eq!(
      mapped.diagnostics[0].kind,
      DiagnosticKind::TranslationUnknown
    );
  }

  #[test]
  fn blank_lines_do_not_consume_tokens() {
    let text = [PEDICABO, EGO, "", "   ", ET, IRRUMABO].join("\n");
    let mapped = map_output(&text);
    assert_eq!(indices(&mapped), [(1, 1), (2, 1), (3, 2), (4, 2)]);
  }

  #[test]
  fn sentence_positions_one_two_one_two() {
    let text = [PEDICABO, EGO, ET, IRRUMABO].join("\n");
    let sentences: Vec<_> = map_output(&text)
      .occurrences
      .iter()
      .map(|o| o.sentence_index)
      .collect();
    assert_eq!(sentences, [1, 1, 2, 2]);
  }

  #[test]
  fn repeated_lemma_yields_one_entry() {
    let text = [EGO, EGO.replacen("2", "1", 1).as_str(), EGO].join("\n");
    let mapped = map_output(&text);

    assert_eq!(mapped.occurrences.len(), 3);
    assert_eq!(mapped.words.len(), 1);
    let ids: Vec<_> = mapped.occurrences.iter().map(|o| o.word_id).collect();
    assert!(ids.iter().all(|id| *id == ids[0]));
  }

  #[test]
  fn same_lemma_different_translation_are_distinct() {
    let other = EGO.replace("moi, me", "I, me");
    let text = [EGO, other.as_str()].join("\n");
    assert_eq!(map_output(&text).words.len(), 2);
  }

  #[test]
  fn invalid_position_is_skipped() {
    let bad = EGO.replacen("\t2\t", "\tx\t", 1);
    let text = [PEDICABO, bad.as_str(), VOS].join("\n");
    let mapped = map_output(&text);

    assert_eq!(indices(&mapped), [(1, 1), (3, 1)]);
    assert_eq!(
      mapped.diagnostics[0].kind,
      DiagnosticKind::InvalidPosition("x".into())
    );
  }

  #[test]
  fn invalid_frequency_drops_the_whole_line() {
    let bad = EGO.replace("14846", "many");
    let text = [PEDICABO, bad.as_str(), VOS].join("\n");
    let mapped = map_output(&text);

    assert_eq!(indices(&mapped), [(1, 1), (3, 1)]);
    assert_eq!(mapped.words.len(), 2);
    assert!(
      !mapped
        .words
        .values()
        .any(|w| w.lemma_rich == "ĕgō̆, mei, pron.")
    );
    assert_eq!(
      mapped.diagnostics[0].kind,
      DiagnosticKind::InvalidFrequency("many".into())
    );
  }

  #[test]
  fn empty_frequency_defaults_to_zero() {
    let text = EGO.replace("14846", "");
    let mapped = map_output(&text);
    assert_eq!(mapped.words.values().next().unwrap().lasla_frequency, 0);
  }

  #[test]
  fn into_upload_splits_diagnostics() {
    let text = [PEDICABO, "garbage"].join("\n");
    let work = NewWork::new("Catullus", "Carmina").unwrap();
    let (upload, diagnostics) = map_output(&text).into_upload(work.clone());

    assert_eq!(upload.work, work);
    assert_eq!(upload.occurrences.len(), 1);
    assert_eq!(diagnostics.len(), 1);
  }
}
