//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings, UUIDs hyphenated lowercase strings,
//! booleans and indices plain integers.

use chrono::{DateTime, Utc};
use uuid::Uuid;
use vocab_core::{
  author::Author,
  occurrence::WorkWord,
  word::Word,
  wordlist::WordInWork,
  work::Work,
};

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

fn decode_opt_dt(s: Option<&str>) -> Result<Option<DateTime<Utc>>> {
  s.map(decode_dt).transpose()
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read from an `author` row.
pub struct RawAuthor {
  pub author_id:   String,
  pub name:        String,
  pub created_at:  String,
  pub modified_at: String,
  pub deleted_at:  Option<String>,
}

impl RawAuthor {
  /// Column order: `author_id, name, created_at, modified_at, deleted_at`.
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      author_id:   row.get(0)?,
      name:        row.get(1)?,
      created_at:  row.get(2)?,
      modified_at: row.get(3)?,
      deleted_at:  row.get(4)?,
    })
  }

  pub fn into_author(self) -> Result<Author> {
    Ok(Author {
      author_id:   decode_uuid(&self.author_id)?,
      name:        self.name,
      created_at:  decode_dt(&self.created_at)?,
      modified_at: decode_dt(&self.modified_at)?,
      deleted_at:  decode_opt_dt(self.deleted_at.as_deref())?,
    })
  }
}

/// Raw strings read from a `work` row joined with its author's name.
pub struct RawWork {
  pub work_id:     String,
  pub author_id:   String,
  pub author_name: String,
  pub title:       String,
  pub created_at:  String,
  pub modified_at: String,
  pub deleted_at:  Option<String>,
}

impl RawWork {
  /// Column order: `work_id, author_id, author name, title, created_at,
  /// modified_at, deleted_at`.
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      work_id:     row.get(0)?,
      author_id:   row.get(1)?,
      author_name: row.get(2)?,
      title:       row.get(3)?,
      created_at:  row.get(4)?,
      modified_at: row.get(5)?,
      deleted_at:  row.get(6)?,
    })
  }

  pub fn into_work(self) -> Result<Work> {
    Ok(Work {
      work_id:     decode_uuid(&self.work_id)?,
      author_id:   decode_uuid(&self.author_id)?,
      author_name: self.author_name,
      title:       self.title,
      created_at:  decode_dt(&self.created_at)?,
      modified_at: decode_dt(&self.modified_at)?,
      deleted_at:  decode_opt_dt(self.deleted_at.as_deref())?,
    })
  }
}

/// Raw values read from a `word` row.
pub struct RawWord {
  pub word_id:         String,
  pub lemma_raw:       String,
  pub lemma_rich:      String,
  pub translation:     String,
  pub lasla_frequency: i64,
  pub known:           bool,
  pub created_at:      String,
  pub modified_at:     String,
  pub deleted_at:      Option<String>,
}

impl RawWord {
  /// Column order matches [`WORD_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      word_id:         row.get(0)?,
      lemma_raw:       row.get(1)?,
      lemma_rich:      row.get(2)?,
      translation:     row.get(3)?,
      lasla_frequency: row.get(4)?,
      known:           row.get(5)?,
      created_at:      row.get(6)?,
      modified_at:     row.get(7)?,
      deleted_at:      row.get(8)?,
    })
  }

  pub fn into_word(self) -> Result<Word> {
    Ok(Word {
      word_id:         decode_uuid(&self.word_id)?,
      lemma_raw:       self.lemma_raw,
      lemma_rich:      self.lemma_rich,
      translation:     self.translation,
      lasla_frequency: self.lasla_frequency,
      known:           self.known,
      created_at:      decode_dt(&self.created_at)?,
      modified_at:     decode_dt(&self.modified_at)?,
      deleted_at:      decode_opt_dt(self.deleted_at.as_deref())?,
    })
  }
}

pub const WORD_COLUMNS: &str = "word_id, lemma_raw, lemma_rich, translation, \
                                lasla_frequency, known, created_at, \
                                modified_at, deleted_at";

/// Raw values read from a `work_word` row.
pub struct RawWorkWord {
  pub work_word_id:   String,
  pub work_id:        String,
  pub word_id:        String,
  pub word_index:     u32,
  pub sentence_index: u32,
  pub original_form:  String,
  pub tag:            String,
  pub morph_analysis: String,
  pub created_at:     String,
  pub modified_at:    String,
  pub deleted_at:     Option<String>,
}

impl RawWorkWord {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      work_word_id:   row.get(0)?,
      work_id:        row.get(1)?,
      word_id:        row.get(2)?,
      word_index:     row.get(3)?,
      sentence_index: row.get(4)?,
      original_form:  row.get(5)?,
      tag:            row.get(6)?,
      morph_analysis: row.get(7)?,
      created_at:     row.get(8)?,
      modified_at:    row.get(9)?,
      deleted_at:     row.get(10)?,
    })
  }

  pub fn into_work_word(self) -> Result<WorkWord> {
    Ok(WorkWord {
      work_word_id:   decode_uuid(&self.work_word_id)?,
      work_id:        decode_uuid(&self.work_id)?,
      word_id:        decode_uuid(&self.word_id)?,
      word_index:     self.word_index,
      sentence_index: self.sentence_index,
      original_form:  self.original_form,
      tag:            self.tag,
      morph_analysis: self.morph_analysis,
      created_at:     decode_dt(&self.created_at)?,
      modified_at:    decode_dt(&self.modified_at)?,
      deleted_at:     decode_opt_dt(self.deleted_at.as_deref())?,
    })
  }
}

/// Raw values of one word-list row.
pub struct RawWordInWork {
  pub word_id:     String,
  pub lemma_rich:  String,
  pub translation: String,
  pub known:       bool,
  pub count:       u32,
}

impl RawWordInWork {
  /// Column order: `word_id, lemma_rich, translation, known, count`.
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      word_id:     row.get(0)?,
      lemma_rich:  row.get(1)?,
      translation: row.get(2)?,
      known:       row.get(3)?,
      count:       row.get(4)?,
    })
  }

  pub fn into_word_in_work(self) -> Result<WordInWork> {
    Ok(WordInWork {
      word_id:     decode_uuid(&self.word_id)?,
      lemma_rich:  self.lemma_rich,
      translation: self.translation,
      known:       self.known,
      count:       self.count,
    })
  }
}
