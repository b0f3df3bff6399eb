//! The upload transaction.
//!
//! Everything here runs synchronously on the connection thread against an
//! open [`rusqlite::Transaction`]. The caller commits; any `Err` returned
//! from these functions drops the transaction, which rolls it back.

use std::collections::HashMap;

use rusqlite::{params, Transaction};
use uuid::Uuid;
use vocab_core::store::WorkUpload;

use crate::encode::{encode_uuid, RawAuthor, RawWork};

// ─── Encoded input ───────────────────────────────────────────────────────────

/// A [`WorkUpload`] with every value already in its column representation, so
/// it can be moved onto the connection thread.
pub struct RawUpload {
  pub author_id:   String,
  pub author_name: String,
  pub work_id:     String,
  pub title:       String,
  pub words:       Vec<RawNewWord>,
  pub occurrences: Vec<RawNewWorkWord>,
  /// Occurrences without a lexical entry, dropped during encoding.
  pub skipped:     usize,
}

pub struct RawNewWord {
  pub word_id:         String,
  pub lemma_raw:       String,
  pub lemma_rich:      String,
  pub translation:     String,
  pub lasla_frequency: i64,
  pub known:           Option<bool>,
}

pub struct RawNewWorkWord {
  pub word_id:        String,
  pub word_index:     u32,
  pub sentence_index: u32,
  pub original_form:  String,
  pub tag:            String,
  pub morph_analysis: String,
}

impl RawUpload {
  pub fn encode(upload: WorkUpload) -> Self {
    let WorkUpload { work, words, occurrences } = upload;

    let words = words
      .into_values()
      .map(|w| RawNewWord {
        word_id:         encode_uuid(w.word_id),
        lemma_raw:       w.lemma_raw,
        lemma_rich:      w.lemma_rich,
        translation:     w.translation,
        lasla_frequency: w.lasla_frequency,
        known:           w.known,
      })
      .collect();

    let total = occurrences.len();
    let occurrences: Vec<RawNewWorkWord> = occurrences
      .into_iter()
      .filter_map(|o| {
        let word_id = o.word_id.filter(|id| !id.is_nil())?;
        Some(RawNewWorkWord {
          word_id:        encode_uuid(word_id),
          word_index:     o.word_index,
          sentence_index: o.sentence_index,
          original_form:  o.original_form,
          tag:            o.tag,
          morph_analysis: o.morph_analysis,
        })
      })
      .collect();

    Self {
      author_id: encode_uuid(work.author_id()),
      author_name: work.author().to_owned(),
      work_id: encode_uuid(work.work_id()),
      title: work.title().to_owned(),
      words,
      skipped: total - occurrences.len(),
      occurrences,
    }
  }
}

/// What the transaction wrote, still in column representation.
pub struct Persisted {
  pub author:      RawAuthor,
  pub work:        RawWork,
  pub words:       usize,
  pub occurrences: usize,
}

// ─── Transaction body ────────────────────────────────────────────────────────

/// Write `upload` inside `tx`, stamping every row with `now`.
pub fn persist(
  tx: &Transaction<'_>,
  upload: &RawUpload,
  now: &str,
) -> rusqlite::Result<Persisted> {
  let author = upsert_author(tx, upload, now)?;
  let work = upsert_work(tx, upload, now)?;

  let mut remap: HashMap<&str, String> = HashMap::with_capacity(upload.words.len());
  for word in &upload.words {
    let persisted = upsert_word(tx, word, now)?;
    remap.insert(word.word_id.as_str(), persisted);
  }

  retire_occurrences(tx, &upload.work_id, now)?;
  for occurrence in &upload.occurrences {
    // An occurrence may reference an entry whose row already existed under
    // a different id; follow the id the upsert returned.
    let word_id = remap
      .get(occurrence.word_id.as_str())
      .map(String::as_str)
      .unwrap_or(&occurrence.word_id);
    upsert_occurrence(tx, &upload.work_id, word_id, occurrence, now)?;
  }

  Ok(Persisted {
    author,
    work,
    words: upload.words.len(),
    occurrences: upload.occurrences.len(),
  })
}

fn upsert_author(
  tx: &Transaction<'_>,
  upload: &RawUpload,
  now: &str,
) -> rusqlite::Result<RawAuthor> {
  tx.query_row(
    "INSERT INTO author (author_id, name, created_at, modified_at)
     VALUES (?1, ?2, ?3, ?3)
     ON CONFLICT (name) DO UPDATE SET
         modified_at = excluded.modified_at,
         deleted_at  = NULL
     RETURNING author_id, name, created_at, modified_at, deleted_at",
    params![upload.author_id, upload.author_name, now],
    RawAuthor::from_row,
  )
}

fn upsert_work(
  tx: &Transaction<'_>,
  upload: &RawUpload,
  now: &str,
) -> rusqlite::Result<RawWork> {
  let (work_id, author_id, title, created_at, modified_at, deleted_at) = tx
    .query_row(
      "INSERT INTO work (work_id, author_id, title, created_at, modified_at)
       VALUES (?1, ?2, ?3, ?4, ?4)
       ON CONFLICT (author_id, title) DO UPDATE SET
           modified_at = excluded.modified_at,
           deleted_at  = NULL
       RETURNING work_id, author_id, title, created_at, modified_at, deleted_at",
      params![upload.work_id, upload.author_id, upload.title, now],
      |r| {
        Ok((
          r.get::<_, String>(0)?,
          r.get::<_, String>(1)?,
          r.get::<_, String>(2)?,
          r.get::<_, String>(3)?,
          r.get::<_, String>(4)?,
          r.get::<_, Option<String>>(5)?,
        ))
      },
    )?;

  Ok(RawWork {
    work_id,
    author_id,
    author_name: upload.author_name.clone(),
    title,
    created_at,
    modified_at,
    deleted_at,
  })
}

/// Upsert one lexical entry and return the id of the row it landed in.
///
/// The entry's natural key is `(lemma_raw, lemma_rich)`. A clash on the
/// content id alone (same rich lemma and translation, different raw lemma)
/// refreshes the existing row without touching its raw lemma. `known` is only
/// overwritten when the caller supplied a value.
fn upsert_word(
  tx: &Transaction<'_>,
  word: &RawNewWord,
  now: &str,
) -> rusqlite::Result<String> {
  tx.query_row(
    "INSERT INTO word (word_id, lemma_raw, lemma_rich, translation,
                       lasla_frequency, known, created_at, modified_at)
     VALUES (?1, ?2, ?3, ?4, ?5, COALESCE(?6, 0), ?7, ?7)
     ON CONFLICT (lemma_raw, lemma_rich) DO UPDATE SET
         translation     = excluded.translation,
         lasla_frequency = excluded.lasla_frequency,
         known           = COALESCE(?6, word.known),
         modified_at     = excluded.modified_at,
         deleted_at      = NULL
     ON CONFLICT DO UPDATE SET
         lasla_frequency = excluded.lasla_frequency,
         known           = COALESCE(?6, word.known),
         modified_at     = excluded.modified_at,
         deleted_at      = NULL
     RETURNING word_id",
    params![
      word.word_id,
      word.lemma_raw,
      word.lemma_rich,
      word.translation,
      word.lasla_frequency,
      word.known,
      now,
    ],
    |r| r.get(0),
  )
}

/// Soft-delete every live occurrence of the work. The upserts that follow
/// revive the positions the new upload still covers.
fn retire_occurrences(
  tx: &Transaction<'_>,
  work_id: &str,
  now: &str,
) -> rusqlite::Result<usize> {
  tx.execute(
    "UPDATE work_word SET deleted_at = ?2, modified_at = ?2
     WHERE work_id = ?1 AND deleted_at IS NULL",
    params![work_id, now],
  )
}

fn upsert_occurrence(
  tx: &Transaction<'_>,
  work_id: &str,
  word_id: &str,
  occurrence: &RawNewWorkWord,
  now: &str,
) -> rusqlite::Result<usize> {
  tx.execute(
    "INSERT INTO work_word (work_word_id, work_id, word_id, word_index,
                            sentence_index, original_form, tag,
                            morph_analysis, created_at, modified_at)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)
     ON CONFLICT (work_id, word_index) DO UPDATE SET
         word_id        = excluded.word_id,
         sentence_index = excluded.sentence_index,
         original_form  = excluded.original_form,
         tag            = excluded.tag,
         morph_analysis = excluded.morph_analysis,
         modified_at    = excluded.modified_at,
         deleted_at     = NULL",
    params![
      encode_uuid(Uuid::new_v4()),
      work_id,
      word_id,
      occurrence.word_index,
      occurrence.sentence_index,
      occurrence.original_form,
      occurrence.tag,
      occurrence.morph_analysis,
      now,
    ],
  )
}
