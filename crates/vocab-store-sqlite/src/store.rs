//! [`SqliteStore`], the SQLite implementation of [`CorpusStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use vocab_core::{
  author::Author,
  occurrence::WorkWord,
  store::{CorpusStore, PersistedWork, WorkUpload},
  word::Word,
  wordlist::{WordInWork, WordList},
  work::Work,
};

use crate::{
  encode::{
    encode_dt, encode_uuid, RawAuthor, RawWord, RawWordInWork, RawWork,
    RawWorkWord, WORD_COLUMNS,
  },
  persist::{persist, RawUpload},
  schema::SCHEMA,
  Result,
};

// ─── Queries ─────────────────────────────────────────────────────────────────

const SELECT_WORK: &str = "
  SELECT k.work_id, k.author_id, a.name, k.title,
         k.created_at, k.modified_at, k.deleted_at
  FROM work k
  JOIN author a ON a.author_id = k.author_id";

const SELECT_WORK_WORD: &str = "
  SELECT work_word_id, work_id, word_id, word_index, sentence_index,
         original_form, tag, morph_analysis,
         created_at, modified_at, deleted_at
  FROM work_word";

const FREQUENCY_BY_WORK: &str = "
  SELECT w.word_id, w.lemma_rich, w.translation, w.known, COUNT(*) AS n
  FROM work_word ww
  JOIN word w ON w.word_id = ww.word_id
  WHERE ww.work_id = ?1 AND ww.deleted_at IS NULL
  GROUP BY w.word_id
  ORDER BY n DESC, w.lemma_rich ASC";

const FREQUENCY_BY_AUTHOR: &str = "
  SELECT w.word_id, w.lemma_rich, w.translation, w.known, COUNT(*) AS n
  FROM work_word ww
  JOIN word w ON w.word_id = ww.word_id
  JOIN work k ON k.work_id = ww.work_id
  WHERE k.author_id = ?1
    AND k.deleted_at IS NULL
    AND ww.deleted_at IS NULL
  GROUP BY w.word_id
  ORDER BY n DESC, w.lemma_rich ASC";

const GLOSSARY_BY_WORK: &str = "
  SELECT w.word_id, w.lemma_rich, w.translation, w.known,
         COUNT(*) OVER (PARTITION BY w.word_id) AS n
  FROM work_word ww
  JOIN word w ON w.word_id = ww.word_id
  WHERE ww.work_id = ?1 AND ww.deleted_at IS NULL
  ORDER BY ww.word_index ASC";

fn word_list_query(list: WordList) -> &'static str {
  match list {
    WordList::FrequencyByWork => FREQUENCY_BY_WORK,
    WordList::FrequencyByAuthor => FREQUENCY_BY_AUTHOR,
    WordList::GlossaryByWork => GLOSSARY_BY_WORK,
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A vocabularium corpus backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── CorpusStore impl ────────────────────────────────────────────────────────

impl CorpusStore for SqliteStore {
  type Error = crate::Error;

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn persist_work(&self, upload: WorkUpload) -> Result<PersistedWork> {
    let raw = RawUpload::encode(upload);
    let skipped = raw.skipped;
    let now = encode_dt(Utc::now());

    let persisted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let persisted = persist(&tx, &raw, &now)?;
        tx.commit()?;
        Ok(persisted)
      })
      .await?;

    let result = PersistedWork {
      author: persisted.author.into_author()?,
      work: persisted.work.into_work()?,
      words: persisted.words,
      occurrences: persisted.occurrences,
      skipped,
    };

    tracing::info!(
      work_id = %result.work.work_id,
      author = %result.author.name,
      title = %result.work.title,
      words = result.words,
      occurrences = result.occurrences,
      skipped = result.skipped,
      "persisted work"
    );

    Ok(result)
  }

  async fn delete_work(&self, work_id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(work_id);
    let now = encode_dt(Utc::now());

    let deleted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let author_id: Option<String> = tx
          .query_row(
            "UPDATE work SET deleted_at = ?2, modified_at = ?2
             WHERE work_id = ?1 AND deleted_at IS NULL
             RETURNING author_id",
            rusqlite::params![id_str, now],
            |r| r.get(0),
          )
          .optional()?;

        // Nothing live matched; dropping `tx` rolls back.
        let Some(author_id) = author_id else {
          return Ok(false);
        };

        tx.execute(
          "UPDATE work_word SET deleted_at = ?2, modified_at = ?2
           WHERE work_id = ?1 AND deleted_at IS NULL",
          rusqlite::params![id_str, now],
        )?;

        tx.execute(
          "UPDATE author SET deleted_at = ?2, modified_at = ?2
           WHERE author_id = ?1
             AND deleted_at IS NULL
             AND NOT EXISTS (
               SELECT 1 FROM work
               WHERE author_id = ?1 AND deleted_at IS NULL
             )",
          rusqlite::params![author_id, now],
        )?;

        tx.commit()?;
        Ok(true)
      })
      .await?;

    if deleted {
      tracing::info!(%work_id, "deleted work");
    }
    Ok(deleted)
  }

  async fn toggle_known(&self, word_id: Uuid) -> Result<Option<Word>> {
    let id_str = encode_uuid(word_id);
    let now = encode_dt(Utc::now());

    let raw: Option<RawWord> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "UPDATE word SET known = NOT known, modified_at = ?2
                 WHERE word_id = ?1
                 RETURNING {WORD_COLUMNS}"
              ),
              rusqlite::params![id_str, now],
              RawWord::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawWord::into_word).transpose()
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn get_author(&self, author_id: Uuid) -> Result<Option<Author>> {
    let id_str = encode_uuid(author_id);

    let raw: Option<RawAuthor> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT author_id, name, created_at, modified_at, deleted_at
               FROM author
               WHERE author_id = ?1 AND deleted_at IS NULL",
              rusqlite::params![id_str],
              RawAuthor::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawAuthor::into_author).transpose()
  }

  async fn get_work(&self, work_id: Uuid) -> Result<Option<Work>> {
    let id_str = encode_uuid(work_id);

    let raw: Option<RawWork> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "{SELECT_WORK} WHERE k.work_id = ?1 AND k.deleted_at IS NULL"
              ),
              rusqlite::params![id_str],
              RawWork::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawWork::into_work).transpose()
  }

  async fn list_works(&self) -> Result<Vec<Work>> {
    let raws: Vec<RawWork> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "{SELECT_WORK} WHERE k.deleted_at IS NULL ORDER BY a.name, k.title"
        ))?;
        let rows = stmt
          .query_map([], RawWork::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawWork::into_work).collect()
  }

  async fn word_list(
    &self,
    list: WordList,
    owner_id: Uuid,
  ) -> Result<Vec<WordInWork>> {
    let id_str = encode_uuid(owner_id);
    let query = word_list_query(list);

    let raws: Vec<RawWordInWork> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(query)?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], RawWordInWork::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawWordInWork::into_word_in_work).collect()
  }

  async fn list_occurrences(&self, work_id: Uuid) -> Result<Vec<WorkWord>> {
    let id_str = encode_uuid(work_id);

    let raws: Vec<RawWorkWord> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "{SELECT_WORK_WORD}
           WHERE work_id = ?1 AND deleted_at IS NULL
           ORDER BY word_index"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], RawWorkWord::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawWorkWord::into_work_word).collect()
  }
}
