//! The `CorpusStore` trait and supporting types.
//!
//! The trait is implemented by storage backends (e.g. `vocab-store-sqlite`).
//! The web layer depends on this abstraction, not on any concrete backend.

use std::{collections::BTreeMap, future::Future};

use uuid::Uuid;

use crate::{
  author::Author,
  occurrence::{NewWorkWord, WorkWord},
  word::{NewWord, Word},
  wordlist::{WordInWork, WordList},
  work::{NewWork, Work},
};

// ─── Upload ──────────────────────────────────────────────────────────────────

/// Everything one upload writes, committed as a single unit by
/// [`CorpusStore::persist_work`].
#[derive(Debug, Clone)]
pub struct WorkUpload {
  pub work:        NewWork,
  /// Distinct lexical entries keyed by their content-derived identity.
  pub words:       BTreeMap<Uuid, NewWord>,
  /// Occurrences in source order, including ones without a lexical entry.
  pub occurrences: Vec<NewWorkWord>,
}

/// Summary of a committed upload.
#[derive(Debug, Clone)]
pub struct PersistedWork {
  pub author:      Author,
  pub work:        Work,
  pub words:       usize,
  pub occurrences: usize,
  /// Occurrences dropped because they had no lexical entry.
  pub skipped:     usize,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a corpus store backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait CorpusStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Upsert the author, the work, every lexical entry and every persistable
  /// occurrence in one transaction. Nothing is written unless everything is.
  ///
  /// Re-submitting the same upload leaves exactly one row per identity.
  fn persist_work(
    &self,
    upload: WorkUpload,
  ) -> impl Future<Output = Result<PersistedWork, Self::Error>> + Send + '_;

  /// Soft-delete a live work together with its occurrences, and its author if
  /// no other live work remains. Returns `false` if no live work matched.
  fn delete_work(
    &self,
    work_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Flip a word's `known` flag. Returns `None` if the word does not exist.
  fn toggle_known(
    &self,
    word_id: Uuid,
  ) -> impl Future<Output = Result<Option<Word>, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Retrieve a live author by id.
  fn get_author(
    &self,
    author_id: Uuid,
  ) -> impl Future<Output = Result<Option<Author>, Self::Error>> + Send + '_;

  /// Retrieve a live work by id.
  fn get_work(
    &self,
    work_id: Uuid,
  ) -> impl Future<Output = Result<Option<Work>, Self::Error>> + Send + '_;

  /// All live works, ordered by author name then title.
  fn list_works(
    &self,
  ) -> impl Future<Output = Result<Vec<Work>, Self::Error>> + Send + '_;

  /// Materialise `list` for the work or author identified by `owner_id`.
  fn word_list(
    &self,
    list: WordList,
    owner_id: Uuid,
  ) -> impl Future<Output = Result<Vec<WordInWork>, Self::Error>> + Send + '_;

  /// Live occurrences of a work in word-index order.
  fn list_occurrences(
    &self,
    work_id: Uuid,
  ) -> impl Future<Output = Result<Vec<WorkWord>, Self::Error>> + Send + '_;
}
