//! Word-list views and the `known` toggle.
//!
//! The three list routes differ only in the [`WordList`] they request; they
//! share [`word_list`] for the fetch-owner, fetch-words, drop-known sequence.

use axum::{
  Json,
  extract::{Path, State},
};
use serde::Serialize;
use uuid::Uuid;
use vocab_core::{
  store::CorpusStore,
  word::Word,
  wordlist::{ListOwner, WordInWork, WordList, skip_known},
};

use crate::{AppState, Error, Result};

#[derive(Debug, Serialize)]
pub struct WordListResponse {
  pub heading: &'static str,
  /// `None` for lists scoped to an author.
  pub title:   Option<String>,
  pub author:  String,
  pub words:   Vec<WordInWork>,
}

async fn word_list<S>(
  state: &AppState<S>,
  list: WordList,
  id: Uuid,
  drop_known: bool,
) -> Result<Json<WordListResponse>>
where
  S: CorpusStore,
{
  let (title, author) = match list.owner() {
    ListOwner::Work => {
      let work = state
        .store
        .get_work(id)
        .await
        .map_err(Error::store)?
        .ok_or_else(|| Error::NotFound(format!("work {id}")))?;
      (Some(work.title), work.author_name)
    }
    ListOwner::Author => {
      let author = state
        .store
        .get_author(id)
        .await
        .map_err(Error::store)?
        .ok_or_else(|| Error::NotFound(format!("author {id}")))?;
      (None, author.name)
    }
  };

  let mut words = state.store.word_list(list, id).await.map_err(Error::store)?;
  if drop_known {
    words = skip_known(words);
  }

  Ok(Json(WordListResponse { heading: list.heading(), title, author, words }))
}

/// `GET /frequency-list/{id}/{skip_known}`
pub async fn frequency_by_work<S>(
  State(state): State<AppState<S>>,
  Path((id, drop_known)): Path<(Uuid, bool)>,
) -> Result<Json<WordListResponse>>
where
  S: CorpusStore,
{
  word_list(&state, WordList::FrequencyByWork, id, drop_known).await
}

/// `GET /frequency-list-author/{id}/{skip_known}`
pub async fn frequency_by_author<S>(
  State(state): State<AppState<S>>,
  Path((id, drop_known)): Path<(Uuid, bool)>,
) -> Result<Json<WordListResponse>>
where
  S: CorpusStore,
{
  word_list(&state, WordList::FrequencyByAuthor, id, drop_known).await
}

/// `GET /glossary/{id}/{skip_known}`
pub async fn glossary_by_work<S>(
  State(state): State<AppState<S>>,
  Path((id, drop_known)): Path<(Uuid, bool)>,
) -> Result<Json<WordListResponse>>
where
  S: CorpusStore,
{
  word_list(&state, WordList::GlossaryByWork, id, drop_known).await
}

/// `POST /toggle-known-status/{id}`
pub async fn toggle_known<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Word>>
where
  S: CorpusStore,
{
  let word = state
    .store
    .toggle_known(id)
    .await
    .map_err(Error::store)?
    .ok_or_else(|| Error::NotFound(format!("word {id}")))?;
  tracing::debug!(word_id = %id, known = word.known, "toggled known status");
  Ok(Json(word))
}
