//! Handlers for `/works` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/works` | Live works ordered by author, then title |
//! | `POST` | `/works/{id}/delete` | Soft delete; 404 if not live |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
};
use uuid::Uuid;
use vocab_core::{store::CorpusStore, work::Work};

use crate::{AppState, Error, Result};

/// `GET /works`
pub async fn list<S>(State(state): State<AppState<S>>) -> Result<Json<Vec<Work>>>
where
  S: CorpusStore,
{
  let works = state.store.list_works().await.map_err(Error::store)?;
  Ok(Json(works))
}

/// `POST /works/{id}/delete`
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode>
where
  S: CorpusStore,
{
  if state.store.delete_work(id).await.map_err(Error::store)? {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(Error::NotFound(format!("work {id}")))
  }
}
