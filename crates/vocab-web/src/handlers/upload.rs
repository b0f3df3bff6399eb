//! `POST /lemmatise`: process an uploaded text and store it as a work.
//!
//! The form carries three fields: `file` (the plain-text document),
//! `author` and `title`. A live work with the same author and title is
//! rejected with 409; it has to be deleted before it can be uploaded again.

use axum::{
  Json,
  extract::{Multipart, State},
  http::StatusCode,
  response::IntoResponse,
};
use bytes::Bytes;
use serde::Serialize;
use vocab_core::{store::CorpusStore, work::{NewWork, Work}};

use crate::{AppState, Error, Result};

/// What a successful upload returns: the stored work plus every token the
/// pipeline had to drop.
#[derive(Debug, Serialize)]
pub struct UploadReport {
  pub work:        Work,
  pub words:       usize,
  pub occurrences: usize,
  pub skipped:     usize,
  pub diagnostics: Vec<String>,
}

struct UploadForm {
  file:   Bytes,
  author: String,
  title:  String,
}

async fn read_form(mut multipart: Multipart) -> Result<UploadForm> {
  let mut file = None;
  let mut author = String::new();
  let mut title = String::new();

  while let Some(field) = multipart.next_field().await? {
    let name = field.name().unwrap_or_default().to_owned();
    match name.as_str() {
      "file" => file = Some(field.bytes().await?),
      "author" => author = field.text().await?,
      "title" => title = field.text().await?,
      _ => {}
    }
  }

  let file = file.ok_or_else(|| {
    Error::BadRequest("failed to get uploaded file from the request".to_owned())
  })?;
  Ok(UploadForm { file, author, title })
}

pub async fn lemmatise<S>(
  State(state): State<AppState<S>>,
  multipart: Multipart,
) -> Result<impl IntoResponse>
where
  S: CorpusStore,
{
  let form = read_form(multipart).await?;
  let new_work = NewWork::new(&form.author, &form.title)?;

  let existing = state
    .store
    .get_work(new_work.work_id())
    .await
    .map_err(Error::store)?;
  if existing.is_some() {
    return Err(Error::Conflict(
      "a work with this author and title already exists; remove it and try \
       again"
        .to_owned(),
    ));
  }

  let mapped = state.processor.process(&form.file).await?;
  let (upload, diagnostics) = mapped.into_upload(new_work);
  let persisted = state
    .store
    .persist_work(upload)
    .await
    .map_err(Error::store)?;

  tracing::info!(
    work_id = %persisted.work.work_id,
    dropped = diagnostics.len(),
    "work uploaded"
  );

  let report = UploadReport {
    work:        persisted.work,
    words:       persisted.words,
    occurrences: persisted.occurrences,
    skipped:     persisted.skipped,
    diagnostics: diagnostics.iter().map(ToString::to_string).collect(),
  };
  Ok((StatusCode::CREATED, Json(report)))
}
