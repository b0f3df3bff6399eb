//! Router tests: a real in-memory store and a shell script standing in for
//! the Collatinus client.

use std::{fs, os::unix::fs::PermissionsExt as _, path::PathBuf, sync::Arc};

use axum::{
  body::Body,
  http::{Request, StatusCode, header},
  response::Response,
};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt as _;
use vocab_collatinus::TextProcessor;
use vocab_store_sqlite::SqliteStore;

use super::*;

/// Echoes each whitespace-separated word of `-p2 <chunk>` back as one
/// ten-column analysis line. `virumque` gets no translation; any chunk
/// containing `Fail` exits non-zero.
const STUB: &str = r##"#!/bin/sh
if [ "$1" != "-p2" ]; then
  exit 0
fi
case "$2" in
  *Fail*) echo "analyser crashed" >&2; exit 2 ;;
esac
i=0
for word in $2; do
  i=$((i + 1))
  word=${word%.}
  case "$word" in
    virumque) gloss=unknown ;;
    *) gloss="gloss of $word" ;;
  esac
  printf '%s\t1\t%s\t%s\tn11\t%s\t%s, ae\t12\t%s\t%s nominative\n' \
    "$i" "$i" "$word" "$word" "$word" "$gloss" "$word"
done
"##;

const BOUNDARY: &str = "vocab-test-boundary";

struct Harness {
  _dir:  TempDir,
  state: AppState<SqliteStore>,
}

impl Harness {
  async fn new() -> Self {
    let dir = tempfile::tempdir().unwrap();
    let exe: PathBuf = dir.path().join("collatinus");
    fs::write(&exe, STUB).unwrap();
    fs::set_permissions(&exe, fs::Permissions::from_mode(0o755)).unwrap();

    let config = ServerConfig {
      analyser_path: exe,
      store_path: PathBuf::from(":memory:"),
      ..ServerConfig::default()
    };
    let processor = TextProcessor::new(config.analyser().unwrap());
    let store = SqliteStore::open_in_memory().await.unwrap();

    Self {
      _dir:  dir,
      state: AppState {
        store:     Arc::new(store),
        processor: Arc::new(processor),
        config:    Arc::new(config),
      },
    }
  }

  async fn send(&self, req: Request<Body>) -> Response {
    router(self.state.clone()).oneshot(req).await.unwrap()
  }

  async fn get(&self, uri: &str) -> Response {
    self
      .send(Request::get(uri).body(Body::empty()).unwrap())
      .await
  }

  async fn post(&self, uri: &str) -> Response {
    self
      .send(Request::post(uri).body(Body::empty()).unwrap())
      .await
  }

  async fn upload(&self, fields: &[(&str, &str)]) -> Response {
    let mut body = String::new();
    for (name, value) in fields {
      body.push_str(&format!("--{BOUNDARY}\r\n"));
      if *name == "file" {
        body.push_str(
          "Content-Disposition: form-data; name=\"file\"; filename=\"text.txt\"\r\n\
           Content-Type: text/plain\r\n\r\n",
        );
      } else {
        body.push_str(&format!(
          "Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"
        ));
      }
      body.push_str(value);
      body.push_str("\r\n");
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));

    let req = Request::post("/lemmatise")
      .header(
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={BOUNDARY}"),
      )
      .body(Body::from(body))
      .unwrap();
    self.send(req).await
  }

  /// Upload a work and return its id.
  async fn upload_work(&self, author: &str, title: &str, text: &str) -> String {
    let resp = self
      .upload(&[("author", author), ("title", title), ("file", text)])
      .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    json(resp).await["work"]["work_id"]
      .as_str()
      .unwrap()
      .to_owned()
  }
}

async fn json(resp: Response) -> Value {
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
    .await
    .unwrap();
  serde_json::from_slice(&bytes).unwrap()
}

fn counts(list: &Value) -> Vec<(String, u64)> {
  list["words"]
    .as_array()
    .unwrap()
    .iter()
    .map(|w| {
      (
        w["translation"].as_str().unwrap().to_owned(),
        w["count"].as_u64().unwrap(),
      )
    })
    .collect()
}

// ── Health ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn healthz_returns_ok() {
  let h = Harness::new().await;
  assert_eq!(h.get("/healthz").await.status(), StatusCode::OK);
}

// ── Upload ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn upload_returns_report_with_dropped_tokens() {
  let h = Harness::new().await;
  let resp = h
    .upload(&[
      ("author", "Vergilius"),
      ("title", "Aeneis"),
      ("file", "Arma virumque cano."),
    ])
    .await;
  assert_eq!(resp.status(), StatusCode::CREATED);

  let report = json(resp).await;
  assert_eq!(report["work"]["title"], "Aeneis");
  assert_eq!(report["work"]["author_name"], "Vergilius");
  assert_eq!(report["words"], 2);
  assert_eq!(report["occurrences"], 2);
  assert_eq!(report["skipped"], 1);
  let diagnostics = report["diagnostics"].as_array().unwrap();
  assert_eq!(diagnostics.len(), 1);
  assert!(
    diagnostics[0].as_str().unwrap().contains("virumque"),
    "{diagnostics:?}"
  );

  let works = json(h.get("/works").await).await;
  assert_eq!(works.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn duplicate_upload_is_rejected() {
  let h = Harness::new().await;
  h.upload_work("Vergilius", "Aeneis", "Arma cano.").await;

  let resp = h
    .upload(&[
      ("author", "Vergilius"),
      ("title", "Aeneis"),
      ("file", "Arma cano."),
    ])
    .await;
  assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn upload_without_file_is_bad_request() {
  let h = Harness::new().await;
  let resp = h.upload(&[("author", "Vergilius"), ("title", "Aeneis")]).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upload_without_author_is_bad_request() {
  let h = Harness::new().await;
  let resp = h.upload(&[("title", "Aeneis"), ("file", "Arma cano.")]).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn overlong_sentence_is_bad_request_and_stores_nothing() {
  let h = Harness::new().await;
  let text = "a".repeat(4_001);
  let resp = h
    .upload(&[("author", "Vergilius"), ("title", "Aeneis"), ("file", &text)])
    .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body = json(resp).await;
  assert!(body["error"].as_str().unwrap().contains("4001"), "{body}");

  let works = json(h.get("/works").await).await;
  assert!(works.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn analyser_failure_is_bad_gateway_with_tool_message() {
  let h = Harness::new().await;
  let resp = h
    .upload(&[
      ("author", "Vergilius"),
      ("title", "Aeneis"),
      ("file", "Arma. Fail here."),
    ])
    .await;
  assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
  let body = json(resp).await;
  assert!(
    body["error"].as_str().unwrap().contains("analyser crashed"),
    "{body}"
  );

  let works = json(h.get("/works").await).await;
  assert!(works.as_array().unwrap().is_empty());
}

// ── Word lists ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn frequency_list_and_glossary_for_work() {
  let h = Harness::new().await;
  let id = h.upload_work("Vergilius", "Aeneis", "Arma cano. Arma.").await;

  let freq = json(h.get(&format!("/frequency-list/{id}/false")).await).await;
  assert_eq!(freq["heading"], "Frequency list");
  assert_eq!(freq["title"], "Aeneis");
  assert_eq!(freq["author"], "Vergilius");
  assert_eq!(counts(&freq), [
    ("gloss of Arma".to_owned(), 2),
    ("gloss of cano".to_owned(), 1)
  ]);

  let glossary = json(h.get(&format!("/glossary/{id}/false")).await).await;
  assert_eq!(glossary["heading"], "Glossary");
  assert_eq!(counts(&glossary), [
    ("gloss of Arma".to_owned(), 2),
    ("gloss of cano".to_owned(), 1),
    ("gloss of Arma".to_owned(), 2)
  ]);
}

#[tokio::test]
async fn toggled_words_are_skipped_on_request() {
  let h = Harness::new().await;
  let id = h.upload_work("Vergilius", "Aeneis", "Arma cano.").await;

  let freq = json(h.get(&format!("/frequency-list/{id}/false")).await).await;
  let arma = freq["words"]
    .as_array()
    .unwrap()
    .iter()
    .find(|w| w["translation"] == "gloss of Arma")
    .unwrap()["word_id"]
    .as_str()
    .unwrap()
    .to_owned();

  let resp = h.post(&format!("/toggle-known-status/{arma}")).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(json(resp).await["known"], true);

  let skipped = json(h.get(&format!("/frequency-list/{id}/true")).await).await;
  assert_eq!(counts(&skipped), [("gloss of cano".to_owned(), 1)]);

  let all = json(h.get(&format!("/frequency-list/{id}/false")).await).await;
  assert_eq!(counts(&all).len(), 2);
}

#[tokio::test]
async fn author_frequency_list_spans_works() {
  let h = Harness::new().await;
  h.upload_work("Vergilius", "Aeneis", "Arma cano.").await;
  let id = h.upload_work("Vergilius", "Georgica", "Arma.").await;

  let work = json(h.get("/works").await).await;
  let author_id = work[0]["author_id"].as_str().unwrap().to_owned();

  let list =
    json(h.get(&format!("/frequency-list-author/{author_id}/false")).await).await;
  assert_eq!(list["author"], "Vergilius");
  assert_eq!(list["title"], Value::Null);
  assert_eq!(counts(&list)[0], ("gloss of Arma".to_owned(), 2));

  assert_eq!(
    h.post(&format!("/works/{id}/delete")).await.status(),
    StatusCode::NO_CONTENT
  );
  let list =
    json(h.get(&format!("/frequency-list-author/{author_id}/false")).await).await;
  assert_eq!(counts(&list)[0], ("gloss of Arma".to_owned(), 1));
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
  let h = Harness::new().await;
  let id = uuid::Uuid::new_v4();

  for uri in [
    format!("/frequency-list/{id}/false"),
    format!("/frequency-list-author/{id}/false"),
    format!("/glossary/{id}/true"),
  ] {
    assert_eq!(h.get(&uri).await.status(), StatusCode::NOT_FOUND, "{uri}");
  }
  assert_eq!(
    h.post(&format!("/toggle-known-status/{id}")).await.status(),
    StatusCode::NOT_FOUND
  );
  assert_eq!(
    h.post(&format!("/works/{id}/delete")).await.status(),
    StatusCode::NOT_FOUND
  );
}

// ── Delete ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn deleted_work_can_be_uploaded_again() {
  let h = Harness::new().await;
  let id = h.upload_work("Vergilius", "Aeneis", "Arma cano.").await;

  assert_eq!(
    h.post(&format!("/works/{id}/delete")).await.status(),
    StatusCode::NO_CONTENT
  );
  assert_eq!(
    h.get(&format!("/frequency-list/{id}/false")).await.status(),
    StatusCode::NOT_FOUND
  );

  let again = h.upload_work("Vergilius", "Aeneis", "Arma cano.").await;
  assert_eq!(again, id);
}
