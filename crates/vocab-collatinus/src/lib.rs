//! Text pipeline around the Collatinus lemmatiser.
//!
//! Raw upload bytes are sanitised, chunked into sentences, fed one chunk at a
//! time to the external analyser, and the concatenated output is mapped into
//! occurrences and deduplicated lexical entries.
//!
//! # Quick start
//!
//! ```no_run
//! # async fn run() -> vocab_collatinus::Result<()> {
//! use vocab_collatinus::{Analyser, Language, TextProcessor};
//!
//! let analyser = Analyser::new("/collatinus/bin/Client_C11", Language::English);
//! let mapped = TextProcessor::new(analyser).process(b"Arma virumque cano.").await?;
//! println!("{} tokens, {} words", mapped.occurrences.len(), mapped.words.len());
//! # Ok(())
//! # }
//! ```

pub mod analyser;
pub mod chunk;
pub mod error;
pub mod language;
pub mod mapper;
pub mod sanitise;

pub use analyser::{Analyser, Session};
pub use error::{Error, Result};
pub use language::Language;
pub use mapper::{Diagnostic, Mapped};

use tracing::{debug, info};

/// Runs the whole pipeline for one upload.
#[derive(Debug, Clone)]
pub struct TextProcessor {
  analyser: Analyser,
}

impl TextProcessor {
  pub fn new(analyser: Analyser) -> Self { Self { analyser } }

  pub fn analyser(&self) -> &Analyser { &self.analyser }

  /// Sanitise, chunk, lemmatise and map `input`.
  ///
  /// Chunking errors are raised before the analyser is started; an empty
  /// document never starts it at all.
  pub async fn process(&self, input: &[u8]) -> Result<Mapped> {
    let text = sanitise::sanitise(input);
    let chunks = chunk::chunk_by_sentence(&text)?;
    if chunks.is_empty() {
      debug!("nothing to lemmatise");
      return Ok(Mapped::default());
    }

    let session = self.analyser.session().await?;
    let output = session.lemmatise_all(&chunks).await?;
    let mapped = mapper::map_output(&output);

    for diagnostic in &mapped.diagnostics {
      debug!(%diagnostic, "dropped token");
    }
    info!(
      chunks = chunks.len(),
      occurrences = mapped.occurrences.len(),
      persistable = mapped.persistable(),
      words = mapped.words.len(),
      diagnostics = mapped.diagnostics.len(),
      "text processed"
    );

    Ok(mapped)
  }
}

#[cfg(all(test, unix))]
mod tests {
  use super::*;
  use crate::analyser::tests::stub_analyser;

  #[tokio::test]
  async fn arma_virumque_cano() {
    let (_dir, exe) = stub_analyser();
    let processor = TextProcessor::new(Analyser::new(&exe, Language::English));

    let mapped = processor.process(b"Arma virumque\ncano.").await.unwrap();

    let forms: Vec<_> = mapped
      .occurrences
      .iter()
      .map(|o| (o.original_form.as_str(), o.word_index, o.sentence_index))
      .collect();
    assert_eq!(forms, [("Arma", 1, 1), ("virumque", 2, 1), ("cano", 3, 1)]);
    assert_eq!(mapped.words.len(), 3);
    assert!(mapped.diagnostics.is_empty());
  }

  #[tokio::test]
  async fn sentences_are_numbered_across_chunks() {
    let (_dir, exe) = stub_analyser();
    let processor = TextProcessor::new(Analyser::new(&exe, Language::English));

    let mapped = processor.process(b"Arma cano. Arma cano.").await.unwrap();

    let sentences: Vec<_> =
      mapped.occurrences.iter().map(|o| o.sentence_index).collect();
    assert_eq!(sentences, [1, 1, 2, 2]);
    assert_eq!(mapped.words.len(), 2);
  }

  #[tokio::test]
  async fn overlong_sentence_never_starts_the_analyser() {
    let (dir, exe) = stub_analyser();
    let processor = TextProcessor::new(Analyser::new(&exe, Language::English));

    let input = "a".repeat(chunk::MAX_CHUNK_LEN + 1);
    let err = processor.process(input.as_bytes()).await.unwrap_err();

    assert!(matches!(err, Error::ChunkTooLong { length: 4001, .. }));
    assert!(!dir.path().join("calls.log").exists());
  }

  #[tokio::test]
  async fn empty_document_maps_to_nothing() {
    let (dir, exe) = stub_analyser();
    let processor = TextProcessor::new(Analyser::new(&exe, Language::English));

    let mapped = processor.process(b" \r\n ").await.unwrap();
    assert!(mapped.occurrences.is_empty());
    assert!(!dir.path().join("calls.log").exists());
  }
}
