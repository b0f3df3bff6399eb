//! Sentence chunking ahead of the analyser.

use crate::{Error, Result};

/// Longest sentence, in characters, the analyser accepts in one invocation.
pub const MAX_CHUNK_LEN: usize = 4_000;

/// Split sanitised text on full stops into trimmed, non-empty sentences, each
/// re-terminated with a full stop.
///
/// Fails without truncating if any sentence exceeds [`MAX_CHUNK_LEN`].
pub fn chunk_by_sentence(text: &str) -> Result<Vec<String>> {
  let mut chunks = Vec::new();

  for part in text.split('.') {
    let part = part.trim();
    let length = part.chars().count();

    if length > MAX_CHUNK_LEN {
      return Err(Error::ChunkTooLong {
        sentence: chunks.len() + 1,
        length,
        max: MAX_CHUNK_LEN,
      });
    }

    if !part.is_empty() {
      chunks.push(format!("{part}."));
    }
  }

  Ok(chunks)
}
