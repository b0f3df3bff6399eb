//! Content-derived identities.
//!
//! Every persisted entity except an occurrence is keyed by a UUID computed
//! from its defining content. Deriving the same key twice yields the same
//! UUID, which is what makes the store's upserts idempotent without a prior
//! existence check.

use uuid::Uuid;

/// Namespace mixed into every content-derived identity.
pub const NAMESPACE: Uuid = Uuid::NAMESPACE_URL;

/// Hash `key` into a stable identity within [`NAMESPACE`].
pub fn content_id(key: &str) -> Uuid { Uuid::new_v5(&NAMESPACE, key.as_bytes()) }

/// Identity of an author, keyed by display name.
pub fn author_id(name: &str) -> Uuid { content_id(name) }

/// Identity of a work, keyed by `"<author>_<title>"`.
pub fn work_id(author_name: &str, title: &str) -> Uuid {
  content_id(&format!("{author_name}_{title}"))
}

/// Identity of a lexical entry, keyed by `"<lemma rich> <translation>"`.
pub fn word_id(lemma_rich: &str, translation: &str) -> Uuid {
  content_id(&format!("{lemma_rich} {translation}"))
}
