//! Error types for `vocab-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("author name must not be empty")]
  EmptyAuthorName,

  #[error("work title must not be empty")]
  EmptyTitle,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
