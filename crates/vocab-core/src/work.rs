//! A work: a single uploaded text by a single author.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, identity};

/// A persisted work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Work {
  /// Derived from `(author name, title)` via [`identity::work_id`].
  pub work_id:     Uuid,
  pub author_id:   Uuid,
  pub author_name: String,
  pub title:       String,
  pub created_at:  DateTime<Utc>,
  pub modified_at: DateTime<Utc>,
  pub deleted_at:  Option<DateTime<Utc>>,
}

/// The author/title pair submitted alongside an upload.
///
/// Both strings are trimmed; identities are derived from the trimmed values so
/// incidental whitespace in a form field never forks an author or a work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWork {
  author: String,
  title:  String,
}

impl NewWork {
  pub fn new(author: impl AsRef<str>, title: impl AsRef<str>) -> Result<Self> {
    let author = author.as_ref().trim();
    let title = title.as_ref().trim();
    if author.is_empty() {
      return Err(Error::EmptyAuthorName);
    }
    if title.is_empty() {
      return Err(Error::EmptyTitle);
    }
    Ok(Self { author: author.to_owned(), title: title.to_owned() })
  }

  pub fn author(&self) -> &str { &self.author }

  pub fn title(&self) -> &str { &self.title }

  pub fn author_id(&self) -> Uuid { identity::author_id(&self.author) }

  pub fn work_id(&self) -> Uuid { identity::work_id(&self.author, &self.title) }
}
