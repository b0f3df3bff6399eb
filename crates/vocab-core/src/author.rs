//! Authors, each owning zero or more works.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted author. Authors are never hard-deleted; `deleted_at` is set
/// when their last live work is removed and cleared on the next upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
  /// Derived from `name` via [`crate::identity::author_id`].
  pub author_id:   Uuid,
  pub name:        String,
  pub created_at:  DateTime<Utc>,
  pub modified_at: DateTime<Utc>,
  pub deleted_at:  Option<DateTime<Utc>>,
}

impl Author {
  pub fn is_deleted(&self) -> bool { self.deleted_at.is_some() }
}
