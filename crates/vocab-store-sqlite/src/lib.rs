//! SQLite backend for the vocabularium corpus.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Multi-table writes run inside a single
//! SQLite transaction on that thread.

mod encode;
mod persist;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
