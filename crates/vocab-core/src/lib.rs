//! Core types and trait definitions for the vocabularium corpus.
//!
//! This crate is deliberately free of HTTP, subprocess and database
//! dependencies. The text pipeline produces the `New*` types defined here and
//! storage backends implement [`store::CorpusStore`] over them.

#![allow(async_fn_in_trait)]

pub mod author;
pub mod error;
pub mod identity;
pub mod occurrence;
pub mod store;
pub mod word;
pub mod wordlist;
pub mod work;

pub use error::{Error, Result};
