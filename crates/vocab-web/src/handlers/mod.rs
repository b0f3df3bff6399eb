//! axum handlers, one module per resource.

pub mod upload;
pub mod words;
pub mod works;
