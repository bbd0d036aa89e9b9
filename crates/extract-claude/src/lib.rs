//! Structured field extraction with Claude over the Messages API.
//!
//! Each call sends one transcript fragment plus the fields already known,
//! and expects back a full-shape JSON record where only newly mentioned
//! fields are non-empty. Responses wrapped in markdown fences or prose are
//! recovered by slicing out the outermost JSON object.

mod client;
mod error;
mod prompt;

pub use client::*;
pub use error::*;
