//! Chunk transcription over an OpenAI-compatible Whisper endpoint.
//!
//! Each audio chunk is uploaded as a multipart form and comes back as plain
//! text. Azure OpenAI deployments are the primary target, which is why
//! authentication uses the `api-key` header rather than a bearer token.

mod client;
mod error;

pub use client::*;
pub use error::*;
