//! # Incremental call intake core
//!
//! Live emergency calls arrive as audio chunks tagged with a session id.
//! Each chunk is transcribed, folded into the session's transcript, run
//! through structured extraction, and merged monotonically into a canonical
//! record: once a field is known it never goes blank again, and later
//! chunks refine rather than erase. Sessions end by explicit finalize
//! (drain, snapshot, persist) or by the idle sweep.
//!
//! All external collaborators (transcription, extraction, persistence, live
//! updates) sit behind traits and are injected into the [`ChunkPipeline`].

mod error;
mod pipeline;
mod registry;
mod services;
mod session;
mod snapshot;

pub use error::*;
pub use pipeline::{ChunkPipeline, ChunkPipelineBuilder};
pub use services::*;
pub use snapshot::*;

pub use tiqn_canonical::CanonicalRecord;
