use std::future::Future;
use std::pin::Pin;

use tiqn_canonical::CanonicalRecord;

use crate::error::ServiceError;
use crate::snapshot::{ChunkSnapshot, SaveReceipt};

pub type TranscribeFuture<'a> =
    Pin<Box<dyn Future<Output = Result<String, ServiceError>> + Send + 'a>>;
pub type ExtractFuture<'a> =
    Pin<Box<dyn Future<Output = Result<CanonicalRecord, ServiceError>> + Send + 'a>>;
pub type SaveFuture<'a> =
    Pin<Box<dyn Future<Output = Result<SaveReceipt, ServiceError>> + Send + 'a>>;
pub type UpdateFuture<'a> = Pin<Box<dyn Future<Output = Result<(), ServiceError>> + Send + 'a>>;

/// Turns one raw audio chunk into text. An empty string is a valid result
/// (silence or noise); language and domain hints are construction-time
/// configuration, not per-call arguments.
pub trait TranscribeService: Send + Sync {
    fn transcribe(&self, audio: bytes::Bytes) -> TranscribeFuture<'_>;
}

/// Extracts structured call data from one transcribed chunk.
///
/// `current` is the session's record so far, passed as context so the
/// extractor can avoid re-stating known fields. The result must be a
/// full-shape record with empty strings for everything the chunk did not
/// mention; it is treated as best-effort and merged monotonically.
pub trait ExtractService: Send + Sync {
    fn extract<'a>(
        &'a self,
        chunk_text: &'a str,
        current: &'a CanonicalRecord,
    ) -> ExtractFuture<'a>;
}

/// Stores a finished call. Invoked once at finalize, and best-effort for
/// sessions swept by idle eviction.
pub trait PersistService: Send + Sync {
    fn save<'a>(&'a self, snapshot: &'a ChunkSnapshot) -> SaveFuture<'a>;
}

/// Optional per-chunk observer for live operator views. Errors are logged
/// and never fail the chunk.
pub trait LiveUpdateSink: Send + Sync {
    fn update<'a>(&'a self, snapshot: &'a ChunkSnapshot) -> UpdateFuture<'a>;
}
