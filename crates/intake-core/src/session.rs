use std::time::{SystemTime, UNIX_EPOCH};

use tiqn_canonical::{CanonicalRecord, post_process};
use tiqn_transcript::TranscriptAccumulator;
use tokio::time::Instant;

use crate::snapshot::ChunkSnapshot;

/// State of one live call: the running transcript, the merged record, and
/// the activity instant the idle sweep reads.
pub(crate) struct CallSession {
    session_id: String,
    transcript: TranscriptAccumulator,
    record: CanonicalRecord,
    chunks_processed: u64,
    last_activity: Instant,
}

impl CallSession {
    pub(crate) fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            transcript: TranscriptAccumulator::new(),
            record: CanonicalRecord::default(),
            chunks_processed: 0,
            last_activity: Instant::now(),
        }
    }

    /// Folds one processed chunk into the session. `partial` is `None` when
    /// extraction produced nothing usable this chunk; the transcript still
    /// grows, the record stays as it was. Every call counts as activity,
    /// silent chunks included.
    pub(crate) fn apply_chunk(
        &mut self,
        chunk_text: &str,
        partial: Option<&CanonicalRecord>,
    ) -> ChunkSnapshot {
        self.chunks_processed += 1;
        self.last_activity = Instant::now();

        if self.transcript.append(chunk_text) && let Some(partial) = partial {
            self.record.merge_from(&partial.normalized());
            post_process(&mut self.record, chunk_text);
        }

        self.snapshot(chunk_text)
    }

    pub(crate) fn record(&self) -> &CanonicalRecord {
        &self.record
    }

    pub(crate) fn last_activity(&self) -> Instant {
        self.last_activity
    }

    pub(crate) fn snapshot(&self, chunk_text: &str) -> ChunkSnapshot {
        ChunkSnapshot {
            session_id: self.session_id.clone(),
            chunk_text: chunk_text.to_string(),
            full_transcript: self.transcript.full_text().to_string(),
            canonical: self.record.clone(),
            chunk_count: self.chunks_processed,
            duration_seconds: self.transcript.duration().as_secs_f64(),
            timestamp: unix_now(),
        }
    }
}

fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}
