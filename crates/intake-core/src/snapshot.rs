use serde::{Deserialize, Serialize};
use tiqn_canonical::CanonicalRecord;

/// Immutable view of a session after one processed chunk.
///
/// `chunk_count` counts every processed chunk, including silent ones;
/// `duration_seconds` is the span since the first spoken chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkSnapshot {
    pub session_id: String,
    pub chunk_text: String,
    pub full_transcript: String,
    pub canonical: CanonicalRecord,
    pub chunk_count: u64,
    pub duration_seconds: f64,
    pub timestamp: f64,
}

/// What finalize hands back: the last snapshot plus how persistence went.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalizedCall {
    pub snapshot: ChunkSnapshot,
    pub outcome: SaveOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SaveOutcome {
    Saved(SaveReceipt),
    Failed(String),
}

impl SaveOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveOutcome::Saved(_))
    }
}

/// Identifier assigned by the persistence collaborator for a saved call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveReceipt {
    pub record_id: String,
}
