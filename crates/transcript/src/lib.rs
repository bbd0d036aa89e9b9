//! # Chunk Transcript Accumulator
//!
//! Transcribed chunk texts arrive one at a time over the life of a call and
//! are folded into a single running transcript. The chunk sequence is the
//! source of truth; the full text is always the ordered chunks joined with a
//! single space, so replaying the same chunks always yields the same text.
//!
//! Silence is a first-class input: transcription of a quiet chunk yields an
//! empty string, and appending it must leave the accumulator untouched.

use std::time::Duration;

use tokio::time::Instant;

/// Accumulates transcribed chunk texts for one call session.
///
/// `append` folds a chunk into the running transcript and reports whether it
/// carried any speech. `full_text` is the space-joined chunk sequence,
/// `duration` the elapsed time since the first spoken chunk.
#[derive(Debug, Clone)]
pub struct TranscriptAccumulator {
    chunks: Vec<String>,
    full_text: String,
    first_chunk_at: Option<Instant>,
    last_update_at: Option<Instant>,
}

impl TranscriptAccumulator {
    pub fn new() -> Self {
        Self {
            chunks: Vec::new(),
            full_text: String::new(),
            first_chunk_at: None,
            last_update_at: None,
        }
    }

    /// Appends one transcribed chunk. Whitespace-only text is a no-op and
    /// returns `false`; the caller still holds a valid accumulator.
    pub fn append(&mut self, text: &str) -> bool {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return false;
        }

        let now = Instant::now();
        if self.first_chunk_at.is_none() {
            self.first_chunk_at = Some(now);
        }
        self.last_update_at = Some(now);

        if !self.full_text.is_empty() {
            self.full_text.push(' ');
        }
        self.full_text.push_str(trimmed);
        self.chunks.push(trimmed.to_string());
        true
    }

    pub fn full_text(&self) -> &str {
        &self.full_text
    }

    /// Chunk texts in arrival order. Only chunks that carried speech appear.
    pub fn chunks(&self) -> &[String] {
        &self.chunks
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Elapsed time since the first spoken chunk, zero before it.
    pub fn duration(&self) -> Duration {
        self.first_chunk_at
            .map(|at| at.elapsed())
            .unwrap_or_default()
    }

    pub fn last_update_at(&self) -> Option<Instant> {
        self.last_update_at
    }
}

impl Default for TranscriptAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_joins_chunks_with_single_space() {
        let mut acc = TranscriptAccumulator::new();

        assert!(acc.append("necesito una ambulancia"));
        assert!(acc.append("mi padre se desmayó"));

        assert_eq!(
            acc.full_text(),
            "necesito una ambulancia mi padre se desmayó"
        );
        assert_eq!(acc.chunk_count(), 2);
        assert_eq!(
            acc.chunks(),
            ["necesito una ambulancia", "mi padre se desmayó"]
        );
    }

    #[test]
    fn append_trims_chunk_edges() {
        let mut acc = TranscriptAccumulator::new();

        acc.append("  hola  ");
        acc.append("\nven rápido\t");

        assert_eq!(acc.full_text(), "hola ven rápido");
    }

    #[test]
    fn empty_append_is_a_no_op() {
        let mut acc = TranscriptAccumulator::new();

        acc.append("primer chunk");
        assert!(!acc.append(""));
        assert!(!acc.append("   \n\t"));

        assert_eq!(acc.full_text(), "primer chunk");
        assert_eq!(acc.chunk_count(), 1);
    }

    #[test]
    fn fresh_accumulator_is_empty() {
        let acc = TranscriptAccumulator::new();

        assert!(acc.is_empty());
        assert_eq!(acc.full_text(), "");
        assert_eq!(acc.chunk_count(), 0);
        assert!(acc.last_update_at().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn duration_zero_before_first_chunk() {
        let acc = TranscriptAccumulator::new();
        tokio::time::advance(Duration::from_secs(30)).await;
        assert_eq!(acc.duration(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn duration_counts_from_first_spoken_chunk() {
        let mut acc = TranscriptAccumulator::new();

        acc.append("");
        tokio::time::advance(Duration::from_secs(5)).await;

        acc.append("hola");
        tokio::time::advance(Duration::from_secs(12)).await;
        acc.append("me caí");

        assert_eq!(acc.duration(), Duration::from_secs(12));
    }

    #[tokio::test(start_paused = true)]
    async fn last_update_tracks_spoken_chunks_only() {
        let mut acc = TranscriptAccumulator::new();

        acc.append("hola");
        let first = acc.last_update_at().unwrap();

        tokio::time::advance(Duration::from_secs(3)).await;
        acc.append("   ");
        assert_eq!(acc.last_update_at(), Some(first));

        tokio::time::advance(Duration::from_secs(2)).await;
        acc.append("sigo aquí");
        assert_eq!(
            acc.last_update_at().unwrap() - first,
            Duration::from_secs(5)
        );
    }
}
