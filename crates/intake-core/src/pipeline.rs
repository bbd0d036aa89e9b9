use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tracing::Instrument;

use crate::error::{Error, Result};
use crate::registry::SessionRegistry;
use crate::services::{ExtractService, LiveUpdateSink, PersistService, TranscribeService};
use crate::snapshot::{ChunkSnapshot, FinalizedCall, SaveOutcome};

const DEFAULT_CHUNK_TIMEOUT: Duration = Duration::from_secs(30);

/// Drives the per-chunk workflow: transcribe, accumulate, extract, merge,
/// snapshot. One pipeline serves any number of concurrent call sessions;
/// within a session, chunks are applied strictly in arrival order.
pub struct ChunkPipeline {
    registry: SessionRegistry,
    transcribe: Arc<dyn TranscribeService>,
    extract: Arc<dyn ExtractService>,
    persist: Arc<dyn PersistService>,
    live_updates: Option<Arc<dyn LiveUpdateSink>>,
    chunk_timeout: Duration,
}

impl ChunkPipeline {
    pub fn builder() -> ChunkPipelineBuilder {
        ChunkPipelineBuilder::default()
    }

    /// Processes one audio chunk for `session_id`, creating the session on
    /// first contact. Collaborator failures degrade to "no new information
    /// this chunk"; every call with a non-empty id yields a snapshot.
    pub async fn process_chunk(&self, session_id: &str, audio: Bytes) -> Result<ChunkSnapshot> {
        if session_id.is_empty() {
            return Err(Error::EmptySessionId);
        }

        let span = session_span(session_id);
        async {
            let slot = self.registry.get_or_create(session_id).await;
            let mut session = slot.lock().await;

            let chunk_text = match tokio::time::timeout(
                self.chunk_timeout,
                self.transcribe.transcribe(audio),
            )
            .await
            {
                Ok(Ok(text)) => text,
                Ok(Err(err)) => {
                    tracing::warn!(error = %err, "transcription_failed");
                    String::new()
                }
                Err(_) => {
                    tracing::warn!(timeout = ?self.chunk_timeout, "transcription_timed_out");
                    String::new()
                }
            };

            if chunk_text.trim().is_empty() {
                tracing::debug!("chunk_without_speech");
                return Ok(session.apply_chunk("", None));
            }

            let partial = match tokio::time::timeout(
                self.chunk_timeout,
                self.extract.extract(&chunk_text, session.record()),
            )
            .await
            {
                Ok(Ok(partial)) => Some(partial),
                Ok(Err(err)) => {
                    tracing::warn!(error = %err, "extraction_failed");
                    None
                }
                Err(_) => {
                    tracing::warn!(timeout = ?self.chunk_timeout, "extraction_timed_out");
                    None
                }
            };

            let snapshot = session.apply_chunk(&chunk_text, partial.as_ref());
            drop(session);

            if let Some(sink) = &self.live_updates
                && let Err(err) = sink.update(&snapshot).await
            {
                tracing::warn!(error = %err, "live_update_failed");
            }

            Ok(snapshot)
        }
        .instrument(span)
        .await
    }

    /// Read-only view of a live session. Waits for any in-flight chunk so
    /// the caller never sees a half-applied update.
    pub async fn session_snapshot(&self, session_id: &str) -> Option<ChunkSnapshot> {
        let slot = self.registry.get(session_id).await?;
        let session = slot.lock().await;
        Some(session.snapshot(""))
    }

    pub async fn active_count(&self) -> usize {
        self.registry.active_count().await
    }

    /// Ends the session: removes it from the registry, drains any in-flight
    /// chunk, persists the final snapshot, and returns both the snapshot and
    /// the save outcome. A second finalize for the same id fails with
    /// `UnknownSession`. A save failure is reported in the outcome; the
    /// session is gone either way.
    pub async fn finalize(&self, session_id: &str) -> Result<FinalizedCall> {
        if session_id.is_empty() {
            return Err(Error::EmptySessionId);
        }

        let span = session_span(session_id);
        async {
            let slot = self
                .registry
                .remove(session_id)
                .await
                .ok_or_else(|| Error::UnknownSession(session_id.to_string()))?;

            let session = slot.lock().await;
            let snapshot = session.snapshot("");
            drop(session);

            let outcome = self.save_snapshot(&snapshot).await;
            match &outcome {
                SaveOutcome::Saved(receipt) => {
                    tracing::info!(record_id = %receipt.record_id, "call_saved");
                }
                SaveOutcome::Failed(reason) => {
                    tracing::error!(%reason, "final_save_failed");
                }
            }

            Ok(FinalizedCall { snapshot, outcome })
        }
        .instrument(span)
        .await
    }

    /// Sweeps sessions idle past `max_idle`, offering each evicted snapshot
    /// to the persistence collaborator before returning it. Meant to be
    /// driven by a caller-owned interval.
    pub async fn evict_idle(&self, max_idle: Duration) -> Vec<(String, ChunkSnapshot)> {
        let evicted = self.registry.evict_idle(max_idle).await;

        for (session_id, snapshot) in &evicted {
            tracing::warn!(%session_id, "session_evicted_idle");
            if let SaveOutcome::Failed(reason) = self.save_snapshot(snapshot).await {
                tracing::warn!(%session_id, %reason, "evicted_save_failed");
            }
        }

        evicted
    }

    async fn save_snapshot(&self, snapshot: &ChunkSnapshot) -> SaveOutcome {
        match tokio::time::timeout(self.chunk_timeout, self.persist.save(snapshot)).await {
            Ok(Ok(receipt)) => SaveOutcome::Saved(receipt),
            Ok(Err(err)) => SaveOutcome::Failed(err.to_string()),
            Err(_) => SaveOutcome::Failed("persistence call timed out".to_string()),
        }
    }
}

#[derive(Default)]
pub struct ChunkPipelineBuilder {
    transcribe: Option<Arc<dyn TranscribeService>>,
    extract: Option<Arc<dyn ExtractService>>,
    persist: Option<Arc<dyn PersistService>>,
    live_updates: Option<Arc<dyn LiveUpdateSink>>,
    chunk_timeout: Option<Duration>,
}

impl ChunkPipelineBuilder {
    pub fn transcribe(mut self, service: Arc<dyn TranscribeService>) -> Self {
        self.transcribe = Some(service);
        self
    }

    pub fn extract(mut self, service: Arc<dyn ExtractService>) -> Self {
        self.extract = Some(service);
        self
    }

    pub fn persist(mut self, service: Arc<dyn PersistService>) -> Self {
        self.persist = Some(service);
        self
    }

    pub fn live_updates(mut self, sink: Arc<dyn LiveUpdateSink>) -> Self {
        self.live_updates = Some(sink);
        self
    }

    /// Upper bound for each collaborator call. A call past the bound is
    /// treated as failed, not awaited further.
    pub fn chunk_timeout(mut self, timeout: Duration) -> Self {
        self.chunk_timeout = Some(timeout);
        self
    }

    pub fn build(self) -> ChunkPipeline {
        ChunkPipeline {
            registry: SessionRegistry::new(),
            transcribe: self.transcribe.expect("transcribe service is required"),
            extract: self.extract.expect("extract service is required"),
            persist: self.persist.expect("persist service is required"),
            live_updates: self.live_updates,
            chunk_timeout: self.chunk_timeout.unwrap_or(DEFAULT_CHUNK_TIMEOUT),
        }
    }
}

fn session_span(session_id: &str) -> tracing::Span {
    tracing::info_span!("session", session_id = %session_id)
}
