use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use intake_core::{
    CanonicalRecord, ChunkPipeline, ChunkSnapshot, ExtractFuture, ExtractService, LiveUpdateSink,
    PersistService, SaveFuture, SaveReceipt, TranscribeFuture, TranscribeService, UpdateFuture,
};

/// Stands in for the transcription collaborator: the "audio" bytes of this
/// demo are already UTF-8 text.
struct ScriptTranscribe;

impl TranscribeService for ScriptTranscribe {
    fn transcribe(&self, audio: Bytes) -> TranscribeFuture<'_> {
        Box::pin(async move { Ok(String::from_utf8_lossy(&audio).into_owned()) })
    }
}

/// Keyword-driven extractor replaying what the real one would return for
/// this script.
struct ScriptExtract;

impl ExtractService for ScriptExtract {
    fn extract<'a>(
        &'a self,
        chunk_text: &'a str,
        _current: &'a CanonicalRecord,
    ) -> ExtractFuture<'a> {
        Box::pin(async move {
            let mut partial = CanonicalRecord::default();
            let lower = chunk_text.to_lowercase();

            if lower.contains("desmayó") {
                partial.motivo = "paciente desmayado".into();
                partial.codigo = "amarillo".into();
            }
            if lower.contains("apoquindo") {
                partial.direccion = "apoquindo".into();
                partial.numero = "3220".into();
                partial.depto = "departamento 45".into();
            }
            if lower.contains("juan pérez") {
                partial.nombre = "juan".into();
                partial.apellido = "pérez".into();
                partial.edad = "78 años".into();
                partial.sexo = "masculino".into();
            }
            if lower.contains("respira con dificultad") {
                partial.consciente = "sí".into();
                partial.respira = "sí".into();
                partial.estado_respiratorio = "respira".into();
            }

            Ok(partial)
        })
    }
}

struct StdoutPersist;

impl PersistService for StdoutPersist {
    fn save<'a>(&'a self, snapshot: &'a ChunkSnapshot) -> SaveFuture<'a> {
        Box::pin(async move {
            eprintln!(
                "[persist] saving session={} chunks={} fields={}",
                snapshot.session_id,
                snapshot.chunk_count,
                snapshot.canonical.filled_fields().len()
            );
            Ok(SaveReceipt {
                record_id: uuid::Uuid::new_v4().to_string(),
            })
        })
    }
}

struct StderrSink;

impl LiveUpdateSink for StderrSink {
    fn update<'a>(&'a self, snapshot: &'a ChunkSnapshot) -> UpdateFuture<'a> {
        Box::pin(async move {
            eprintln!(
                "[live] session={} codigo={} comuna={}",
                snapshot.session_id, snapshot.canonical.codigo, snapshot.canonical.comuna
            );
            Ok(())
        })
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let pipeline = ChunkPipeline::builder()
        .transcribe(Arc::new(ScriptTranscribe))
        .extract(Arc::new(ScriptExtract))
        .persist(Arc::new(StdoutPersist))
        .live_updates(Arc::new(StderrSink))
        .chunk_timeout(Duration::from_secs(10))
        .build();

    let session_id = uuid::Uuid::new_v4().to_string();
    eprintln!("Replaying scripted call as session {session_id}");
    eprintln!();

    let chunks: &[&str] = &[
        "Necesito una ambulancia, mi padre se desmayó",
        "Estamos en Apoquindo 3220, departamento 45",
        "",
        "Se llama Juan Pérez y tiene 78 años",
        "Está consciente pero respira con dificultad",
    ];

    for chunk in chunks {
        let snapshot = pipeline
            .process_chunk(&session_id, Bytes::from_static(chunk.as_bytes()))
            .await
            .expect("chunk processing failed");

        println!(
            "{}",
            serde_json::to_string_pretty(&snapshot).unwrap_or_default()
        );
        println!();
    }

    let finalized = pipeline
        .finalize(&session_id)
        .await
        .expect("finalize failed");

    eprintln!();
    eprintln!(
        "Call finished: {} chunks, saved={}",
        finalized.snapshot.chunk_count,
        finalized.outcome.is_saved()
    );
}
