use bytes::Bytes;
use serde::Deserialize;
use tiqn_intake_core::{TranscribeFuture, TranscribeService};

use crate::error::Error;

const DEFAULT_MODEL: &str = "whisper-1";
const DEFAULT_LANGUAGE: &str = "es";

const UPLOAD_FILENAME: &str = "audio.webm";
const UPLOAD_MIME: &str = "audio/webm";

/// Sent with every request so the model favors emergency vocabulary and
/// Región Metropolitana place names over generic Spanish.
const DOMAIN_PROMPT: &str = "Contexto: Servicio de emergencias Hatzalah Chile. El audio describe una emergencia y datos del paciente o solicitante. Usa español de Chile. Reconoce nombres y direcciones típicas de Santiago de Chile y comunas de la Región Metropolitana.";

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    #[serde(default)]
    text: String,
}

/// HTTP client for one Whisper transcription deployment.
#[derive(Debug, Clone)]
pub struct WhisperClient {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
    language: String,
    prompt: String,
}

impl WhisperClient {
    pub fn builder() -> WhisperClientBuilder {
        WhisperClientBuilder::default()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    async fn request(&self, audio: Bytes) -> Result<String, Error> {
        let file = reqwest::multipart::Part::stream(audio)
            .file_name(UPLOAD_FILENAME)
            .mime_str(UPLOAD_MIME)?;

        let form = reqwest::multipart::Form::new()
            .part("file", file)
            .text("model", self.model.clone())
            .text("language", self.language.clone())
            .text("response_format", "json")
            .text("prompt", self.prompt.clone());

        let response = self
            .client
            .post(&self.api_base)
            .header("api-key", &self.api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api { status, body });
        }

        let parsed: TranscriptionResponse = response.json().await?;
        Ok(parsed.text)
    }
}

impl TranscribeService for WhisperClient {
    fn transcribe(&self, audio: Bytes) -> TranscribeFuture<'_> {
        Box::pin(async move { Ok(self.request(audio).await?) })
    }
}

#[derive(Default)]
pub struct WhisperClientBuilder {
    api_base: Option<String>,
    api_key: Option<String>,
    model: Option<String>,
    language: Option<String>,
    prompt: Option<String>,
}

impl WhisperClientBuilder {
    pub fn api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn build(self) -> WhisperClient {
        WhisperClient {
            client: reqwest::Client::new(),
            api_base: self.api_base.expect("api_base is required"),
            api_key: self.api_key.expect("api_key is required"),
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            language: self
                .language
                .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            prompt: self.prompt.unwrap_or_else(|| DOMAIN_PROMPT.to_string()),
        }
    }
}
