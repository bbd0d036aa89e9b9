use serde::{Deserialize, Serialize};
use tiqn_canonical::CanonicalRecord;
use tiqn_intake_core::{ExtractFuture, ExtractService};

use crate::error::Error;
use crate::prompt;

const DEFAULT_API_BASE: &str = "https://api.anthropic.com";
const DEFAULT_MODEL: &str = "claude-3-5-haiku-latest";
const DEFAULT_MAX_TOKENS: u32 = 2048;

const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

/// Messages API client tuned for deterministic extraction: temperature 0,
/// one user turn per fragment.
#[derive(Debug, Clone)]
pub struct ClaudeExtractor {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl ClaudeExtractor {
    pub fn builder() -> ClaudeExtractorBuilder {
        ClaudeExtractorBuilder::default()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    async fn request(
        &self,
        chunk_text: &str,
        current: &CanonicalRecord,
    ) -> Result<CanonicalRecord, Error> {
        let user_prompt = prompt::build_user_prompt(chunk_text, current);
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            temperature: 0.0,
            system: prompt::SYSTEM_PROMPT,
            messages: vec![Message {
                role: "user",
                content: &user_prompt,
            }],
        };

        let url = format!("{}/v1/messages", self.api_base.trim_end_matches('/'));
        let response = self
            .client
            .post(url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api { status, body });
        }

        let parsed: MessagesResponse = response.json().await?;
        let reply = parsed
            .content
            .first()
            .map(|block| block.text.as_str())
            .unwrap_or_default();

        prompt::parse_record(reply).ok_or(Error::MissingJson)
    }
}

impl ExtractService for ClaudeExtractor {
    fn extract<'a>(
        &'a self,
        chunk_text: &'a str,
        current: &'a CanonicalRecord,
    ) -> ExtractFuture<'a> {
        Box::pin(async move { Ok(self.request(chunk_text, current).await?) })
    }
}

#[derive(Default)]
pub struct ClaudeExtractorBuilder {
    api_base: Option<String>,
    api_key: Option<String>,
    model: Option<String>,
    max_tokens: Option<u32>,
}

impl ClaudeExtractorBuilder {
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

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn build(self) -> ClaudeExtractor {
        ClaudeExtractor {
            client: reqwest::Client::new(),
            api_base: self
                .api_base
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            api_key: self.api_key.expect("api_key is required"),
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_tokens: self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        }
    }
}
