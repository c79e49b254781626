//! Embedder and paraphraser backed by any OpenAI-compatible HTTP API.

use crate::retry::{retry_with_backoff, CallFailure, RetryConfig};
use async_trait::async_trait;
use faqx_core::{Embedder, Error, Paraphraser, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-ada-002";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4";

const EMBEDDER: &str = "embedder";
const PARAPHRASER: &str = "paraphraser";

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// e.g. "https://api.openai.com/v1"
    pub base_url: String,
    /// Sent as a bearer token when present
    pub api_key: Option<String>,
    pub embedding_model: String,
    pub chat_model: String,
    /// Per-request timeout
    pub timeout: Duration,
    pub retry: RetryConfig,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            timeout: Duration::from_secs(30),
            retry: RetryConfig::default(),
        }
    }
}

impl OpenAiConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        let key = api_key.into();
        self.api_key = if key.is_empty() { None } else { Some(key) };
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: [&'a str; 1],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// Pull the first embedding out of an `/embeddings` response body.
pub fn parse_embedding(body: &str) -> std::result::Result<Vec<f32>, String> {
    let response: EmbeddingResponse =
        serde_json::from_str(body).map_err(|e| format!("unexpected embeddings payload: {}", e))?;
    let vector = response
        .data
        .into_iter()
        .next()
        .map(|d| d.embedding)
        .ok_or_else(|| "embeddings payload has no data".to_string())?;
    if vector.is_empty() {
        return Err("embeddings payload holds an empty vector".to_string());
    }
    Ok(vector)
}

/// Pull the first choice's text out of a `/chat/completions` response body.
pub fn parse_completion(body: &str) -> std::result::Result<String, String> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| format!("unexpected completion payload: {}", e))?;
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| "completion payload has no content".to_string())
}

/// Throttling and server errors are retried, other client errors are not.
pub fn classify_status(status: u16, body: &str) -> CallFailure {
    let message = format!("HTTP {}: {}", status, truncate(body, 200));
    if status == 429 || status >= 500 {
        CallFailure::transient(message)
    } else {
        CallFailure::permanent(message)
    }
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// One HTTP client serving both the embedding and the chat collaborator.
pub struct OpenAiClient {
    config: OpenAiConfig,
    client: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::InvalidConfig(format!("cannot build HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// POST `body` as JSON and decode the reply with `parse`, retrying transient failures.
    async fn post<B, T>(
        &self,
        collaborator: &'static str,
        path: &str,
        body: &B,
        parse: fn(&str) -> std::result::Result<T, String>,
    ) -> Result<T>
    where
        B: Serialize + Sync,
        T: Send,
    {
        let url = self.endpoint(path);
        let outcome = retry_with_backoff(
            || self.post_once(&url, body, parse),
            &self.config.retry,
        )
        .await;
        outcome.map_err(|failure| Error::collaborator(collaborator, failure.message))
    }

    async fn post_once<B, T>(
        &self,
        url: &str,
        body: &B,
        parse: fn(&str) -> std::result::Result<T, String>,
    ) -> std::result::Result<T, CallFailure>
    where
        B: Serialize + Sync,
    {
        let mut request = self.client.post(url).json(body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| CallFailure::transient(format!("request to {} failed: {}", url, e)))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| CallFailure::transient(format!("reading response failed: {}", e)))?;

        if !status.is_success() {
            return Err(classify_status(status.as_u16(), &text));
        }
        parse(&text).map_err(CallFailure::permanent)
    }
}

#[async_trait]
impl Embedder for OpenAiClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbeddingRequest {
            model: &self.config.embedding_model,
            input: [text],
        };
        let vector = self
            .post(EMBEDDER, "/embeddings", &request, parse_embedding)
            .await?;
        debug!("Embedded {} chars into {} dimensions", text.len(), vector.len());
        Ok(vector)
    }
}

#[async_trait]
impl Paraphraser for OpenAiClient {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.config.chat_model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
        };
        self.post(PARAPHRASER, "/chat/completions", &request, parse_completion)
            .await
    }
}
