//! # faqx Providers
//!
//! HTTP implementations of the [`Embedder`](faqx_core::Embedder) and
//! [`Paraphraser`](faqx_core::Paraphraser) seams for OpenAI-compatible APIs,
//! with bounded retries on transient failures.

pub mod openai;
pub mod retry;

pub use openai::{
    OpenAiClient, OpenAiConfig, DEFAULT_BASE_URL, DEFAULT_CHAT_MODEL, DEFAULT_EMBEDDING_MODEL,
};
pub use retry::{retry_with_backoff, CallFailure, RetryConfig};
