//! Capability traits for the external collaborators the matcher depends on.
//!
//! Both are treated as opaque, possibly slow calls. Implementations report
//! failures as [`Error::CollaboratorUnavailable`](crate::Error) so callers can
//! tell "could not look" apart from "looked and found nothing".

use crate::Result;
use async_trait::async_trait;

/// Turns text into a fixed-length embedding vector.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Produces free text from a system prompt and a user prompt.
#[async_trait]
pub trait Paraphraser: Send + Sync {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;
}
