//! # faqx
//!
//! A product FAQ matching engine: given a customer question about one
//! product, find the curated question/answer pair it is asking about and
//! reply conversationally, or fall back to a fixed reply.
//!
//! A question is answered in two gates. The nearest catalog entry of the
//! requested product (by Euclidean distance between embeddings) must lie
//! within a distance threshold, and its question text must be lexically
//! close to the query. Only then is the curated answer paraphrased.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! export OPENAI_API_KEY=...
//! faqx --catalog qa_data.csv --index qa_embeddings.ann serve --port 8080
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use faqx::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let knowledge = load_knowledge_base(&StorageConfig::new("qa_data.csv", "qa_embeddings.ann"))?;
//! let client = Arc::new(OpenAiClient::new(OpenAiConfig::default().with_api_key("sk-..."))?);
//!
//! let assistant = FaqAssistant::new(
//!     FaqMatcher::new(knowledge, client.clone()),
//!     AnswerComposer::new(client),
//! );
//! let answer = assistant.answer("How long is the warranty?", "P1").await?;
//! println!("{}", answer.text);
//! # Ok(())
//! # }
//! ```
//!
//! ## Crate Structure
//!
//! - [`faqx-core`](faqx_core) - Catalog, vector index, error type, collaborator traits
//! - [`faqx-similarity`](faqx_similarity) - Matching engine, lexical ratio, answer composer
//! - [`faqx-storage`](faqx_storage) - CSV catalog and index artifact loading
//! - [`faqx-providers`](faqx_providers) - OpenAI-compatible embedder and paraphraser
//! - [`faqx-api`](faqx_api) - REST API

// Re-export core types
pub use faqx_core::{
    Catalog, Embedder, Error, KnowledgeBase, Neighbor, NeighborSearch, Paraphraser, QaEntry,
    Result, VectorIndex, DEFAULT_EMBEDDING_DIM,
};

// Re-export the engine
pub use faqx_similarity::{
    sequence_ratio, text_similarity, Answer, AnswerComposer, FaqAssistant, FaqMatch, FaqMatcher,
    MatchOptions, FALLBACK_ANSWER,
};

// Re-export storage
pub use faqx_storage::{load_index, load_knowledge_base, save_index, StorageConfig};

// Re-export providers
pub use faqx_providers::{OpenAiClient, OpenAiConfig, RetryConfig};

// Re-export API
pub use faqx_api::RestApi;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        load_knowledge_base, Answer, AnswerComposer, Catalog, Error, FaqAssistant, FaqMatcher,
        KnowledgeBase, MatchOptions, NeighborSearch, OpenAiClient, OpenAiConfig, QaEntry, Result,
        RestApi, StorageConfig, VectorIndex,
    };
}

/// SIMD-optimized vector operations
pub mod simd {
    pub use faqx_core::simd::{l2_distance_simd, squared_l2_simd};
}
