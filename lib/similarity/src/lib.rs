//! # faqx Similarity
//!
//! The FAQ matching engine and the answer composer built on top of it.
//!
//! ## How a question is answered
//!
//! 1. The query is embedded by the configured [`Embedder`](faqx_core::Embedder)
//! 2. Every catalog entry is ranked by Euclidean distance to the query
//! 3. The nearest entry belonging to the requested product is validated:
//!    distance must not exceed the threshold and the lowercase sequence
//!    ratio between query and question must reach the minimum
//! 4. A validated pair is rephrased by the [`Paraphraser`](faqx_core::Paraphraser);
//!    anything else yields a fixed fallback reply
//!
//! ```text
//! ┌─────────┐     ┌────────────┐     ┌────────────┐     ┌────────────┐
//! │  Query  │────>│  Embedder  │────>│ Full index │────>│  Product   │
//! │         │     │            │     │    scan    │     │   filter   │
//! └─────────┘     └────────────┘     └────────────┘     └─────┬──────┘
//!                                                             │
//!                                    ┌────────────┐     ┌─────┴──────┐
//!                                    │  Composer  │<────│ Distance + │
//!                                    │            │     │ text gates │
//!                                    └────────────┘     └────────────┘
//! ```

pub mod assistant;
pub mod composer;
pub mod matcher;
pub mod sequence;

#[cfg(test)]
mod testing;

pub use assistant::{Answer, FaqAssistant};
pub use composer::{build_prompt, AnswerComposer, FALLBACK_ANSWER, SYSTEM_PROMPT};
pub use matcher::{
    FaqMatch, FaqMatcher, MatchOptions, DEFAULT_MIN_TEXT_SIMILARITY, DEFAULT_THRESHOLD,
};
pub use sequence::{sequence_ratio, text_similarity};
