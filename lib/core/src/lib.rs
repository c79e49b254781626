//! # faqx Core
//!
//! Core data structures for the faqx FAQ matching engine.
//!
//! - [`Catalog`] - Immutable table of curated question/answer pairs per product
//! - [`VectorIndex`] - Exhaustive Euclidean nearest-neighbour index over their embeddings
//! - [`KnowledgeBase`] - The two paired and validated, shared read-only
//! - [`Embedder`] / [`Paraphraser`] - Seams for the external model calls
//!
//! ## Example
//!
//! ```rust
//! use faqx_core::{Catalog, NeighborSearch, QaEntry, VectorIndex};
//!
//! let catalog = Catalog::from_entries(vec![
//!     QaEntry::new("P1", "Sea Kayak", "How long is the warranty?", "Two years."),
//!     QaEntry::new("P1", "Sea Kayak", "What is it made of?", "Polyethylene."),
//! ]).unwrap();
//!
//! let index = VectorIndex::from_rows(2, vec![vec![0.0, 0.0], vec![1.0, 1.0]]).unwrap();
//! assert_eq!(index.len(), catalog.len());
//!
//! let ranked = index.nearest(&[0.1, 0.0], index.len()).unwrap();
//! assert_eq!(ranked[0].ordinal, 0);
//! ```

pub mod catalog;
pub mod error;
pub mod index;
pub mod knowledge;
pub mod provider;

/// SIMD-optimized Euclidean distance
///
/// - AVX2/FMA on x86_64
/// - SSE on x86
/// - NEON on ARM64/Apple Silicon
pub mod simd;

pub use catalog::{Catalog, QaEntry};
pub use error::{Error, Result};
pub use index::{Neighbor, NeighborSearch, VectorIndex};
pub use knowledge::KnowledgeBase;
pub use provider::{Embedder, Paraphraser};

/// Embedding width produced by the default embedding model
pub const DEFAULT_EMBEDDING_DIM: usize = 1536;
