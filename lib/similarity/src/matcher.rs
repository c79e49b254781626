//! FAQ matching engine
//!
//! Embeds the query, ranks every catalog entry by Euclidean distance, and
//! validates the nearest entry belonging to the requested product with two
//! gates: a distance ceiling and a minimum lexical similarity.

use crate::sequence::text_similarity;
use faqx_core::{Embedder, Error, KnowledgeBase, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Maximum accepted Euclidean distance. Distances are widened to `f64`
/// before the comparison, so `0.55f32` (just above 0.55) is rejected.
pub const DEFAULT_THRESHOLD: f64 = 0.55;

/// Minimum accepted lexical similarity between query and question
pub const DEFAULT_MIN_TEXT_SIMILARITY: f32 = 0.5;

/// Acceptance parameters for a match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchOptions {
    /// Requested number of matches. Only the single best in-product
    /// candidate is ever evaluated, so values above 1 behave like 1.
    pub top_k: usize,
    /// Candidates farther than this are rejected; equal is accepted.
    pub threshold: f64,
    /// Candidates whose question is less similar than this are rejected.
    pub min_text_similarity: f32,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            top_k: 1,
            threshold: DEFAULT_THRESHOLD,
            min_text_similarity: DEFAULT_MIN_TEXT_SIMILARITY,
        }
    }
}

impl MatchOptions {
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_min_text_similarity(mut self, min_text_similarity: f32) -> Self {
        self.min_text_similarity = min_text_similarity;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(Error::InvalidConfig("top_k must be at least 1".to_string()));
        }
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "threshold must be a non-negative number, got {}",
                self.threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.min_text_similarity) {
            return Err(Error::InvalidConfig(format!(
                "min_text_similarity must be within [0, 1], got {}",
                self.min_text_similarity
            )));
        }
        Ok(())
    }

    #[inline]
    fn accepts(&self, distance: f32, similarity: f32) -> bool {
        f64::from(distance) <= self.threshold && similarity >= self.min_text_similarity
    }
}

/// A validated catalog entry for the requested product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FaqMatch {
    pub ordinal: usize,
    pub product_id: String,
    pub question: String,
    pub answer: String,
    pub distance: f32,
    pub text_similarity: f32,
}

/// Turns a (query, product) pair into a validated match or `None`.
pub struct FaqMatcher {
    knowledge: KnowledgeBase,
    embedder: Arc<dyn Embedder>,
    options: MatchOptions,
}

impl FaqMatcher {
    pub fn new(knowledge: KnowledgeBase, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            knowledge,
            embedder,
            options: MatchOptions::default(),
        }
    }

    pub fn with_options(mut self, options: MatchOptions) -> Result<Self> {
        options.validate()?;
        self.options = options;
        Ok(self)
    }

    pub fn options(&self) -> &MatchOptions {
        &self.options
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    /// Match with the configured options.
    pub async fn find_match(&self, query: &str, product_id: &str) -> Result<Option<FaqMatch>> {
        self.find_match_with(query, product_id, &self.options).await
    }

    /// Match with explicit options.
    ///
    /// The query is embedded first, so an embedding failure surfaces as
    /// [`Error::CollaboratorUnavailable`] even for an unknown product. Unknown
    /// products never reach the index.
    ///
    /// Only the nearest entry of the product is validated. If it fails either
    /// gate the result is `None`, even when a farther entry of the same
    /// product would have passed.
    pub async fn find_match_with(
        &self,
        query: &str,
        product_id: &str,
        options: &MatchOptions,
    ) -> Result<Option<FaqMatch>> {
        options.validate()?;

        let embedding = self.embedder.embed(query).await?;
        let index = self.knowledge.index();
        if embedding.len() != index.dim() {
            return Err(Error::InvalidDimension {
                expected: index.dim(),
                actual: embedding.len(),
            });
        }
        if embedding.iter().any(|v| !v.is_finite()) {
            return Err(Error::collaborator("embedder", "non-finite embedding"));
        }

        let catalog = self.knowledge.catalog();
        let candidates = match catalog.candidates(product_id) {
            Some(ordinals) if !ordinals.is_empty() => ordinals,
            Some(_) => {
                warn!("Product {:?} is known but has no catalog entries", product_id);
                return Ok(None);
            }
            None => {
                debug!("Unknown product {:?}, skipping vector search", product_id);
                return Ok(None);
            }
        };

        let ranked = index.nearest(&embedding, catalog.len())?;

        // Candidate ordinals are collected in dataset order, so they are sorted
        let Some(nearest) = ranked
            .into_iter()
            .find(|n| candidates.binary_search(&n.ordinal).is_ok())
        else {
            debug!("No neighbour belongs to product {:?}", product_id);
            return Ok(None);
        };

        let Some(entry) = catalog.entry(nearest.ordinal) else {
            return Err(Error::MalformedIndex(format!(
                "neighbour {} has no catalog entry",
                nearest.ordinal
            )));
        };

        let similarity = text_similarity(query, &entry.question);
        if !options.accepts(nearest.distance, similarity) {
            debug!(
                "Rejected entry {} for product {:?}: distance {:.4} (max {}), similarity {:.4} (min {})",
                nearest.ordinal,
                product_id,
                nearest.distance,
                options.threshold,
                similarity,
                options.min_text_similarity
            );
            return Ok(None);
        }

        debug!(
            "Matched entry {} for product {:?}: distance {:.4}, similarity {:.4}",
            nearest.ordinal, product_id, nearest.distance, similarity
        );
        Ok(Some(FaqMatch {
            ordinal: nearest.ordinal,
            product_id: entry.product_id.clone(),
            question: entry.question.clone(),
            answer: entry.answer.clone(),
            distance: nearest.distance,
            text_similarity: similarity,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeEmbedder, ScriptedIndex};
    use faqx_core::{Catalog, NeighborSearch, QaEntry};

    fn catalog() -> Catalog {
        Catalog::from_entries(vec![
            QaEntry::new("P1", "Sea Kayak", "How long is the warranty?", "Two years."),
            QaEntry::new("P2", "Paddle", "How long is the warranty?", "One year."),
            QaEntry::new("P1", "Sea Kayak", "What colors are available?", "Red and yellow."),
            QaEntry::new("P1", "Sea Kayak", "abcd", "Letters."),
        ])
        .unwrap()
    }

    fn setup(distances: &[f32]) -> (FaqMatcher, Arc<ScriptedIndex>, Arc<FakeEmbedder>) {
        let index = Arc::new(ScriptedIndex::new(distances.to_vec()));
        let embedder = Arc::new(FakeEmbedder::new(index.dim()));
        let kb = KnowledgeBase::new(catalog(), index.clone()).unwrap();
        (FaqMatcher::new(kb, embedder.clone()), index, embedder)
    }

    #[tokio::test]
    async fn test_accepts_close_and_similar_candidate() {
        let (matcher, _, _) = setup(&[0.1, 0.05, 0.3, 0.9]);
        let found = matcher
            .find_match("how long is the warranty", "P1")
            .await
            .unwrap()
            .expect("match");

        // P2's entry is nearer but belongs to another product
        assert_eq!(found.ordinal, 0);
        assert_eq!(found.product_id, "P1");
        assert_eq!(found.answer, "Two years.");
        assert!((found.distance - 0.1).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_unknown_product_skips_index() {
        let (matcher, index, embedder) = setup(&[0.1, 0.1, 0.1, 0.1]);
        let found = matcher.find_match("anything", "P9").await.unwrap();

        assert!(found.is_none());
        assert_eq!(index.queries(), 0);
        assert_eq!(embedder.calls(), 1);
    }

    #[tokio::test]
    async fn test_distance_boundary() {
        // Entry 3 ("abcd") vs query "abef": similarity exactly 0.5
        let options = MatchOptions::default().with_threshold(0.5);
        let (matcher, _, _) = setup(&[0.9, 0.9, 0.9, 0.5]);
        let at_threshold = matcher.find_match_with("abef", "P1", &options).await.unwrap();
        assert!(at_threshold.is_some());

        let (matcher, _, _) = setup(&[0.9, 0.9, 0.9, 0.500_01]);
        let beyond = matcher.find_match_with("abef", "P1", &options).await.unwrap();
        assert!(beyond.is_none());
    }

    #[tokio::test]
    async fn test_default_threshold_compares_in_double_precision() {
        // 0.55f32 is 0.550000011920929, one ulp past the 0.55 ceiling
        let (matcher, _, _) = setup(&[0.9, 0.9, 0.9, 0.55]);
        assert!(matcher.find_match("abef", "P1").await.unwrap().is_none());

        let (matcher, _, _) = setup(&[0.9, 0.9, 0.9, 0.549_99]);
        assert!(matcher.find_match("abef", "P1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_similarity_boundary() {
        let (matcher, _, _) = setup(&[0.9, 0.9, 0.9, 0.2]);
        // 4/9 < 0.5
        assert!(matcher.find_match("abefg", "P1").await.unwrap().is_none());
        // exactly 0.5
        let found = matcher.find_match("ABEF", "P1").await.unwrap().expect("match");
        assert!((found.text_similarity - 0.5).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_only_nearest_product_candidate_is_evaluated() {
        // Nearest P1 entry is the colors question, lexically unrelated to the
        // query; the warranty entry would pass both gates but is never tried.
        let (matcher, _, _) = setup(&[0.2, 0.01, 0.1, 0.9]);
        let found = matcher.find_match("How long is the warranty?", "P1").await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_embedding_failure_is_not_a_miss() {
        let index = Arc::new(ScriptedIndex::new(vec![0.1, 0.1, 0.1, 0.1]));
        let kb = KnowledgeBase::new(catalog(), index.clone()).unwrap();
        let matcher = FaqMatcher::new(kb, Arc::new(FakeEmbedder::failing()));

        let err = matcher.find_match("warranty?", "P1").await.unwrap_err();
        assert!(err.is_collaborator());
        assert_eq!(index.queries(), 0);
    }

    #[tokio::test]
    async fn test_wrong_embedding_width() {
        let index = Arc::new(ScriptedIndex::new(vec![0.1, 0.1, 0.1, 0.1]));
        let kb = KnowledgeBase::new(catalog(), index.clone()).unwrap();
        let matcher = FaqMatcher::new(kb, Arc::new(FakeEmbedder::new(index.dim() + 1)));

        let err = matcher.find_match("warranty?", "P1").await.unwrap_err();
        assert!(matches!(err, Error::InvalidDimension { .. }));
    }

    #[tokio::test]
    async fn test_non_finite_embedding_is_collaborator_failure() {
        let index = Arc::new(ScriptedIndex::new(vec![0.1, 0.1, 0.1, 0.1]));
        let kb = KnowledgeBase::new(catalog(), index.clone()).unwrap();
        let embedder = FakeEmbedder::returning(vec![f32::NAN; index.dim()]);
        let matcher = FaqMatcher::new(kb, Arc::new(embedder));

        let err = matcher.find_match("abcd", "P1").await.unwrap_err();
        assert!(matches!(
            err,
            Error::CollaboratorUnavailable { collaborator: "embedder", .. }
        ));
        assert_eq!(index.queries(), 0);
    }

    #[tokio::test]
    async fn test_repeated_calls_are_deterministic() {
        let (matcher, index, _) = setup(&[0.1, 0.05, 0.3, 0.9]);
        let first = matcher.find_match("how long is the warranty", "P1").await.unwrap();
        for _ in 0..5 {
            let again = matcher.find_match("how long is the warranty", "P1").await.unwrap();
            assert_eq!(again, first);
        }
        assert_eq!(index.queries(), 6);
    }

    #[tokio::test]
    async fn test_full_catalog_is_requested() {
        let (matcher, index, _) = setup(&[0.1, 0.05, 0.3, 0.9]);
        matcher.find_match("how long is the warranty", "P1").await.unwrap();
        assert_eq!(index.last_k(), Some(4));
    }

    #[test]
    fn test_options_validation() {
        assert!(MatchOptions::default().validate().is_ok());
        assert!(MatchOptions { top_k: 0, ..Default::default() }.validate().is_err());
        assert!(MatchOptions::default().with_threshold(f64::NAN).validate().is_err());
        assert!(MatchOptions::default().with_threshold(-0.1).validate().is_err());
        assert!(MatchOptions::default().with_min_text_similarity(1.5).validate().is_err());
    }
}
