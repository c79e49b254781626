use crate::composer::AnswerComposer;
use crate::matcher::FaqMatcher;
use faqx_core::{Catalog, Error, Result};
use serde::Serialize;
use tracing::info;

/// A composed reply and the curated question it was drawn from, if any.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    pub text: String,
    pub matched_question: Option<String>,
}

/// Matching plus composition behind one call, plus the catalog views a
/// front end needs to offer products and their question space.
pub struct FaqAssistant {
    matcher: FaqMatcher,
    composer: AnswerComposer,
}

impl FaqAssistant {
    pub fn new(matcher: FaqMatcher, composer: AnswerComposer) -> Self {
        Self { matcher, composer }
    }

    pub fn matcher(&self) -> &FaqMatcher {
        &self.matcher
    }

    pub fn catalog(&self) -> &Catalog {
        self.matcher.knowledge().catalog()
    }

    /// Answer a free-text question about one product.
    ///
    /// Blank queries are rejected with [`Error::EmptyQuery`] before any model
    /// is called.
    pub async fn answer(&self, query: &str, product_id: &str) -> Result<Answer> {
        if query.trim().is_empty() {
            return Err(Error::EmptyQuery);
        }

        let found = self.matcher.find_match(query, product_id).await?;
        // A match implies the product is in the catalog
        let product_name = self.catalog().display_name(product_id).unwrap_or(product_id);
        let text = self
            .composer
            .compose(query, product_name, found.as_ref())
            .await?;

        info!(
            "Answered query for product {:?} ({})",
            product_id,
            if found.is_some() { "matched" } else { "fallback" }
        );
        Ok(Answer {
            text,
            matched_question: found.map(|m| m.question),
        })
    }

    /// `(product_id, display name)` pairs in catalog order.
    pub fn products(&self) -> Vec<(&str, &str)> {
        self.catalog().products().collect()
    }

    /// Questions the catalog can answer for a product; `None` if unknown.
    pub fn questions(&self, product_id: &str) -> Option<Vec<&str>> {
        let catalog = self.catalog();
        catalog
            .contains_product(product_id)
            .then(|| catalog.questions(product_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composer::FALLBACK_ANSWER;
    use crate::testing::{EchoParaphraser, FakeEmbedder, ScriptedIndex};
    use faqx_core::{KnowledgeBase, NeighborSearch, QaEntry};
    use std::sync::Arc;

    struct Fixture {
        assistant: FaqAssistant,
        embedder: Arc<FakeEmbedder>,
        index: Arc<ScriptedIndex>,
        paraphraser: Arc<EchoParaphraser>,
    }

    fn fixture(distances: Vec<f32>) -> Fixture {
        let catalog = Catalog::from_entries(vec![
            QaEntry::new("P1", "Sea Kayak", "How long is the warranty?", "Two years."),
            QaEntry::new("P1", "Sea Kayak", "What colors are available?", "Red and yellow."),
        ])
        .unwrap();
        let index = Arc::new(ScriptedIndex::new(distances));
        let embedder = Arc::new(FakeEmbedder::new(index.dim()));
        let paraphraser = Arc::new(EchoParaphraser::new());

        let kb = KnowledgeBase::new(catalog, index.clone()).unwrap();
        let assistant = FaqAssistant::new(
            FaqMatcher::new(kb, embedder.clone()),
            AnswerComposer::new(paraphraser.clone()),
        );
        Fixture {
            assistant,
            embedder,
            index,
            paraphraser,
        }
    }

    #[tokio::test]
    async fn test_matched_answer_is_paraphrased() {
        let f = fixture(vec![0.1, 0.7]);
        let answer = f.assistant.answer("How long is the warranty?", "P1").await.unwrap();

        assert_eq!(answer.matched_question.as_deref(), Some("How long is the warranty?"));
        assert!(answer.text.contains("Answer: \"Two years.\""));
        assert!(answer.text.contains("about Sea Kayak"));
        assert_eq!(f.paraphraser.calls(), 1);
    }

    #[tokio::test]
    async fn test_far_match_falls_back_without_model() {
        let f = fixture(vec![0.9, 0.95]);
        let answer = f.assistant.answer("How long is the warranty?", "P1").await.unwrap();

        assert_eq!(answer.text, FALLBACK_ANSWER);
        assert!(answer.matched_question.is_none());
        assert_eq!(f.paraphraser.calls(), 0);
    }

    #[tokio::test]
    async fn test_blank_query_rejected_before_models() {
        let f = fixture(vec![0.1, 0.7]);
        let err = f.assistant.answer("   ", "P1").await.unwrap_err();

        assert!(matches!(err, Error::EmptyQuery));
        assert_eq!(f.embedder.calls(), 0);
        assert_eq!(f.index.queries(), 0);
    }

    #[test]
    fn test_catalog_views() {
        let f = fixture(vec![0.1, 0.7]);
        assert_eq!(f.assistant.products(), vec![("P1", "Sea Kayak")]);
        assert_eq!(
            f.assistant.questions("P1"),
            Some(vec!["How long is the warranty?", "What colors are available?"])
        );
        assert_eq!(f.assistant.questions("P2"), None);
    }
}
