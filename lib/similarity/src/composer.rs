use crate::matcher::FaqMatch;
use faqx_core::{Paraphraser, Result};
use std::sync::Arc;

/// Returned whenever no curated answer was matched
pub const FALLBACK_ANSWER: &str =
    "I'm not sure about that. Please check the product details for more info!";

/// Persona given to the paraphrase model
pub const SYSTEM_PROMPT: &str = "You are a friendly, knowledgeable product expert.";

/// Turns a match into user-facing prose.
pub struct AnswerComposer {
    paraphraser: Arc<dyn Paraphraser>,
}

impl AnswerComposer {
    pub fn new(paraphraser: Arc<dyn Paraphraser>) -> Self {
        Self { paraphraser }
    }

    /// Rephrase the matched answer conversationally, or return
    /// [`FALLBACK_ANSWER`] without calling the model when there is no match.
    pub async fn compose(
        &self,
        query: &str,
        product_name: &str,
        found: Option<&FaqMatch>,
    ) -> Result<String> {
        let Some(found) = found else {
            return Ok(FALLBACK_ANSWER.to_string());
        };

        let prompt = build_prompt(query, product_name, &found.question, &found.answer);
        let reply = self.paraphraser.complete(SYSTEM_PROMPT, &prompt).await?;
        Ok(reply.trim().to_string())
    }
}

/// User prompt carrying the customer's question and the curated pair.
pub fn build_prompt(query: &str, product_name: &str, question: &str, answer: &str) -> String {
    format!(
        "A customer asked: \"{query}\" about {product_name}\n\
         \n\
         The closest matching question we found: \"{question}\"\n\
         \n\
         Answer: \"{answer}\"\n\
         \n\
         Rephrase this answer to be **short, friendly, and conversational**."
    )
}
