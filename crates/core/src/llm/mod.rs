pub mod error;
pub mod json;
pub mod openai;

use error::LlmError;

#[derive(Debug, Clone)]
pub struct GenerateInput {
    pub user_prompt: String,
    /// Candidates grouped per category, already formatted for the prompt.
    pub product_block: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenAI,
}

#[async_trait::async_trait]
pub trait RecommendationGenerator: Send + Sync {
    fn provider(&self) -> Provider;

    /// Returns the trimmed, non-blank completion text.
    async fn generate_recommendation(&self, input: GenerateInput) -> Result<String, LlmError>;
}
