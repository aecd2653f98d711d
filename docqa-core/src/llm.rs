use async_trait::async_trait;

use crate::LlmError;

/// A text-completion backend.
#[async_trait]
pub trait Llm: Send + Sync {
    async fn generate(&self, prompt: &str, max_tokens: usize) -> Result<String, LlmError>;

    fn name(&self) -> &str;
}
