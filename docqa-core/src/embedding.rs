use async_trait::async_trait;

use crate::EmbeddingError;

/// Maps text to a vector of a fixed dimension.
///
/// The dimension must stay constant for the lifetime of an instance; indexes
/// built with one instance are only searchable with vectors of the same size.
#[async_trait]
pub trait Embedding: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    /// Embeds a search query. Instruction-tuned encoders use a different
    /// instruction for queries than for documents.
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.embed(text).await
    }

    fn dimension(&self) -> usize;

    fn name(&self) -> &str;
}
