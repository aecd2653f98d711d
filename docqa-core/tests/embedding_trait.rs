use std::sync::Arc;

use async_trait::async_trait;

use docqa_core::{Embedding, EmbeddingError, Llm, LlmError};

struct TestEmbedding;

#[async_trait]
impl Embedding for TestEmbedding {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(vec![0.0])
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(vec![vec![0.0]; texts.len()])
    }

    fn dimension(&self) -> usize {
        1
    }

    fn name(&self) -> &str {
        "test"
    }
}

struct TestLlm;

#[async_trait]
impl Llm for TestLlm {
    async fn generate(&self, prompt: &str, _max_tokens: usize) -> Result<String, LlmError> {
        Ok(prompt.to_uppercase())
    }

    fn name(&self) -> &str {
        "test"
    }
}

fn assert_object_safe(_embedding: Arc<dyn Embedding>, _llm: Arc<dyn Llm>) {}

#[test]
fn capability_traits_are_object_safe() {
    assert_object_safe(Arc::new(TestEmbedding), Arc::new(TestLlm));
}

#[tokio::test]
async fn embed_query_defaults_to_embed() {
    let embedding: Arc<dyn Embedding> = Arc::new(TestEmbedding);
    let query = embedding.embed_query("q").await.unwrap();
    let plain = embedding.embed("q").await.unwrap();
    assert_eq!(query, plain);
}
