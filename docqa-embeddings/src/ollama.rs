use async_trait::async_trait;
use docqa_core::{Embedding, EmbeddingError};
use futures::{StreamExt, TryStreamExt};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::EmbeddingProviderError;

const DEFAULT_CONCURRENCY: usize = 8;

/// Embedding model served by an Ollama-compatible model server.
#[derive(Clone)]
pub struct OllamaEmbedding {
    base_url: String,
    model: String,
    dimension: usize,
    concurrency: usize,
    http: Client,
}

impl OllamaEmbedding {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, dimension: usize) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            dimension,
            concurrency: DEFAULT_CONCURRENCY,
            http: Client::new(),
        }
    }

    /// Maximum number of embedding requests in flight during `embed_batch`.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Checks that the server is reachable and has the model installed.
    pub async fn probe(&self) -> Result<(), EmbeddingProviderError> {
        let unavailable = |reason: String| EmbeddingProviderError::ModelUnavailable {
            model: self.model.clone(),
            reason,
        };
        let response = self
            .http
            .post(self.url("/api/show"))
            .json(&ShowRequest { name: &self.model })
            .send()
            .await
            .map_err(|err| unavailable(err.to_string()))?;
        if !response.status().is_success() {
            return Err(unavailable(format!("server answered {}", response.status())));
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct ShowRequest<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct OllamaEmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct OllamaEmbeddingResponse {
    embedding: Vec<f32>,
}

#[async_trait]
impl Embedding for OllamaEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }
        let req = OllamaEmbeddingRequest {
            model: &self.model,
            prompt: text,
        };
        let response: OllamaEmbeddingResponse = self
            .http
            .post(self.url("/api/embeddings"))
            .json(&req)
            .send()
            .await
            .map_err(|err| EmbeddingProviderError::Request(err.to_string()))?
            .error_for_status()
            .map_err(|err| EmbeddingProviderError::Request(err.to_string()))?
            .json()
            .await
            .map_err(|err| EmbeddingProviderError::InvalidResponse(err.to_string()))?;

        if response.embedding.len() != self.dimension {
            return Err(EmbeddingProviderError::InvalidResponse(format!(
                "expected embedding dimension {}, got {}",
                self.dimension,
                response.embedding.len()
            ))
            .into());
        }

        Ok(response.embedding)
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        tracing::debug!(model = %self.model, texts = texts.len(), "embedding batch");
        // `buffered` keeps results in input order.
        futures::stream::iter(texts.iter().cloned())
            .map(|text| async move { self.embed(&text).await })
            .buffered(self.concurrency)
            .try_collect()
            .await
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        &self.model
    }
}
