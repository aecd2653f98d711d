use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use docqa_core::{DocqaResult, Embedding, Llm};
use docqa_embeddings::EmbeddingBackendId;
use docqa_llm::LlmBackendId;
use tokio::sync::Mutex;

use crate::DocQaSettings;

/// Loads backends. Loading is expensive; callers go through [`BackendCache`].
#[async_trait]
pub trait BackendFactory: Send + Sync {
    async fn load_embedding(&self, id: EmbeddingBackendId) -> DocqaResult<Arc<dyn Embedding>>;

    async fn load_llm(&self, id: LlmBackendId, low_precision: bool) -> DocqaResult<Arc<dyn Llm>>;
}

/// Loads backends from an Ollama-compatible model server.
#[derive(Clone, Debug)]
pub struct ModelServerFactory {
    base_url: String,
    generation_timeout: Duration,
    embedding_concurrency: usize,
}

impl ModelServerFactory {
    pub fn new(settings: &DocQaSettings) -> Self {
        Self {
            base_url: settings.model_server_url().to_string(),
            generation_timeout: settings.generation_timeout(),
            embedding_concurrency: settings.embedding_concurrency(),
        }
    }
}

#[async_trait]
impl BackendFactory for ModelServerFactory {
    async fn load_embedding(&self, id: EmbeddingBackendId) -> DocqaResult<Arc<dyn Embedding>> {
        Ok(docqa_embeddings::load_embedding(id, &self.base_url, self.embedding_concurrency).await?)
    }

    async fn load_llm(&self, id: LlmBackendId, low_precision: bool) -> DocqaResult<Arc<dyn Llm>> {
        Ok(docqa_llm::load_llm(id, low_precision, &self.base_url, self.generation_timeout).await?)
    }
}

type LlmKey = (LlmBackendId, bool);

/// Memoizes loaded backends: embeddings by id, LLMs by (id, precision mode).
///
/// Clones share the same entries. Failed loads are not cached.
#[derive(Clone)]
pub struct BackendCache {
    factory: Arc<dyn BackendFactory>,
    embeddings: Arc<Mutex<HashMap<EmbeddingBackendId, Arc<dyn Embedding>>>>,
    llms: Arc<Mutex<HashMap<LlmKey, Arc<dyn Llm>>>>,
}

impl BackendCache {
    pub fn new(factory: Arc<dyn BackendFactory>) -> Self {
        Self {
            factory,
            embeddings: Arc::new(Mutex::new(HashMap::new())),
            llms: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn from_settings(settings: &DocQaSettings) -> Self {
        Self::new(Arc::new(ModelServerFactory::new(settings)))
    }

    // The flag is a no-op for models without a quantized variant, so both
    // settings share one entry.
    fn llm_key(id: LlmBackendId, low_precision: bool) -> LlmKey {
        (id, low_precision && id.supports_low_precision())
    }

    pub async fn embedding(&self, id: EmbeddingBackendId) -> DocqaResult<Arc<dyn Embedding>> {
        let mut embeddings = self.embeddings.lock().await;
        if let Some(backend) = embeddings.get(&id) {
            tracing::debug!(backend = id.as_str(), "embedding backend cache hit");
            return Ok(Arc::clone(backend));
        }
        let backend = self.factory.load_embedding(id).await?;
        embeddings.insert(id, Arc::clone(&backend));
        Ok(backend)
    }

    pub async fn llm(&self, id: LlmBackendId, low_precision: bool) -> DocqaResult<Arc<dyn Llm>> {
        let key = Self::llm_key(id, low_precision);
        let mut llms = self.llms.lock().await;
        if let Some(backend) = llms.get(&key) {
            tracing::debug!(backend = id.as_str(), low_precision = key.1, "llm backend cache hit");
            return Ok(Arc::clone(backend));
        }
        let backend = self.factory.load_llm(id, low_precision).await?;
        llms.insert(key, Arc::clone(&backend));
        Ok(backend)
    }

    /// Returns whether an entry was removed.
    pub async fn invalidate_embedding(&self, id: EmbeddingBackendId) -> bool {
        self.embeddings.lock().await.remove(&id).is_some()
    }

    pub async fn invalidate_llm(&self, id: LlmBackendId, low_precision: bool) -> bool {
        self.llms
            .lock()
            .await
            .remove(&Self::llm_key(id, low_precision))
            .is_some()
    }

    pub async fn clear(&self) {
        self.embeddings.lock().await.clear();
        self.llms.lock().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.embeddings.lock().await.len() + self.llms.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
