use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use docqa_core::{DocqaError, Embedding, EmbeddingError};

use crate::OllamaEmbedding;

const DOCUMENT_INSTRUCTION: &str = "Represent the document for retrieval:";
const QUERY_INSTRUCTION: &str = "Represent the question for retrieving supporting documents:";

/// The embedding backends a session can select.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EmbeddingBackendId {
    InstructorXl,
    SbertMpnetBase,
    SbertMinilm,
}

impl EmbeddingBackendId {
    pub const ALL: [EmbeddingBackendId; 3] = [
        EmbeddingBackendId::InstructorXl,
        EmbeddingBackendId::SbertMpnetBase,
        EmbeddingBackendId::SbertMinilm,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmbeddingBackendId::InstructorXl => "instructor-xl",
            EmbeddingBackendId::SbertMpnetBase => "sbert-mpnet-base",
            EmbeddingBackendId::SbertMinilm => "sbert-minilm",
        }
    }

    pub fn dimension(&self) -> usize {
        match self {
            EmbeddingBackendId::InstructorXl | EmbeddingBackendId::SbertMpnetBase => 768,
            EmbeddingBackendId::SbertMinilm => 384,
        }
    }

    /// Model tag on the model server.
    pub fn model(&self) -> &'static str {
        match self {
            EmbeddingBackendId::InstructorXl => "instructor-xl",
            EmbeddingBackendId::SbertMpnetBase => "all-mpnet-base-v2",
            EmbeddingBackendId::SbertMinilm => "all-minilm",
        }
    }

    pub fn is_instruction_tuned(&self) -> bool {
        matches!(self, EmbeddingBackendId::InstructorXl)
    }
}

impl fmt::Display for EmbeddingBackendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmbeddingBackendId {
    type Err = DocqaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|id| id.as_str()).collect();
                DocqaError::InvalidConfiguration(format!(
                    "unknown embedding backend '{s}' (expected one of: {})",
                    known.join(", ")
                ))
            })
    }
}

/// Instruction-tuned encoder: documents and queries are embedded with
/// different task instructions.
pub struct InstructorEmbedding {
    inner: OllamaEmbedding,
    name: &'static str,
}

impl InstructorEmbedding {
    pub fn new(inner: OllamaEmbedding) -> Self {
        Self {
            inner,
            name: EmbeddingBackendId::InstructorXl.as_str(),
        }
    }

    fn instructed(instruction: &str, text: &str) -> String {
        format!("{instruction} {text}")
    }
}

#[async_trait]
impl Embedding for InstructorEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }
        self.inner
            .embed(&Self::instructed(DOCUMENT_INSTRUCTION, text))
            .await
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.iter().any(|text| text.trim().is_empty()) {
            return Err(EmbeddingError::EmptyInput);
        }
        let instructed: Vec<String> = texts
            .iter()
            .map(|text| Self::instructed(DOCUMENT_INSTRUCTION, text))
            .collect();
        self.inner.embed_batch(&instructed).await
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }
        self.inner
            .embed(&Self::instructed(QUERY_INSTRUCTION, text))
            .await
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    fn name(&self) -> &str {
        self.name
    }
}

/// Plain sentence encoder.
pub struct SentenceEmbedding {
    inner: OllamaEmbedding,
    name: &'static str,
}

impl SentenceEmbedding {
    pub fn new(id: EmbeddingBackendId, inner: OllamaEmbedding) -> Self {
        Self {
            inner,
            name: id.as_str(),
        }
    }
}

#[async_trait]
impl Embedding for SentenceEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.inner.embed(text).await
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self.inner.embed_batch(texts).await
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    fn name(&self) -> &str {
        self.name
    }
}

/// Probes the model server and returns a ready backend for `id`.
pub async fn load_embedding(
    id: EmbeddingBackendId,
    base_url: &str,
    concurrency: usize,
) -> Result<Arc<dyn Embedding>, EmbeddingError> {
    let inner = OllamaEmbedding::new(base_url, id.model(), id.dimension())
        .with_concurrency(concurrency);
    inner.probe().await.map_err(|err| EmbeddingError::Unavailable {
        backend: id.as_str().to_string(),
        reason: err.to_string(),
    })?;

    tracing::info!(
        backend = id.as_str(),
        model = id.model(),
        dimension = id.dimension(),
        "embedding backend loaded"
    );
    let backend: Arc<dyn Embedding> = if id.is_instruction_tuned() {
        Arc::new(InstructorEmbedding::new(inner))
    } else {
        Arc::new(SentenceEmbedding::new(id, inner))
    };
    Ok(backend)
}
