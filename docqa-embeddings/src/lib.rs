mod backend;
mod error;
mod ollama;

pub use backend::{load_embedding, EmbeddingBackendId, InstructorEmbedding, SentenceEmbedding};
pub use error::EmbeddingProviderError;
pub use ollama::OllamaEmbedding;
