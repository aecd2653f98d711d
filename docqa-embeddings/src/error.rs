use docqa_core::EmbeddingError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmbeddingProviderError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("model '{model}' is not available: {reason}")]
    ModelUnavailable { model: String, reason: String },
}

impl From<EmbeddingProviderError> for EmbeddingError {
    fn from(error: EmbeddingProviderError) -> Self {
        match error {
            EmbeddingProviderError::InvalidResponse(message) => {
                EmbeddingError::InvalidResponse(message)
            }
            EmbeddingProviderError::Request(message) => EmbeddingError::Provider(message),
            EmbeddingProviderError::ModelUnavailable { model, reason } => {
                EmbeddingError::Unavailable {
                    backend: model,
                    reason,
                }
            }
        }
    }
}
