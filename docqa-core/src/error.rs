use std::time::Duration;

use thiserror::Error;

/// Every failure the question-answering pipeline can surface to its caller.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DocqaError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),
    #[error("Corrupt document '{path}': {reason}")]
    CorruptDocument { path: String, reason: String },
    #[error("Document '{0}' contains no extractable text")]
    EmptyDocument(String),
    #[error("Backend '{backend}' unavailable: {reason}")]
    BackendUnavailable { backend: String, reason: String },
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Search called before the index was built")]
    EmptyIndex,
    #[error("Embedding dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
    #[error("No document has been ingested yet")]
    NotIndexed,
    #[error("Generation timed out after {0:?}")]
    GenerationTimeout(Duration),
}

/// Fieldless category of a [`DocqaError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidConfiguration,
    UnsupportedFormat,
    CorruptDocument,
    EmptyDocument,
    BackendUnavailable,
    InvalidInput,
    EmptyIndex,
    DimensionMismatch,
    NotIndexed,
    GenerationTimeout,
}

impl ErrorKind {
    /// `EmptyDocument` degrades to an empty index instead of failing a session.
    pub fn is_warning(self) -> bool {
        matches!(self, ErrorKind::EmptyDocument)
    }
}

impl DocqaError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DocqaError::InvalidConfiguration(_) => ErrorKind::InvalidConfiguration,
            DocqaError::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            DocqaError::CorruptDocument { .. } => ErrorKind::CorruptDocument,
            DocqaError::EmptyDocument(_) => ErrorKind::EmptyDocument,
            DocqaError::BackendUnavailable { .. } => ErrorKind::BackendUnavailable,
            DocqaError::InvalidInput(_) => ErrorKind::InvalidInput,
            DocqaError::EmptyIndex => ErrorKind::EmptyIndex,
            DocqaError::DimensionMismatch { .. } => ErrorKind::DimensionMismatch,
            DocqaError::NotIndexed => ErrorKind::NotIndexed,
            DocqaError::GenerationTimeout(_) => ErrorKind::GenerationTimeout,
        }
    }
}

pub type DocqaResult<T> = Result<T, DocqaError>;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("Embedding input is empty")]
    EmptyInput,
    #[error("Embedding backend '{backend}' unavailable: {reason}")]
    Unavailable { backend: String, reason: String },
    #[error("Embedding invalid response: {0}")]
    InvalidResponse(String),
    #[error("Embedding provider error: {0}")]
    Provider(String),
}

impl From<EmbeddingError> for DocqaError {
    fn from(err: EmbeddingError) -> Self {
        match err {
            EmbeddingError::EmptyInput => {
                DocqaError::InvalidInput("cannot embed empty text".to_string())
            }
            EmbeddingError::Unavailable { backend, reason } => {
                DocqaError::BackendUnavailable { backend, reason }
            }
            EmbeddingError::InvalidResponse(reason) | EmbeddingError::Provider(reason) => {
                DocqaError::BackendUnavailable {
                    backend: "embedding".to_string(),
                    reason,
                }
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM prompt is empty")]
    EmptyPrompt,
    #[error("LLM backend '{backend}' unavailable: {reason}")]
    Unavailable { backend: String, reason: String },
    #[error("LLM backend '{backend}' timed out after {after:?}")]
    Timeout { backend: String, after: Duration },
    #[error("LLM provider failed: {0}")]
    Provider(String),
}

impl From<LlmError> for DocqaError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::EmptyPrompt => DocqaError::InvalidInput("prompt is empty".to_string()),
            LlmError::Unavailable { backend, reason } => {
                DocqaError::BackendUnavailable { backend, reason }
            }
            LlmError::Timeout { after, .. } => DocqaError::GenerationTimeout(after),
            LlmError::Provider(reason) => DocqaError::BackendUnavailable {
                backend: "llm".to_string(),
                reason,
            },
        }
    }
}
