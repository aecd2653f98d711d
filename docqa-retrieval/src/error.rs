use std::path::PathBuf;

use docqa_core::{DocqaError, EmbeddingError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestionError {
    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {reason}")]
    Parse { path: PathBuf, reason: String },
    #[error("{path} contains no extractable text")]
    Empty { path: PathBuf },
}

impl From<IngestionError> for DocqaError {
    fn from(err: IngestionError) -> Self {
        match err {
            IngestionError::UnsupportedFormat(format) => DocqaError::UnsupportedFormat(format),
            IngestionError::Read { path, source } => DocqaError::CorruptDocument {
                path: path.display().to_string(),
                reason: source.to_string(),
            },
            IngestionError::Parse { path, reason } => DocqaError::CorruptDocument {
                path: path.display().to_string(),
                reason,
            },
            IngestionError::Empty { path } => DocqaError::EmptyDocument(path.display().to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("search called before the index was built")]
    EmptyIndex,
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
    #[error("embedder returned {got} vectors for {expected} chunks")]
    BatchLength { expected: usize, got: usize },
    #[error("embedding error: {0}")]
    Embedding(#[from] EmbeddingError),
}

impl From<IndexError> for DocqaError {
    fn from(err: IndexError) -> Self {
        match err {
            IndexError::EmptyIndex => DocqaError::EmptyIndex,
            IndexError::DimensionMismatch { expected, got } => {
                DocqaError::DimensionMismatch { expected, got }
            }
            IndexError::BatchLength { expected, got } => DocqaError::BackendUnavailable {
                backend: "embedding".to_string(),
                reason: format!("returned {got} vectors for {expected} chunks"),
            },
            IndexError::Embedding(err) => err.into(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SplitterConfigError {
    #[error("chunk_size must be greater than 0")]
    ZeroChunkSize,
    #[error("chunk_overlap ({overlap}) must be smaller than chunk_size ({size})")]
    OverlapTooLarge { overlap: usize, size: usize },
}

impl From<SplitterConfigError> for DocqaError {
    fn from(err: SplitterConfigError) -> Self {
        DocqaError::InvalidConfiguration(err.to_string())
    }
}

pub type IndexResult<T> = Result<T, IndexError>;
