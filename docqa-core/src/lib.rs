mod document;
mod embedding;
mod error;
mod llm;

pub use document::{Chunk, DocumentType, Segment, SegmentKind, SourceLocator};
pub use embedding::Embedding;
pub use error::{DocqaError, DocqaResult, EmbeddingError, ErrorKind, LlmError};
pub use llm::Llm;
