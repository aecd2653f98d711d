mod cache;
mod config;
mod orchestrator;
mod settings;
mod upload;

pub use cache::{BackendCache, BackendFactory, ModelServerFactory};
pub use config::Configuration;
pub use orchestrator::{AnswerResult, DocQa, IngestReport, SessionState};
pub use settings::{DocQaSettings, DocQaSettingsBuilder};
pub use upload::UploadedDocument;

pub use docqa_core::{DocqaError, DocqaResult, DocumentType, ErrorKind};
pub use docqa_embeddings::EmbeddingBackendId;
pub use docqa_llm::LlmBackendId;
pub use docqa_retrieval::ScoredChunk;
