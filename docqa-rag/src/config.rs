use std::path::PathBuf;

use docqa_core::{DocqaError, DocqaResult, DocumentType};
use docqa_embeddings::EmbeddingBackendId;
use docqa_llm::LlmBackendId;
use serde::{Deserialize, Serialize};

/// The session configuration. Always replaced as a whole.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    pub document_type: DocumentType,
    pub document_path: PathBuf,
    pub embedding_backend_id: String,
    pub llm_backend_id: String,
    #[serde(default)]
    pub load_in_low_precision: bool,
}

/// A configuration whose identifiers have been checked.
#[derive(Clone, Debug)]
pub(crate) struct ResolvedConfiguration {
    pub(crate) config: Configuration,
    pub(crate) embedding: EmbeddingBackendId,
    pub(crate) llm: LlmBackendId,
}

impl Configuration {
    pub fn new(
        document_type: DocumentType,
        document_path: impl Into<PathBuf>,
        embedding_backend_id: impl Into<String>,
        llm_backend_id: impl Into<String>,
        load_in_low_precision: bool,
    ) -> Self {
        Self {
            document_type,
            document_path: document_path.into(),
            embedding_backend_id: embedding_backend_id.into(),
            llm_backend_id: llm_backend_id.into(),
            load_in_low_precision,
        }
    }

    pub(crate) fn resolve(self) -> DocqaResult<ResolvedConfiguration> {
        let embedding: EmbeddingBackendId = self.embedding_backend_id.parse()?;
        let llm: LlmBackendId = self.llm_backend_id.parse()?;
        if self.document_path.as_os_str().is_empty() {
            return Err(DocqaError::InvalidConfiguration(
                "document path must not be empty".to_string(),
            ));
        }
        if !self.document_path.is_file() {
            return Err(DocqaError::InvalidConfiguration(format!(
                "document path {} is not a readable file",
                self.document_path.display()
            )));
        }
        Ok(ResolvedConfiguration {
            config: self,
            embedding,
            llm,
        })
    }
}
