#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use docqa_core::{DocqaError, DocqaResult, Embedding, Llm, LlmError};
use docqa_rag::{BackendCache, BackendFactory, DocQa, DocQaSettings, EmbeddingBackendId, LlmBackendId};
use docqa_retrieval::HashEmbedder;
use zip::write::FileOptions;
use zip::ZipWriter;

pub const STUB_ANSWER: &str = "stub answer";

/// Records every prompt and answers with [`STUB_ANSWER`].
pub struct RecordingLlm {
    prompts: Arc<Mutex<Vec<String>>>,
    delay: Option<Duration>,
}

#[async_trait]
impl Llm for RecordingLlm {
    async fn generate(&self, prompt: &str, _max_tokens: usize) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(STUB_ANSWER.to_string())
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// Hands out hash embedders and recording LLMs, counting every load.
#[derive(Default)]
pub struct FakeFactory {
    pub embedding_loads: AtomicUsize,
    pub llm_loads: AtomicUsize,
    pub unavailable_llm: Option<LlmBackendId>,
    pub llm_delay: Option<Duration>,
    pub prompts: Arc<Mutex<Vec<String>>>,
}

impl FakeFactory {
    pub fn embedding_loads(&self) -> usize {
        self.embedding_loads.load(Ordering::SeqCst)
    }

    pub fn llm_loads(&self) -> usize {
        self.llm_loads.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl BackendFactory for FakeFactory {
    async fn load_embedding(&self, _id: EmbeddingBackendId) -> DocqaResult<Arc<dyn Embedding>> {
        self.embedding_loads.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(HashEmbedder::new(256)))
    }

    async fn load_llm(&self, id: LlmBackendId, _low_precision: bool) -> DocqaResult<Arc<dyn Llm>> {
        self.llm_loads.fetch_add(1, Ordering::SeqCst);
        if self.unavailable_llm == Some(id) {
            return Err(DocqaError::BackendUnavailable {
                backend: id.as_str().to_string(),
                reason: "model not installed".to_string(),
            });
        }
        Ok(Arc::new(RecordingLlm {
            prompts: Arc::clone(&self.prompts),
            delay: self.llm_delay,
        }))
    }
}

pub fn settings() -> DocQaSettings {
    DocQaSettings::builder()
        .chunk_size(200)
        .chunk_overlap(20)
        .top_k(2)
        .build()
        .unwrap()
}

pub fn session(factory: &Arc<FakeFactory>) -> DocQa {
    session_with(factory, settings())
}

pub fn session_with(factory: &Arc<FakeFactory>, settings: DocQaSettings) -> DocQa {
    let cache = BackendCache::new(factory.clone());
    DocQa::with_cache(settings, cache).unwrap()
}

pub fn paragraph(text: &str) -> String {
    format!("<w:p><w:r><w:t>{text}</w:t></w:r></w:p>")
}

pub fn heading(text: &str) -> String {
    format!(r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>{text}</w:t></w:r></w:p>"#)
}

pub fn docx_bytes(body: &str) -> Vec<u8> {
    let document = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
    );
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    zip.start_file("word/document.xml", FileOptions::default())
        .unwrap();
    zip.write_all(document.as_bytes()).unwrap();
    zip.finish().unwrap().into_inner()
}

pub fn write_docx(path: &Path, body: &str) {
    File::create(path)
        .unwrap()
        .write_all(&docx_bytes(body))
        .unwrap();
}

/// Three sections; only the second mentions the founding year.
pub fn company_docx() -> String {
    [
        heading("Locations"),
        paragraph("Our offices are located in Berlin and Toronto."),
        heading("History"),
        paragraph("The company was founded in 1999 by two engineers."),
        heading("Finance"),
        paragraph("Revenue grew by twelve percent over the last fiscal quarter."),
    ]
    .concat()
}

pub fn gardening_docx() -> String {
    [
        heading("Tomatoes"),
        paragraph("Tomatoes need full sun and regular watering."),
        heading("Roses"),
        paragraph("Prune roses in early spring before new growth."),
    ]
    .concat()
}
