use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use docqa_rag::{DocQaSettings, DocqaResult};

#[derive(Debug, Parser)]
#[command(
    name = "docqa",
    version,
    about = "Ask questions about a pdf, pptx, xlsx or docx file"
)]
pub struct Cli {
    /// Document to load.
    #[arg(short, long, required_unless_present = "list_backends")]
    pub file: Option<PathBuf>,

    /// Embedding backend id.
    #[arg(short, long, env = "DOCQA_EMBEDDING", default_value = "sbert-mpnet-base")]
    pub embedding: String,

    /// LLM backend id.
    #[arg(short, long, env = "DOCQA_LLM", default_value = "flan-t5-base")]
    pub llm: String,

    /// Load the LLM in 8-bit precision where a quantized variant exists.
    #[arg(long)]
    pub low_precision: bool,

    /// Answer one question and exit instead of starting the prompt.
    #[arg(short, long)]
    pub question: Option<String>,

    /// Print the retrieved chunks under each answer.
    #[arg(long)]
    pub show_sources: bool,

    /// Print the valid backend ids and exit.
    #[arg(long)]
    pub list_backends: bool,

    #[arg(long, env = "DOCQA_MODEL_SERVER_URL")]
    pub model_server_url: Option<String>,

    #[arg(long, env = "DOCQA_CHUNK_SIZE")]
    pub chunk_size: Option<usize>,

    #[arg(long, env = "DOCQA_CHUNK_OVERLAP")]
    pub chunk_overlap: Option<usize>,

    #[arg(long, env = "DOCQA_TOP_K")]
    pub top_k: Option<usize>,

    #[arg(long, env = "DOCQA_MAX_ANSWER_TOKENS")]
    pub max_answer_tokens: Option<usize>,

    #[arg(long, env = "DOCQA_GENERATION_TIMEOUT_SECS")]
    pub generation_timeout_secs: Option<u64>,

    #[arg(long, env = "DOCQA_EMBEDDING_CONCURRENCY")]
    pub embedding_concurrency: Option<usize>,
}

impl Cli {
    pub fn settings(&self) -> DocqaResult<DocQaSettings> {
        let mut builder = DocQaSettings::builder();
        if let Some(url) = &self.model_server_url {
            builder = builder.model_server_url(url.clone());
        }
        if let Some(value) = self.chunk_size {
            builder = builder.chunk_size(value);
        }
        if let Some(value) = self.chunk_overlap {
            builder = builder.chunk_overlap(value);
        }
        if let Some(value) = self.top_k {
            builder = builder.top_k(value);
        }
        if let Some(value) = self.max_answer_tokens {
            builder = builder.max_answer_tokens(value);
        }
        if let Some(secs) = self.generation_timeout_secs {
            builder = builder.generation_timeout(Duration::from_secs(secs));
        }
        if let Some(value) = self.embedding_concurrency {
            builder = builder.embedding_concurrency(value);
        }
        builder.build()
    }
}
