mod backend;
mod ollama;

pub use backend::{load_llm, Architecture, DecoderOnlyLlm, LlmBackendId, Seq2SeqLlm};
pub use docqa_core::{Llm, LlmError};
pub use ollama::{GenerateOptions, OllamaClient};

/// Marker the decoder-only backend stops at when it starts inventing a
/// follow-up question.
pub const QUESTION_MARKER: &str = "\nQuestion:";
