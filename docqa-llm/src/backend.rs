use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use docqa_core::{DocqaError, Llm, LlmError};

use crate::{GenerateOptions, OllamaClient, QUESTION_MARKER};

const QUANTIZED_SUFFIX: &str = "q8_0";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Architecture {
    Seq2Seq,
    DecoderOnly,
}

/// The generation backends a session can select.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LlmBackendId {
    FlanT5Small,
    FlanT5Base,
    FlanT5Large,
    FlanT5Xl,
    FastchatT5Xl,
    Falcon7bInstruct,
}

impl LlmBackendId {
    pub const ALL: [LlmBackendId; 6] = [
        LlmBackendId::FlanT5Small,
        LlmBackendId::FlanT5Base,
        LlmBackendId::FlanT5Large,
        LlmBackendId::FlanT5Xl,
        LlmBackendId::FastchatT5Xl,
        LlmBackendId::Falcon7bInstruct,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LlmBackendId::FlanT5Small => "flan-t5-small",
            LlmBackendId::FlanT5Base => "flan-t5-base",
            LlmBackendId::FlanT5Large => "flan-t5-large",
            LlmBackendId::FlanT5Xl => "flan-t5-xl",
            LlmBackendId::FastchatT5Xl => "fastchat-t5-xl",
            LlmBackendId::Falcon7bInstruct => "falcon-7b-instruct",
        }
    }

    pub fn architecture(&self) -> Architecture {
        match self {
            LlmBackendId::Falcon7bInstruct => Architecture::DecoderOnly,
            _ => Architecture::Seq2Seq,
        }
    }

    /// Small models run at full precision regardless of the flag.
    pub fn supports_low_precision(&self) -> bool {
        !matches!(self, LlmBackendId::FlanT5Small | LlmBackendId::FlanT5Base)
    }

    fn base_tag(&self) -> &'static str {
        match self {
            LlmBackendId::Falcon7bInstruct => "falcon:7b-instruct",
            other => other.as_str(),
        }
    }

    /// Model tag on the model server, with the 8-bit quantized variant
    /// selected when `low_precision` applies.
    pub fn model_tag(&self, low_precision: bool) -> String {
        let base = self.base_tag();
        if !(low_precision && self.supports_low_precision()) {
            return base.to_string();
        }
        if base.contains(':') {
            format!("{base}-{QUANTIZED_SUFFIX}")
        } else {
            format!("{base}:{QUANTIZED_SUFFIX}")
        }
    }
}

impl fmt::Display for LlmBackendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LlmBackendId {
    type Err = DocqaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|id| id.as_str()).collect();
                DocqaError::InvalidConfiguration(format!(
                    "unknown llm backend '{s}' (expected one of: {})",
                    known.join(", ")
                ))
            })
    }
}

/// Encoder-decoder model; the output is the answer alone.
pub struct Seq2SeqLlm {
    client: OllamaClient,
    name: &'static str,
}

impl Seq2SeqLlm {
    pub fn new(id: LlmBackendId, client: OllamaClient) -> Self {
        Self {
            client,
            name: id.as_str(),
        }
    }
}

#[async_trait]
impl Llm for Seq2SeqLlm {
    async fn generate(&self, prompt: &str, max_tokens: usize) -> Result<String, LlmError> {
        if prompt.trim().is_empty() {
            return Err(LlmError::EmptyPrompt);
        }
        let started = Instant::now();
        let options = GenerateOptions {
            max_tokens,
            stop: Vec::new(),
        };
        let output = self.client.generate(prompt, &options).await?;
        tracing::debug!(
            backend = self.name,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "generation finished"
        );
        Ok(output.trim().to_string())
    }

    fn name(&self) -> &str {
        self.name
    }
}

/// Causal model; may echo the prompt and keep writing past the answer.
pub struct DecoderOnlyLlm {
    client: OllamaClient,
    name: &'static str,
}

impl DecoderOnlyLlm {
    pub fn new(id: LlmBackendId, client: OllamaClient) -> Self {
        Self {
            client,
            name: id.as_str(),
        }
    }
}

/// Strips an echoed prompt and anything from the next question marker on.
pub(crate) fn clean_decoder_output(prompt: &str, output: &str) -> String {
    let answer = output.strip_prefix(prompt).unwrap_or(output);
    let answer = match answer.find(QUESTION_MARKER) {
        Some(end) => &answer[..end],
        None => answer,
    };
    answer.trim().to_string()
}

#[async_trait]
impl Llm for DecoderOnlyLlm {
    async fn generate(&self, prompt: &str, max_tokens: usize) -> Result<String, LlmError> {
        if prompt.trim().is_empty() {
            return Err(LlmError::EmptyPrompt);
        }
        let started = Instant::now();
        let options = GenerateOptions {
            max_tokens,
            stop: vec![QUESTION_MARKER.to_string()],
        };
        let output = self.client.generate(prompt, &options).await?;
        tracing::debug!(
            backend = self.name,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "generation finished"
        );
        Ok(clean_decoder_output(prompt, &output))
    }

    fn name(&self) -> &str {
        self.name
    }
}

/// Probes the model server and returns a ready backend for `id`.
pub async fn load_llm(
    id: LlmBackendId,
    low_precision: bool,
    base_url: &str,
    timeout: Duration,
) -> Result<Arc<dyn Llm>, LlmError> {
    if low_precision && !id.supports_low_precision() {
        tracing::warn!(backend = id.as_str(), "low precision ignored for small model");
    }
    let tag = id.model_tag(low_precision);
    let client = OllamaClient::new(base_url, tag.clone())?.with_timeout(timeout);
    client.probe().await.map_err(|err| LlmError::Unavailable {
        backend: id.as_str().to_string(),
        reason: err.to_string(),
    })?;

    tracing::info!(backend = id.as_str(), model = %tag, low_precision, "llm backend loaded");
    let backend: Arc<dyn Llm> = match id.architecture() {
        Architecture::Seq2Seq => Arc::new(Seq2SeqLlm::new(id, client)),
        Architecture::DecoderOnly => Arc::new(DecoderOnlyLlm::new(id, client)),
    };
    Ok(backend)
}
