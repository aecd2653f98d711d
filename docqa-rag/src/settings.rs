use std::str::FromStr;
use std::time::Duration;

use docqa_core::{DocqaError, DocqaResult};
use docqa_retrieval::TextSplitter;

pub const ENV_MODEL_SERVER_URL: &str = "DOCQA_MODEL_SERVER_URL";
pub const ENV_CHUNK_SIZE: &str = "DOCQA_CHUNK_SIZE";
pub const ENV_CHUNK_OVERLAP: &str = "DOCQA_CHUNK_OVERLAP";
pub const ENV_TOP_K: &str = "DOCQA_TOP_K";
pub const ENV_MAX_ANSWER_TOKENS: &str = "DOCQA_MAX_ANSWER_TOKENS";
pub const ENV_GENERATION_TIMEOUT_SECS: &str = "DOCQA_GENERATION_TIMEOUT_SECS";
pub const ENV_EMBEDDING_CONCURRENCY: &str = "DOCQA_EMBEDDING_CONCURRENCY";

pub const DEFAULT_MODEL_SERVER_URL: &str = "http://127.0.0.1:11434";

/// Process-level knobs shared by every session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocQaSettings {
    model_server_url: String,
    chunk_size: usize,
    chunk_overlap: usize,
    top_k: usize,
    max_answer_tokens: usize,
    generation_timeout: Duration,
    embedding_concurrency: usize,
}

impl Default for DocQaSettings {
    fn default() -> Self {
        Self {
            model_server_url: DEFAULT_MODEL_SERVER_URL.to_string(),
            chunk_size: 1000,
            chunk_overlap: 100,
            top_k: 4,
            max_answer_tokens: 256,
            generation_timeout: Duration::from_secs(120),
            embedding_concurrency: 8,
        }
    }
}

impl DocQaSettings {
    pub fn builder() -> DocQaSettingsBuilder {
        DocQaSettingsBuilder::default()
    }

    /// Defaults overridden by every `DOCQA_*` variable that is set.
    pub fn from_env() -> DocqaResult<Self> {
        Self::builder().from_env().build()
    }

    pub fn model_server_url(&self) -> &str {
        &self.model_server_url
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    pub fn max_answer_tokens(&self) -> usize {
        self.max_answer_tokens
    }

    pub fn generation_timeout(&self) -> Duration {
        self.generation_timeout
    }

    pub fn embedding_concurrency(&self) -> usize {
        self.embedding_concurrency
    }

    pub fn splitter(&self) -> DocqaResult<TextSplitter> {
        Ok(TextSplitter::new(self.chunk_size, self.chunk_overlap)?)
    }
}

#[derive(Clone, Debug, Default)]
pub struct DocQaSettingsBuilder {
    model_server_url: Option<String>,
    chunk_size: Option<usize>,
    chunk_overlap: Option<usize>,
    top_k: Option<usize>,
    max_answer_tokens: Option<usize>,
    generation_timeout: Option<Duration>,
    embedding_concurrency: Option<usize>,
    env_errors: Vec<String>,
}

impl DocQaSettingsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn model_server_url(mut self, value: impl Into<String>) -> Self {
        self.model_server_url = Some(value.into());
        self
    }

    pub fn chunk_size(mut self, value: usize) -> Self {
        self.chunk_size = Some(value);
        self
    }

    pub fn chunk_overlap(mut self, value: usize) -> Self {
        self.chunk_overlap = Some(value);
        self
    }

    pub fn top_k(mut self, value: usize) -> Self {
        self.top_k = Some(value);
        self
    }

    pub fn max_answer_tokens(mut self, value: usize) -> Self {
        self.max_answer_tokens = Some(value);
        self
    }

    pub fn generation_timeout(mut self, value: Duration) -> Self {
        self.generation_timeout = Some(value);
        self
    }

    pub fn embedding_concurrency(mut self, value: usize) -> Self {
        self.embedding_concurrency = Some(value);
        self
    }

    pub fn model_server_url_from_env(mut self, var_name: &str) -> Self {
        if let Ok(value) = std::env::var(var_name) {
            self.model_server_url = Some(value);
        }
        self
    }

    fn parse_env<T: FromStr>(&mut self, var_name: &str) -> Option<T> {
        let raw = std::env::var(var_name).ok()?;
        match raw.trim().parse() {
            Ok(value) => Some(value),
            Err(_) => {
                self.env_errors.push(format!("{var_name}={raw:?} is not a valid number"));
                None
            }
        }
    }

    /// Applies every `DOCQA_*` variable that is set. Unparseable values are
    /// reported by [`DocQaSettingsBuilder::build`].
    pub fn from_env(mut self) -> Self {
        self = self.model_server_url_from_env(ENV_MODEL_SERVER_URL);
        if let Some(value) = self.parse_env(ENV_CHUNK_SIZE) {
            self.chunk_size = Some(value);
        }
        if let Some(value) = self.parse_env(ENV_CHUNK_OVERLAP) {
            self.chunk_overlap = Some(value);
        }
        if let Some(value) = self.parse_env(ENV_TOP_K) {
            self.top_k = Some(value);
        }
        if let Some(value) = self.parse_env(ENV_MAX_ANSWER_TOKENS) {
            self.max_answer_tokens = Some(value);
        }
        if let Some(secs) = self.parse_env::<u64>(ENV_GENERATION_TIMEOUT_SECS) {
            self.generation_timeout = Some(Duration::from_secs(secs));
        }
        if let Some(value) = self.parse_env(ENV_EMBEDDING_CONCURRENCY) {
            self.embedding_concurrency = Some(value);
        }
        self
    }

    pub fn build(self) -> DocqaResult<DocQaSettings> {
        if let Some(error) = self.env_errors.first() {
            return Err(DocqaError::InvalidConfiguration(error.clone()));
        }
        let defaults = DocQaSettings::default();
        let settings = DocQaSettings {
            model_server_url: self.model_server_url.unwrap_or(defaults.model_server_url),
            chunk_size: self.chunk_size.unwrap_or(defaults.chunk_size),
            chunk_overlap: self.chunk_overlap.unwrap_or(defaults.chunk_overlap),
            top_k: self.top_k.unwrap_or(defaults.top_k),
            max_answer_tokens: self.max_answer_tokens.unwrap_or(defaults.max_answer_tokens),
            generation_timeout: self.generation_timeout.unwrap_or(defaults.generation_timeout),
            embedding_concurrency: self
                .embedding_concurrency
                .unwrap_or(defaults.embedding_concurrency),
        };

        let invalid = |message: &str| Err(DocqaError::InvalidConfiguration(message.to_string()));
        if settings.model_server_url.trim().is_empty() {
            return invalid("model server url must not be empty");
        }
        if settings.top_k == 0 {
            return invalid("top_k must be greater than 0");
        }
        if settings.max_answer_tokens == 0 {
            return invalid("max_answer_tokens must be greater than 0");
        }
        if settings.generation_timeout.is_zero() {
            return invalid("generation timeout must be greater than 0");
        }
        if settings.embedding_concurrency == 0 {
            return invalid("embedding concurrency must be greater than 0");
        }
        settings.splitter()?;
        Ok(settings)
    }
}
