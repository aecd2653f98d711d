use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use docqa_core::{DocqaError, DocqaResult, Embedding, ErrorKind, Llm};
use docqa_prompt::GroundingPrompt;
use docqa_retrieval::{DocumentLoader, IngestionError, ScoredChunk, TextSplitter, VectorIndex};

use crate::config::ResolvedConfiguration;
use crate::{BackendCache, Configuration, DocQaSettings, UploadedDocument};

/// Where a [`DocQa`] session is in its configure/ingest/answer lifecycle.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionState {
    Unconfigured,
    Configured,
    Indexed,
    Ready,
    /// The last pipeline step failed. Recover with `configure` or `ingest`.
    Failed { kind: ErrorKind, message: String },
}

impl SessionState {
    fn failed(error: &DocqaError) -> Self {
        SessionState::Failed {
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Unconfigured => f.write_str("unconfigured"),
            SessionState::Configured => f.write_str("configured"),
            SessionState::Indexed => f.write_str("indexed"),
            SessionState::Ready => f.write_str("ready"),
            SessionState::Failed { message, .. } => write!(f, "failed: {message}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IngestReport {
    pub segments: usize,
    pub chunks: usize,
    pub dimension: usize,
    /// The document had no extractable text; every search will miss.
    pub empty: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnswerResult {
    pub answer: String,
    /// Retrieved chunks in rank order.
    pub sources: Vec<ScoredChunk>,
}

struct ActiveConfiguration {
    resolved: ResolvedConfiguration,
    document_name: String,
    embedder: Arc<dyn Embedding>,
    llm: Arc<dyn Llm>,
    // Held only to delete the temp file when the configuration is replaced.
    _upload: Option<UploadedDocument>,
}

/// One question-answering session over one document at a time.
pub struct DocQa {
    settings: DocQaSettings,
    splitter: TextSplitter,
    prompt: GroundingPrompt,
    cache: BackendCache,
    state: SessionState,
    active: Option<ActiveConfiguration>,
    index: Option<VectorIndex>,
}

impl DocQa {
    /// A session backed by the model server named in `settings`.
    pub fn new(settings: DocQaSettings) -> DocqaResult<Self> {
        let cache = BackendCache::from_settings(&settings);
        Self::with_cache(settings, cache)
    }

    /// A session that loads backends through a shared cache.
    pub fn with_cache(settings: DocQaSettings, cache: BackendCache) -> DocqaResult<Self> {
        let splitter = settings.splitter()?;
        Ok(Self {
            settings,
            splitter,
            prompt: GroundingPrompt::new(),
            cache,
            state: SessionState::Unconfigured,
            active: None,
            index: None,
        })
    }

    pub fn with_prompt(mut self, prompt: GroundingPrompt) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn settings(&self) -> &DocQaSettings {
        &self.settings
    }

    pub fn configuration(&self) -> Option<&Configuration> {
        self.active.as_ref().map(|active| &active.resolved.config)
    }

    /// Number of chunks in the live index, if any.
    pub fn indexed_chunks(&self) -> Option<usize> {
        self.index.as_ref().map(VectorIndex::len)
    }

    /// Replaces the configuration and loads (or reuses) both backends. Any
    /// previous index is discarded whether or not this succeeds.
    pub async fn configure(&mut self, config: Configuration) -> DocqaResult<()> {
        let name = config
            .document_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| config.document_path.display().to_string());
        self.install(config, name, None).await
    }

    /// Configures the session for an uploaded document. The session owns the
    /// upload from here on; its temp file is removed when the configuration
    /// fails, is replaced, or the session is dropped.
    pub async fn configure_upload(
        &mut self,
        upload: UploadedDocument,
        embedding_backend_id: &str,
        llm_backend_id: &str,
        load_in_low_precision: bool,
    ) -> DocqaResult<()> {
        let config = Configuration::new(
            upload.document_type(),
            upload.path(),
            embedding_backend_id,
            llm_backend_id,
            load_in_low_precision,
        );
        let name = upload.file_name().to_string();
        self.install(config, name, Some(upload)).await
    }

    async fn install(
        &mut self,
        config: Configuration,
        document_name: String,
        upload: Option<UploadedDocument>,
    ) -> DocqaResult<()> {
        self.index = None;
        self.active = None;

        let result = self.load_backends(config).await;
        match result {
            Ok((resolved, embedder, llm)) => {
                tracing::info!(
                    document = %document_name,
                    document_type = %resolved.config.document_type,
                    embedding = resolved.embedding.as_str(),
                    llm = resolved.llm.as_str(),
                    low_precision = resolved.config.load_in_low_precision,
                    "session configured"
                );
                self.active = Some(ActiveConfiguration {
                    resolved,
                    document_name,
                    embedder,
                    llm,
                    _upload: upload,
                });
                self.state = SessionState::Configured;
                Ok(())
            }
            Err(error) => Err(self.fail(error)),
        }
    }

    async fn load_backends(
        &self,
        config: Configuration,
    ) -> DocqaResult<(ResolvedConfiguration, Arc<dyn Embedding>, Arc<dyn Llm>)> {
        let resolved = config.resolve()?;
        let embedder = self.cache.embedding(resolved.embedding).await?;
        let llm = self
            .cache
            .llm(resolved.llm, resolved.config.load_in_low_precision)
            .await?;
        Ok((resolved, embedder, llm))
    }

    fn fail(&mut self, error: DocqaError) -> DocqaError {
        tracing::warn!(kind = ?error.kind(), error = %error, "session failed");
        self.state = SessionState::failed(&error);
        error
    }

    /// Loads, splits and embeds the configured document into a fresh index.
    pub async fn ingest(&mut self) -> DocqaResult<IngestReport> {
        let Some(active) = self.active.as_ref() else {
            return Err(DocqaError::InvalidConfiguration(
                "ingest requires a configuration".to_string(),
            ));
        };
        let started = Instant::now();
        let embedder = Arc::clone(&active.embedder);
        let loader = DocumentLoader::new(
            &active.resolved.config.document_path,
            active.resolved.config.document_type,
        )
        .with_name(active.document_name.clone());
        self.index = None;

        let loaded = loader.load_async().await;
        let (segments, empty) = match loaded {
            Ok(segments) => (segments, false),
            Err(IngestionError::Empty { path }) => {
                tracing::warn!(
                    path = %path.display(),
                    "document has no extractable text; index will be empty"
                );
                (Vec::new(), true)
            }
            Err(error) => return Err(self.fail(error.into())),
        };
        let chunks = self.splitter.split(&segments);
        let chunk_count = chunks.len();

        let built = VectorIndex::build(chunks, embedder.as_ref()).await;
        let index = match built {
            Ok(index) => index,
            Err(error) => return Err(self.fail(error.into())),
        };
        self.index = Some(index);
        self.state = SessionState::Indexed;

        tracing::info!(
            segments = segments.len(),
            chunks = chunk_count,
            dimension = embedder.dimension(),
            empty,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "document ingested"
        );
        Ok(IngestReport {
            segments: segments.len(),
            chunks: chunk_count,
            dimension: embedder.dimension(),
            empty,
        })
    }

    /// Retrieves the top-k chunks for `question` and generates a grounded
    /// answer.
    pub async fn answer(&mut self, question: &str) -> DocqaResult<AnswerResult> {
        let question = question.trim();
        if question.is_empty() {
            return Err(DocqaError::InvalidInput("question is empty".to_string()));
        }
        if !matches!(self.state, SessionState::Indexed | SessionState::Ready) {
            return Err(DocqaError::NotIndexed);
        }
        let (Some(active), Some(index)) = (self.active.as_ref(), self.index.as_ref()) else {
            return Err(DocqaError::NotIndexed);
        };
        let started = Instant::now();
        let embedder = Arc::clone(&active.embedder);
        let llm = Arc::clone(&active.llm);

        let searched = index
            .search(question, embedder.as_ref(), self.settings.top_k())
            .await;
        let sources = match searched {
            Ok(sources) => sources,
            Err(error) => return Err(self.fail(error.into())),
        };
        let built = self
            .prompt
            .build(question, sources.iter().map(|hit| hit.chunk.content.as_str()));
        let prompt = match built {
            Ok(prompt) => prompt,
            Err(error) => return Err(self.fail(error.into())),
        };

        let timeout = self.settings.generation_timeout();
        let generation = llm.generate(&prompt, self.settings.max_answer_tokens());
        let generated = tokio::time::timeout(timeout, generation).await;
        let answer = match generated {
            Ok(Ok(answer)) => answer,
            Ok(Err(error)) => return Err(self.fail(error.into())),
            Err(_) => return Err(self.fail(DocqaError::GenerationTimeout(timeout))),
        };
        self.state = SessionState::Ready;

        tracing::info!(
            llm = llm.name(),
            sources = sources.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "answer generated"
        );
        Ok(AnswerResult { answer, sources })
    }

    /// Clears a failure raised while answering so the live index can serve
    /// the next question. Returns `false`, leaving the state alone, when
    /// there is no index to resume from; only `configure` or `ingest` can
    /// recover then.
    pub fn resume(&mut self) -> bool {
        if !matches!(self.state, SessionState::Failed { .. }) || self.index.is_none() {
            return false;
        }
        tracing::info!(previous = %self.state, "session resumed with live index");
        self.state = SessionState::Indexed;
        true
    }
}
