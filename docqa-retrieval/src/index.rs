use std::time::Instant;

use docqa_core::{Chunk, Embedding};

use crate::{IndexError, IndexResult};

#[derive(Clone, Debug, PartialEq)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f32,
}

#[derive(Clone, Debug)]
struct Entry {
    chunk: Chunk,
    embedding: Vec<f32>,
}

/// Exact cosine-similarity index over the chunks of one document.
///
/// An index is either unbuilt (every search fails with
/// [`IndexError::EmptyIndex`]) or built, possibly from zero chunks, in which
/// case every search returns no results.
#[derive(Clone, Debug, Default)]
pub struct VectorIndex {
    entries: Vec<Entry>,
    dimension: Option<usize>,
    embedder: Option<String>,
}

impl VectorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Embeds every chunk with one batch call and returns the finished index.
    pub async fn build(chunks: Vec<Chunk>, embedder: &dyn Embedding) -> IndexResult<Self> {
        let started = Instant::now();
        let dimension = embedder.dimension();

        let embeddings = if chunks.is_empty() {
            Vec::new()
        } else {
            let texts: Vec<String> = chunks.iter().map(|chunk| chunk.content.clone()).collect();
            embedder.embed_batch(&texts).await?
        };
        if embeddings.len() != chunks.len() {
            return Err(IndexError::BatchLength {
                expected: chunks.len(),
                got: embeddings.len(),
            });
        }
        if let Some(bad) = embeddings.iter().find(|vector| vector.len() != dimension) {
            return Err(IndexError::DimensionMismatch {
                expected: dimension,
                got: bad.len(),
            });
        }

        let entries: Vec<Entry> = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| Entry { chunk, embedding })
            .collect();

        tracing::info!(
            chunks = entries.len(),
            dimension,
            embedder = embedder.name(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "index built"
        );
        Ok(Self {
            entries,
            dimension: Some(dimension),
            embedder: Some(embedder.name().to_string()),
        })
    }

    /// Builds a new index and swaps it in only once it is complete. On error
    /// the current contents are left untouched.
    pub async fn rebuild(&mut self, chunks: Vec<Chunk>, embedder: &dyn Embedding) -> IndexResult<()> {
        let next = Self::build(chunks, embedder).await?;
        *self = next;
        Ok(())
    }

    pub fn is_built(&self) -> bool {
        self.dimension.is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    /// Name of the embedder the index was built with.
    pub fn embedder(&self) -> Option<&str> {
        self.embedder.as_deref()
    }

    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.entries.iter().map(|entry| &entry.chunk)
    }

    /// Embeds `query` with `embedder` and returns up to `k` chunks by
    /// descending score. Equal scores keep chunk order.
    pub async fn search(
        &self,
        query: &str,
        embedder: &dyn Embedding,
        k: usize,
    ) -> IndexResult<Vec<ScoredChunk>> {
        let expected = self.dimension.ok_or(IndexError::EmptyIndex)?;
        if embedder.dimension() != expected {
            return Err(IndexError::DimensionMismatch {
                expected,
                got: embedder.dimension(),
            });
        }
        let query_embedding = embedder.embed_query(query).await?;
        self.search_vector(&query_embedding, k)
    }

    pub fn search_vector(&self, query_embedding: &[f32], k: usize) -> IndexResult<Vec<ScoredChunk>> {
        let expected = self.dimension.ok_or(IndexError::EmptyIndex)?;
        if query_embedding.len() != expected {
            return Err(IndexError::DimensionMismatch {
                expected,
                got: query_embedding.len(),
            });
        }

        let mut scored: Vec<ScoredChunk> = self
            .entries
            .iter()
            .map(|entry| {
                let mut score = cosine_similarity(query_embedding, &entry.embedding);
                if score.is_nan() {
                    score = f32::NEG_INFINITY;
                }
                ScoredChunk {
                    chunk: entry.chunk.clone(),
                    score,
                }
            })
            .collect();

        // `sort_by` is stable, so ties stay in insertion order.
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(k);
        tracing::debug!(k, hits = scored.len(), "index searched");
        Ok(scored)
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}
