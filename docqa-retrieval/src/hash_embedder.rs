use async_trait::async_trait;
use docqa_core::{Embedding, EmbeddingError};

const FNV_OFFSET: u64 = 14695981039346656037;
const FNV_PRIME: u64 = 1099511628211;

fn fnv1a(bytes: &[u8], seed: u64) -> u64 {
    let mut hash = FNV_OFFSET ^ seed;
    for byte in bytes {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Deterministic bag-of-words embedder: every lowercase alphanumeric token is
/// hashed into one of `dimension` buckets and the counts are L2-normalized.
/// Needs no model, so it serves offline runs and tests.
#[derive(Clone, Debug)]
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn hash_to_vec(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }
        let mut vec = vec![0.0f32; self.dimension];
        let tokens = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|token| !token.is_empty());
        for token in tokens {
            let bucket = fnv1a(token.to_lowercase().as_bytes(), 0) % self.dimension as u64;
            vec[bucket as usize] += 1.0;
        }
        let norm = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut vec {
                *x /= norm;
            }
        }
        Ok(vec)
    }
}

#[async_trait]
impl Embedding for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.hash_to_vec(text)
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        texts.iter().map(|text| self.hash_to_vec(text)).collect()
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        "hash"
    }
}
