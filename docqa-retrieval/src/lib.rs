mod error;
mod hash_embedder;
mod index;
mod loader;
mod ooxml;
mod splitter;

use docqa_core::{Chunk, Segment};

pub use error::{IndexError, IndexResult, IngestionError, SplitterConfigError};
pub use hash_embedder::HashEmbedder;
pub use index::{ScoredChunk, VectorIndex};
pub use loader::DocumentLoader;
pub use splitter::TextSplitter;

/// Loads a document off the async runtime and splits it into chunks.
pub async fn load_and_split(
    loader: DocumentLoader,
    splitter: &TextSplitter,
) -> Result<(Vec<Segment>, Vec<Chunk>), IngestionError> {
    let segments = loader.load_async().await?;
    let chunks = splitter.split(&segments);
    Ok((segments, chunks))
}
