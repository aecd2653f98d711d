use std::error::Error;
use std::path::PathBuf;

use docqa_retrieval::{load_and_split, DocumentLoader, HashEmbedder, TextSplitter, VectorIndex};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .ok_or("usage: index_and_query <file.pdf|pptx|xlsx|docx> [question]")?;
    let question = std::env::args()
        .nth(2)
        .unwrap_or_else(|| "What is this document about?".to_string());

    let declared = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_string();
    let loader = DocumentLoader::from_declared(&path, &declared)?;
    let splitter = TextSplitter::new(1000, 100)?;
    let (segments, chunks) = load_and_split(loader, &splitter).await?;
    println!("Loaded {} segments, {} chunks", segments.len(), chunks.len());

    let embedder = HashEmbedder::new(256);
    let index = VectorIndex::build(chunks, &embedder).await?;
    for hit in index.search(&question, &embedder, 3).await? {
        let preview: String = hit.chunk.content.chars().take(60).collect();
        println!("{:.3}  {}  {}", hit.score, hit.chunk.source, preview);
    }
    Ok(())
}
