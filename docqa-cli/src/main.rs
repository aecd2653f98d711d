mod cli;
mod repl;

use anyhow::Context;
use clap::Parser;
use docqa_rag::{DocQa, EmbeddingBackendId, LlmBackendId, UploadedDocument};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::Cli;

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn list_backends() {
    println!("Embedding backends:");
    for id in EmbeddingBackendId::ALL {
        println!("  {:<20} dimension {}", id.as_str(), id.dimension());
    }
    println!("LLM backends:");
    for id in LlmBackendId::ALL {
        let precision = if id.supports_low_precision() {
            "8-bit available"
        } else {
            "full precision only"
        };
        println!("  {:<20} {:?}, {precision}", id.as_str(), id.architecture());
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    let cli = Cli::parse();

    if cli.list_backends {
        list_backends();
        return Ok(());
    }
    let file = cli.file.as_ref().context("--file is required")?;
    let settings = cli.settings()?;

    let mut qa = DocQa::new(settings)?;
    let upload = UploadedDocument::from_path(file)
        .with_context(|| format!("cannot upload {}", file.display()))?;
    qa.configure_upload(upload, &cli.embedding, &cli.llm, cli.low_precision)
        .await?;

    let report = qa.ingest().await?;
    if report.empty {
        eprintln!("warning: {} has no extractable text", file.display());
    } else {
        eprintln!(
            "indexed {} chunks from {} segments",
            report.chunks, report.segments
        );
    }

    match cli.question.as_deref() {
        Some(question) => {
            let result = qa.answer(question).await?;
            repl::print_answer(&result, cli.show_sources);
        }
        None => repl::run(&mut qa, cli.show_sources).await?,
    }
    Ok(())
}
