use anyhow::Result;
use docqa_rag::{AnswerResult, DocQa, SessionState};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

pub fn print_answer(result: &AnswerResult, show_sources: bool) {
    println!("{}", result.answer);
    if show_sources {
        for (rank, hit) in result.sources.iter().enumerate() {
            let preview: String = hit.chunk.content.chars().take(80).collect();
            println!(
                "  [{}] {:.3} {}: {}",
                rank + 1,
                hit.score,
                hit.chunk.source,
                preview.replace('\n', " ")
            );
        }
    }
}

/// Answers one question per line until EOF, `quit` or `exit`.
pub async fn run(qa: &mut DocQa, show_sources: bool) -> Result<()> {
    let mut editor = DefaultEditor::new()?;
    println!("Ask a question about the document. Type quit to exit.");

    loop {
        let line = match editor.readline("docqa> ") {
            Ok(line) => line,
            Err(ReadlineError::Eof | ReadlineError::Interrupted) => break,
            Err(err) => return Err(err.into()),
        };
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if matches!(question, "quit" | "exit") {
            break;
        }
        if let Err(err) = editor.add_history_entry(question) {
            tracing::debug!(error = %err, "history entry not recorded");
        }

        match qa.answer(question).await {
            Ok(result) => print_answer(&result, show_sources),
            Err(err) => {
                eprintln!("error: {err}");
                recover(qa).await;
            }
        }
    }
    Ok(())
}

/// Gets a failed session back to answering. The live index is reused when
/// one survived; otherwise the document is ingested again. A failed
/// re-ingest is reported and the loop keeps reading.
async fn recover(qa: &mut DocQa) {
    if !matches!(qa.state(), SessionState::Failed { .. }) || qa.resume() {
        return;
    }
    eprintln!("re-indexing document");
    if let Err(err) = qa.ingest().await {
        eprintln!("error: {err}");
    }
}
