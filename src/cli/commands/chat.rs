//! Chat command implementation: an interactive question loop.

use crate::cli::Output;
use crate::completion::OpenAIChatClient;
use crate::config::Settings;
use crate::embedding::OpenAIEmbedder;
use crate::index::IndexBuilder;
use crate::rag::RagEngine;
use crate::store::SqliteTranscriptStore;
use anyhow::Result;
use std::io::{BufRead, Write};
use std::sync::Arc;

/// Run the chat command.
pub async fn run_chat(model: Option<String>, settings: Settings) -> Result<()> {
    let store = Arc::new(SqliteTranscriptStore::new(&settings.sqlite_path())?);
    let embedder = Arc::new(OpenAIEmbedder::with_config(
        &settings.embedding.model,
        settings.embedding.dimensions as usize,
    ));
    let builder = IndexBuilder::new(store, embedder.clone(), settings.index_dir());

    let spinner = Output::spinner("Loading index...");
    let index = builder.load_or_rebuild().await?;
    spinner.finish_and_clear();

    let model = model.unwrap_or_else(|| settings.rag.model.clone());
    let engine = RagEngine::new(
        embedder,
        Arc::new(OpenAIChatClient::new(&model)),
        settings.rag.top_k,
    );

    Output::info(&format!(
        "Chatting over {} entries. Type 'exit' or 'quit' to leave.",
        index.len()
    ));

    let stdin = std::io::stdin();
    loop {
        print!("\n> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if matches!(question.to_lowercase().as_str(), "exit" | "quit") {
            break;
        }

        let spinner = Output::spinner("Searching...");
        let result = engine.answer(question, &index).await;
        spinner.finish_and_clear();

        match result {
            Ok(response) => println!("\n{}", response.answer),
            Err(e) => Output::error(&format!("Failed to answer: {}", e)),
        }
    }

    Ok(())
}
