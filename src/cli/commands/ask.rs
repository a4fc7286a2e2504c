//! Ask command implementation.

use crate::cli::output::preview;
use crate::cli::Output;
use crate::completion::OpenAIChatClient;
use crate::config::Settings;
use crate::embedding::OpenAIEmbedder;
use crate::index::IndexBuilder;
use crate::rag::RagEngine;
use crate::store::SqliteTranscriptStore;
use anyhow::Result;
use std::sync::Arc;

/// Run the ask command.
pub async fn run_ask(
    question: &str,
    model: Option<String>,
    top_k: Option<usize>,
    settings: Settings,
) -> Result<()> {
    let store = Arc::new(SqliteTranscriptStore::new(&settings.sqlite_path())?);
    let embedder = Arc::new(OpenAIEmbedder::with_config(
        &settings.embedding.model,
        settings.embedding.dimensions as usize,
    ));
    let builder = IndexBuilder::new(store, embedder.clone(), settings.index_dir());

    let spinner = Output::spinner("Loading index...");
    let index = builder.load_or_rebuild().await;
    spinner.finish_and_clear();
    let index = match index {
        Ok(index) => index,
        Err(e) => {
            Output::error(&format!("Could not load or build the index: {}", e));
            return Err(e.into());
        }
    };

    let model = model.unwrap_or_else(|| settings.rag.model.clone());
    let top_k = top_k.unwrap_or(settings.rag.top_k);
    let chat = Arc::new(OpenAIChatClient::new(&model));
    let engine = RagEngine::new(embedder, chat, top_k);

    let spinner = Output::spinner("Searching your journal...");
    let result = engine.answer(question, &index).await;
    spinner.finish_and_clear();

    match result {
        Ok(response) => {
            println!("\n{}\n", response.answer);

            if !response.matches.is_empty() {
                Output::header("Matched entries");
                for entry in &response.matches {
                    Output::retrieved(entry.position, entry.distance, &preview(&entry.content, 100));
                }
            }
            Ok(())
        }
        Err(e) => {
            Output::error(&format!("Failed to generate answer: {}", e));
            Err(e.into())
        }
    }
}
