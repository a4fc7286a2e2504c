//! Rebuild command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::embedding::OpenAIEmbedder;
use crate::index::IndexBuilder;
use crate::store::SqliteTranscriptStore;
use anyhow::Result;
use std::sync::Arc;

/// Run the rebuild command.
pub async fn run_rebuild(settings: Settings) -> Result<()> {
    let store = Arc::new(SqliteTranscriptStore::new(&settings.sqlite_path())?);
    let embedder = Arc::new(OpenAIEmbedder::with_config(
        &settings.embedding.model,
        settings.embedding.dimensions as usize,
    ));
    let builder = IndexBuilder::new(store, embedder, settings.index_dir());

    let spinner = Output::spinner("Rebuilding index from all entries...");
    let result = builder.rebuild().await;
    spinner.finish_and_clear();

    match result {
        Ok(index) => {
            Output::success(&format!("Index rebuilt over {} entries", index.len()));
            Ok(())
        }
        Err(e) => {
            Output::error(&format!("Rebuild failed: {}", e));
            Err(e.into())
        }
    }
}
