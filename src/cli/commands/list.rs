//! List command implementation.

use crate::cli::output::preview;
use crate::cli::Output;
use crate::config::Settings;
use crate::store::{SqliteTranscriptStore, TranscriptStore};
use anyhow::Result;
use std::sync::Arc;

/// Run the list command.
pub async fn run_list(settings: Settings) -> Result<()> {
    let store = Arc::new(SqliteTranscriptStore::new(&settings.sqlite_path())?);

    let entries = store.scan().await?;
    if entries.is_empty() {
        Output::warning("No journal entries yet. Use 'dagbok ingest <file>' to add one.");
        return Ok(());
    }

    Output::header(&format!("Journal entries ({})", entries.len()));
    for entry in &entries {
        Output::entry(
            &entry.entry_id.to_string(),
            &entry.timestamp.format("%Y-%m-%d %H:%M").to_string(),
            &preview(&entry.transcription, 100),
        );
    }

    Ok(())
}
