//! Ingest command implementation.

use crate::cli::output::preview;
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;
use std::path::Path;
use tokio_util::sync::CancellationToken;

/// Run the ingest command.
pub async fn run_ingest(file: &str, settings: Settings) -> Result<()> {
    let orchestrator = Orchestrator::new(&settings)?;

    // Ctrl-C stops the polling loop instead of killing the process mid-write
    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_token.cancel();
        }
    });

    let spinner = Output::spinner("Transcribing entry (this can take a while)...");
    let result = orchestrator.ingest(Path::new(file), &cancel).await;
    spinner.finish_and_clear();

    match result {
        Ok(entry) => {
            Output::success("Journal entry stored");
            Output::kv("id", &entry.entry_id.to_string());
            Output::kv("recorded", &entry.timestamp.to_rfc3339());
            Output::kv("audio", &entry.audio_uri);
            Output::kv("transcript", &preview(&entry.transcription, 120));
            Output::info("Run 'dagbok rebuild' to make it searchable.");
            Ok(())
        }
        Err(e) => {
            Output::error(&format!("Ingestion failed: {}", e));
            Err(e.into())
        }
    }
}
