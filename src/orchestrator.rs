//! Ingestion orchestrator: audio file in, persisted transcript entry out.
//!
//! Uploads the recording under a collision-free key, drives the transcription
//! job through the poller, and writes the resulting entry to the transcript
//! store. Any failure abandons the whole ingestion; no entry is written for a
//! failed attempt.

use crate::config::Settings;
use crate::error::{DagbokError, Result};
use crate::object_store::{LocalObjectStore, ObjectStore};
use crate::store::{SqliteTranscriptStore, TranscriptEntry, TranscriptStore};
use crate::transcription::{HttpTranscriptionService, JobPoller};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};
use uuid::Uuid;

/// Coordinates the ingestion pipeline.
pub struct Orchestrator {
    object_store: Arc<dyn ObjectStore>,
    poller: JobPoller,
    store: Arc<dyn TranscriptStore>,
}

impl Orchestrator {
    /// Create an orchestrator with the default collaborators from settings.
    pub fn new(settings: &Settings) -> Result<Self> {
        let object_store = Arc::new(LocalObjectStore::new(settings.data_dir().join("audio"))?);
        let service = Arc::new(HttpTranscriptionService::new(
            &settings.transcription.endpoint,
        )?);
        let poller = JobPoller::new(
            service,
            &settings.transcription.language,
            Duration::from_secs(settings.transcription.poll_interval_secs),
            Duration::from_secs(settings.transcription.poll_deadline_secs),
        );
        let store: Arc<dyn TranscriptStore> =
            Arc::new(SqliteTranscriptStore::new(&settings.sqlite_path())?);

        Ok(Self {
            object_store,
            poller,
            store,
        })
    }

    /// Create an orchestrator with custom collaborators.
    pub fn with_components(
        object_store: Arc<dyn ObjectStore>,
        poller: JobPoller,
        store: Arc<dyn TranscriptStore>,
    ) -> Self {
        Self {
            object_store,
            poller,
            store,
        }
    }

    /// Get a reference to the transcript store.
    pub fn store(&self) -> Arc<dyn TranscriptStore> {
        self.store.clone()
    }

    /// Ingest a local audio file: upload, transcribe, persist.
    #[instrument(skip(self, cancel), fields(path = %local_path.display()))]
    pub async fn ingest(
        &self,
        local_path: &Path,
        cancel: &CancellationToken,
    ) -> Result<TranscriptEntry> {
        if !local_path.exists() {
            return Err(DagbokError::NotFound(format!(
                "Audio file {:?} does not exist",
                local_path
            )));
        }

        let file_name = local_path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                DagbokError::InvalidInput(format!("Path {:?} has no usable file name", local_path))
            })?;

        // Fresh prefix so same-named recordings never collide
        let key = format!("{}-{}", Uuid::new_v4(), file_name);
        let audio_uri = self.object_store.upload(local_path, &key).await?;
        info!("Uploaded audio as {}", audio_uri);

        let transcription = self.poller.submit_and_await(&audio_uri, cancel).await?;

        let entry = TranscriptEntry::new(audio_uri, transcription);
        self.store.put(&entry).await?;
        info!("Stored journal entry {}", entry.entry_id);

        Ok(entry)
    }
}
