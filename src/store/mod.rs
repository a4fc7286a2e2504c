//! Durable storage for journal transcript entries.
//!
//! Provides a trait-based interface so the ingestion and index pipelines can
//! run against SQLite in production and an in-memory store in tests.

mod memory;
mod sqlite;

pub use memory::MemoryTranscriptStore;
pub use sqlite::SqliteTranscriptStore;

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single ingested journal entry.
///
/// Created exactly once when a transcription job completes; never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// Unique entry ID.
    pub entry_id: Uuid,
    /// When the entry was ingested (UTC).
    pub timestamp: DateTime<Utc>,
    /// Locator of the uploaded source audio object.
    pub audio_uri: String,
    /// Full transcript text.
    pub transcription: String,
}

impl TranscriptEntry {
    /// Create a new entry stamped with the current time.
    pub fn new(audio_uri: String, transcription: String) -> Self {
        Self {
            entry_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            audio_uri,
            transcription,
        }
    }
}

/// Trait for transcript store implementations.
#[async_trait]
pub trait TranscriptStore: Send + Sync {
    /// Persist an entry.
    async fn put(&self, entry: &TranscriptEntry) -> Result<()>;

    /// Return all entries in a stable order (oldest first).
    ///
    /// The returned order is the authoritative corpus order used by the
    /// index builder, so it must be deterministic across calls.
    async fn scan(&self) -> Result<Vec<TranscriptEntry>>;

    /// Total number of stored entries.
    async fn count(&self) -> Result<usize>;
}
