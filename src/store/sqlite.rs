//! SQLite-based transcript store implementation.

use super::{TranscriptEntry, TranscriptStore};
use crate::error::{DagbokError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Mutex;
use tracing::{info, instrument};
use uuid::Uuid;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS entries (
    entry_id TEXT PRIMARY KEY,
    timestamp TEXT NOT NULL,
    audio_uri TEXT NOT NULL,
    transcription TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_entries_timestamp ON entries(timestamp);
"#;

/// SQLite-based transcript store.
pub struct SqliteTranscriptStore {
    conn: Mutex<Connection>,
}

impl SqliteTranscriptStore {
    /// Open (or create) a transcript store at the given path.
    #[instrument(skip_all)]
    pub fn new(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // WAL for better concurrent read behavior
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(SCHEMA)?;

        info!("Initialized transcript store at {:?}", path);

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn row_to_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<(String, String, String, String)> {
        Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
    }

    fn parse_entry(
        (entry_id, timestamp, audio_uri, transcription): (String, String, String, String),
    ) -> Result<TranscriptEntry> {
        let entry_id = Uuid::parse_str(&entry_id)
            .map_err(|e| DagbokError::Store(format!("Invalid entry_id: {}", e)))?;
        let timestamp = DateTime::parse_from_rfc3339(&timestamp)
            .map_err(|e| DagbokError::Store(format!("Invalid timestamp: {}", e)))?
            .with_timezone(&Utc);
        Ok(TranscriptEntry {
            entry_id,
            timestamp,
            audio_uri,
            transcription,
        })
    }
}

#[async_trait]
impl TranscriptStore for SqliteTranscriptStore {
    async fn put(&self, entry: &TranscriptEntry) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO entries (entry_id, timestamp, audio_uri, transcription)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                entry.entry_id.to_string(),
                entry.timestamp.to_rfc3339(),
                entry.audio_uri,
                entry.transcription,
            ],
        )?;
        Ok(())
    }

    async fn scan(&self) -> Result<Vec<TranscriptEntry>> {
        let conn = self.conn.lock().unwrap();
        // entry_id as a secondary key keeps the corpus order deterministic
        // when two entries share a timestamp
        let mut stmt = conn.prepare(
            "SELECT entry_id, timestamp, audio_uri, transcription
             FROM entries ORDER BY timestamp, entry_id",
        )?;
        let rows = stmt
            .query_map([], Self::row_to_entry)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        drop(stmt);
        drop(conn);

        rows.into_iter().map(Self::parse_entry).collect()
    }

    async fn count(&self) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_scan_roundtrip() {
        let store = SqliteTranscriptStore::in_memory().unwrap();

        let entry = TranscriptEntry::new("file:///audio/a.wav".into(), "went for a walk".into());
        store.put(&entry).await.unwrap();

        let entries = store.scan().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].entry_id, entry.entry_id);
        assert_eq!(entries[0].audio_uri, "file:///audio/a.wav");
        assert_eq!(entries[0].transcription, "went for a walk");
        assert_eq!(entries[0].timestamp, entry.timestamp);
    }

    #[tokio::test]
    async fn test_scan_orders_by_timestamp() {
        let store = SqliteTranscriptStore::in_memory().unwrap();

        let mut older = TranscriptEntry::new("a.wav".into(), "older".into());
        older.timestamp = older.timestamp - chrono::Duration::hours(1);
        let newer = TranscriptEntry::new("b.wav".into(), "newer".into());

        // Insert newest first; scan must still come back oldest first.
        store.put(&newer).await.unwrap();
        store.put(&older).await.unwrap();

        let entries = store.scan().await.unwrap();
        assert_eq!(entries[0].transcription, "older");
        assert_eq!(entries[1].transcription, "newer");
    }

    #[tokio::test]
    async fn test_duplicate_entry_id_rejected() {
        let store = SqliteTranscriptStore::in_memory().unwrap();
        let entry = TranscriptEntry::new("a.wav".into(), "once".into());
        store.put(&entry).await.unwrap();
        assert!(store.put(&entry).await.is_err());
    }
}
