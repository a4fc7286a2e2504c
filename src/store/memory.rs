//! In-memory transcript store implementation.
//!
//! Useful for testing the pipelines without touching disk.

use super::{TranscriptEntry, TranscriptStore};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::RwLock;

/// In-memory transcript store.
pub struct MemoryTranscriptStore {
    entries: RwLock<Vec<TranscriptEntry>>,
}

impl MemoryTranscriptStore {
    /// Create a new in-memory transcript store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }
}

impl Default for MemoryTranscriptStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranscriptStore for MemoryTranscriptStore {
    async fn put(&self, entry: &TranscriptEntry) -> Result<()> {
        let mut entries = self.entries.write().unwrap();
        entries.push(entry.clone());
        Ok(())
    }

    async fn scan(&self) -> Result<Vec<TranscriptEntry>> {
        // Insertion order doubles as chronological order here.
        let entries = self.entries.read().unwrap();
        Ok(entries.clone())
    }

    async fn count(&self) -> Result<usize> {
        let entries = self.entries.read().unwrap();
        Ok(entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_and_scan_preserve_order() {
        let store = MemoryTranscriptStore::new();

        let first = TranscriptEntry::new("a.wav".into(), "first entry".into());
        let second = TranscriptEntry::new("b.wav".into(), "second entry".into());
        store.put(&first).await.unwrap();
        store.put(&second).await.unwrap();

        let entries = store.scan().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].entry_id, first.entry_id);
        assert_eq!(entries[1].entry_id, second.entry_id);
        assert_eq!(store.count().await.unwrap(), 2);
    }
}
