//! Build, persist, and load the similarity index over the transcript corpus.

use super::FlatIndex;
use crate::embedding::Embedder;
use crate::error::{DagbokError, Result};
use crate::store::TranscriptStore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, instrument};

const INDEX_FILE: &str = "index.json";
const DOCS_FILE: &str = "documents.json";
const VECTORS_FILE: &str = "vectors.json";

/// A loaded similarity index with its parallel document list and raw vectors.
///
/// Position `i` is the same entry in all three fields. The handle is owned
/// explicitly by the caller and replaced wholesale on rebuild; there is no
/// ambient shared state.
#[derive(Debug, Clone)]
pub struct VectorIndex {
    /// The searchable index.
    pub index: FlatIndex,
    /// Transcript texts, in the same order as the vectors.
    pub documents: Vec<String>,
    /// The raw embedding matrix the index was built from.
    pub vectors: Vec<Vec<f32>>,
}

impl VectorIndex {
    /// Number of indexed documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the corpus is empty.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Builds the similarity index from the transcript store.
pub struct IndexBuilder {
    store: Arc<dyn TranscriptStore>,
    embedder: Arc<dyn Embedder>,
    index_dir: PathBuf,
}

impl IndexBuilder {
    /// Create a builder persisting its artifacts under `index_dir`.
    pub fn new(
        store: Arc<dyn TranscriptStore>,
        embedder: Arc<dyn Embedder>,
        index_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            store,
            embedder,
            index_dir: index_dir.into(),
        }
    }

    /// Rebuild the index from the full corpus and persist it.
    ///
    /// Scans the store, embeds every entry with a non-empty transcription in
    /// scan order, and replaces any previously persisted artifact set. An
    /// embedding failure aborts the whole build; partial indexes are never
    /// persisted.
    #[instrument(skip(self))]
    pub async fn rebuild(&self) -> Result<VectorIndex> {
        let entries = self.store.scan().await?;
        let documents: Vec<String> = entries
            .into_iter()
            .map(|e| e.transcription)
            .filter(|t| !t.is_empty())
            .collect();

        info!("Rebuilding index over {} entries", documents.len());

        let mut index = FlatIndex::new(self.embedder.dimensions());
        let mut vectors = Vec::with_capacity(documents.len());
        for (i, doc) in documents.iter().enumerate() {
            // One request per document, in corpus order
            let vector = self.embedder.embed(doc).await?;
            debug!("Embedded document {}/{}", i + 1, documents.len());
            index.add(vector.clone())?;
            vectors.push(vector);
        }

        let built = VectorIndex {
            index,
            documents,
            vectors,
        };
        self.persist(&built)?;
        info!("Index rebuilt and persisted to {:?}", self.index_dir);
        Ok(built)
    }

    /// Load a previously persisted index, or `None` if no build exists.
    ///
    /// A successful load is query-ready; nothing is re-embedded.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<Option<VectorIndex>> {
        if !self.index_dir.join(INDEX_FILE).exists() {
            return Ok(None);
        }

        let index: FlatIndex = read_artifact(&self.index_dir.join(INDEX_FILE))?;
        let documents: Vec<String> = read_artifact(&self.index_dir.join(DOCS_FILE))?;
        let vectors: Vec<Vec<f32>> = read_artifact(&self.index_dir.join(VECTORS_FILE))?;

        // The three artifacts are written as a unit; a length mismatch means
        // the set was mixed across builds.
        if index.len() != documents.len() || index.len() != vectors.len() {
            return Err(DagbokError::Index(format!(
                "Inconsistent artifact set: {} vectors, {} documents, {} raw rows",
                index.len(),
                documents.len(),
                vectors.len()
            )));
        }

        Ok(Some(VectorIndex {
            index,
            documents,
            vectors,
        }))
    }

    /// Load the persisted index if present, otherwise rebuild from the store.
    pub async fn load_or_rebuild(&self) -> Result<VectorIndex> {
        match self.load().await? {
            Some(index) => Ok(index),
            None => self.rebuild().await,
        }
    }

    /// Write all three artifacts into a staging directory, then swap it in.
    ///
    /// Readers never observe a half-written artifact set.
    fn persist(&self, built: &VectorIndex) -> Result<()> {
        let parent = self
            .index_dir
            .parent()
            .ok_or_else(|| DagbokError::Index("Index directory has no parent".into()))?;
        std::fs::create_dir_all(parent)?;

        // Staged beside the target so the final rename stays on one filesystem
        let staging = tempfile::Builder::new()
            .prefix(".index-staging")
            .tempdir_in(parent)?;

        write_artifact(&staging.path().join(INDEX_FILE), &built.index)?;
        write_artifact(&staging.path().join(DOCS_FILE), &built.documents)?;
        write_artifact(&staging.path().join(VECTORS_FILE), &built.vectors)?;

        if self.index_dir.exists() {
            std::fs::remove_dir_all(&self.index_dir)?;
        }
        std::fs::rename(staging.keep(), &self.index_dir)?;
        Ok(())
    }
}

fn write_artifact<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_vec(value)?;
    std::fs::write(path, json)?;
    Ok(())
}

fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read(path)?;
    Ok(serde_json::from_slice(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryTranscriptStore, TranscriptEntry};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Embedder stub that maps each text to a distinct small vector.
    struct StubEmbedder {
        calls: AtomicUsize,
    }

    impl StubEmbedder {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Embedder for StubEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            // Encode the text length so every distinct document gets a
            // distinct, reproducible vector.
            Ok(vec![text.len() as f32, text.bytes().next().unwrap_or(0) as f32, 1.0])
        }

        fn dimensions(&self) -> usize {
            3
        }
    }

    /// Embedder stub that always fails.
    struct FailingEmbedder;

    #[async_trait]
    impl Embedder for FailingEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Err(DagbokError::Embedding("quota exceeded".into()))
        }

        fn dimensions(&self) -> usize {
            3
        }
    }

    async fn seeded_store(texts: &[&str]) -> Arc<MemoryTranscriptStore> {
        let store = Arc::new(MemoryTranscriptStore::new());
        for text in texts {
            store
                .put(&TranscriptEntry::new("audio.wav".into(), text.to_string()))
                .await
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_rebuild_preserves_corpus_order() {
        let store = seeded_store(&["alpha", "bee", "gamma ray"]).await;
        let embedder = Arc::new(StubEmbedder::new());
        let dir = tempfile::tempdir().unwrap();

        let builder = IndexBuilder::new(store, embedder.clone(), dir.path().join("index"));
        let built = builder.rebuild().await.unwrap();

        assert_eq!(built.documents, vec!["alpha", "bee", "gamma ray"]);
        assert_eq!(built.len(), 3);
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 3);

        // Position i of the vector matrix is the embedding of document i.
        for (doc, vector) in built.documents.iter().zip(&built.vectors) {
            assert_eq!(vector[0], doc.len() as f32);
        }
    }

    #[tokio::test]
    async fn test_rebuild_skips_empty_transcriptions() {
        let store = seeded_store(&["kept", "", "also kept"]).await;
        let dir = tempfile::tempdir().unwrap();
        let builder = IndexBuilder::new(
            store,
            Arc::new(StubEmbedder::new()),
            dir.path().join("index"),
        );

        let built = builder.rebuild().await.unwrap();
        assert_eq!(built.documents, vec!["kept", "also kept"]);
    }

    #[tokio::test]
    async fn test_load_roundtrip_matches_fresh_build() {
        let store = seeded_store(&["morning pages", "evening review"]).await;
        let dir = tempfile::tempdir().unwrap();
        let builder = IndexBuilder::new(
            store,
            Arc::new(StubEmbedder::new()),
            dir.path().join("index"),
        );

        let built = builder.rebuild().await.unwrap();
        let loaded = builder.load().await.unwrap().expect("index should exist");

        assert_eq!(loaded.documents, built.documents);
        assert_eq!(loaded.vectors, built.vectors);
        assert_eq!(loaded.index.len(), built.index.len());

        // Query-ready without re-embedding: same neighbors as the fresh build.
        let query = vec![13.0, b'm' as f32, 1.0];
        assert_eq!(loaded.index.search(&query, 2), built.index.search(&query, 2));
    }

    #[tokio::test]
    async fn test_load_absent_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let builder = IndexBuilder::new(
            Arc::new(MemoryTranscriptStore::new()),
            Arc::new(StubEmbedder::new()),
            dir.path().join("never-built"),
        );

        assert!(builder.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_embedding_failure_persists_nothing() {
        let store = seeded_store(&["doomed"]).await;
        let dir = tempfile::tempdir().unwrap();
        let index_dir = dir.path().join("index");
        let builder = IndexBuilder::new(store, Arc::new(FailingEmbedder), index_dir.clone());

        assert!(builder.rebuild().await.is_err());
        assert!(!index_dir.exists());
    }

    #[tokio::test]
    async fn test_rebuild_replaces_previous_build() {
        let store = Arc::new(MemoryTranscriptStore::new());
        store
            .put(&TranscriptEntry::new("a.wav".into(), "first".into()))
            .await
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let builder = IndexBuilder::new(
            store.clone(),
            Arc::new(StubEmbedder::new()),
            dir.path().join("index"),
        );

        builder.rebuild().await.unwrap();

        store
            .put(&TranscriptEntry::new("b.wav".into(), "second".into()))
            .await
            .unwrap();
        builder.rebuild().await.unwrap();

        let loaded = builder.load().await.unwrap().unwrap();
        assert_eq!(loaded.documents, vec!["first", "second"]);
    }
}
