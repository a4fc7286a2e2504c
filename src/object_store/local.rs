//! Filesystem-backed object store.
//!
//! Copies uploaded audio into the data directory and uses the absolute file
//! path as the object locator.

use super::ObjectStore;
use crate::error::{DagbokError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Object store rooted at a local directory.
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    /// Create a store rooted at the given directory, creating it if needed.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn upload(&self, local_path: &Path, key: &str) -> Result<String> {
        let dest = self.root.join(key);
        tokio::fs::copy(local_path, &dest)
            .await
            .map_err(|e| DagbokError::ObjectStore(format!("Upload of {:?} failed: {}", local_path, e)))?;

        debug!("Uploaded {:?} as {:?}", local_path, dest);

        let locator = dest
            .canonicalize()
            .map_err(|e| DagbokError::ObjectStore(format!("Cannot resolve {:?}: {}", dest, e)))?;
        Ok(locator.to_string_lossy().into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upload_copies_under_key() {
        let src_dir = tempfile::tempdir().unwrap();
        let store_dir = tempfile::tempdir().unwrap();

        let src = src_dir.path().join("note1.wav");
        std::fs::write(&src, b"RIFF").unwrap();

        let store = LocalObjectStore::new(store_dir.path()).unwrap();
        let locator = store.upload(&src, "abc-note1.wav").await.unwrap();

        assert!(locator.ends_with("abc-note1.wav"));
        assert_eq!(std::fs::read(&locator).unwrap(), b"RIFF");
    }

    #[tokio::test]
    async fn test_upload_missing_source_fails() {
        let store_dir = tempfile::tempdir().unwrap();
        let store = LocalObjectStore::new(store_dir.path()).unwrap();

        let err = store
            .upload(Path::new("/no/such/file.wav"), "k.wav")
            .await
            .unwrap_err();
        assert!(matches!(err, DagbokError::ObjectStore(_)));
    }
}
