//! Audio object storage abstraction.
//!
//! Ingestion uploads the raw audio under a namespaced key and hands the
//! resulting locator to the transcription service.

mod local;

pub use local::LocalObjectStore;

use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Trait for object store implementations.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload a local file under the given key and return its locator.
    async fn upload(&self, local_path: &Path, key: &str) -> Result<String>;
}
