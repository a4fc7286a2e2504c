//! Configuration module for dagbok.
//!
//! Handles loading and managing application settings.

mod settings;

pub use settings::{
    EmbeddingSettings, GeneralSettings, IndexSettings, RagSettings, Settings, StoreSettings,
    TranscriptionSettings,
};
