//! Error types for dagbok.

use thiserror::Error;

/// Library-level error type for dagbok operations.
#[derive(Error, Debug)]
pub enum DagbokError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Object store error: {0}")]
    ObjectStore(String),

    #[error("Transcription service error: {0}")]
    Transcription(String),

    #[error("Transcription job failed: {0}")]
    JobFailed(String),

    #[error("Malformed transcription result: {0}")]
    MalformedResult(String),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Completion failed: {0}")]
    Completion(String),

    #[error("Transcript store error: {0}")]
    Store(String),

    #[error("Index error: {0}")]
    Index(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Coarse failure classification for callers that only need to know
/// which collaborator or stage gave out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required file or persisted artifact does not exist.
    NotFound,
    /// An external service returned an error or reported a failed job.
    Upstream,
    /// A service responded, but with a document we could not interpret.
    Parse,
    /// Bad settings, credentials, or caller input.
    Config,
}

impl DagbokError {
    /// Map this error onto its coarse [`ErrorKind`].
    pub fn kind(&self) -> ErrorKind {
        match self {
            DagbokError::NotFound(_) => ErrorKind::NotFound,
            DagbokError::Io(e) if e.kind() == std::io::ErrorKind::NotFound => ErrorKind::NotFound,
            DagbokError::ObjectStore(_)
            | DagbokError::Transcription(_)
            | DagbokError::JobFailed(_)
            | DagbokError::Embedding(_)
            | DagbokError::Completion(_)
            | DagbokError::Store(_)
            | DagbokError::Http(_)
            | DagbokError::Database(_)
            | DagbokError::OpenAI(_)
            | DagbokError::Io(_) => ErrorKind::Upstream,
            DagbokError::MalformedResult(_)
            | DagbokError::Json(_)
            | DagbokError::TomlParse(_)
            | DagbokError::Index(_) => ErrorKind::Parse,
            DagbokError::Config(_) | DagbokError::InvalidInput(_) => ErrorKind::Config,
        }
    }
}

/// Result type alias for dagbok operations.
pub type Result<T> = std::result::Result<T, DagbokError>;
