//! Transcription service interface and job polling.
//!
//! The transcription service runs jobs asynchronously: a job is started with
//! a media locator, polled until it reaches a terminal state, and on success
//! its result document is fetched and parsed for the transcript text.

mod http;
mod poller;

pub use http::HttpTranscriptionService;
pub use poller::JobPoller;

use crate::error::{DagbokError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Status of a transcription job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Submitted,
    InProgress,
    Completed,
    Failed,
}

impl JobStatus {
    /// Whether no further transitions can occur from this status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// A snapshot of a job as reported by the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobState {
    pub status: JobStatus,
    /// Location of the result document, set once the job completes.
    pub result_uri: Option<String>,
}

/// The result document returned by the service for a completed job.
#[derive(Debug, Deserialize)]
struct ResultDocument {
    results: ResultBody,
}

#[derive(Debug, Deserialize)]
struct ResultBody {
    transcripts: Vec<TranscriptText>,
}

#[derive(Debug, Deserialize)]
struct TranscriptText {
    transcript: String,
}

/// Parse a raw result document and extract the first transcript's text.
pub fn parse_result_document(raw: &str) -> Result<String> {
    let doc: ResultDocument = serde_json::from_str(raw)
        .map_err(|e| DagbokError::MalformedResult(format!("Invalid result document: {}", e)))?;
    doc.results
        .transcripts
        .into_iter()
        .next()
        .map(|t| t.transcript)
        .ok_or_else(|| DagbokError::MalformedResult("Result document has no transcripts".into()))
}

/// Trait for transcription service implementations.
#[async_trait]
pub trait TranscriptionService: Send + Sync {
    /// Start a transcription job.
    async fn start_job(
        &self,
        name: &str,
        media_uri: &str,
        format: &str,
        language: &str,
    ) -> Result<()>;

    /// Fetch the current state of a job.
    async fn get_status(&self, name: &str) -> Result<JobState>;

    /// Fetch the raw result document from the location the service reported.
    async fn fetch_result(&self, uri: &str) -> Result<String>;
}
