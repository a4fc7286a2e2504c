//! Job polling: drive one transcription job from submission to terminal state.

use super::{parse_result_document, JobStatus, TranscriptionService};
use crate::error::{DagbokError, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// Drives a single transcription job to completion and extracts its transcript.
///
/// Persistence is deliberately left to the caller so the polling logic stays
/// independently testable.
pub struct JobPoller {
    service: Arc<dyn TranscriptionService>,
    language: String,
    poll_interval: Duration,
    deadline: Duration,
}

impl JobPoller {
    /// Create a poller with the given interval and overall deadline.
    pub fn new(
        service: Arc<dyn TranscriptionService>,
        language: &str,
        poll_interval: Duration,
        deadline: Duration,
    ) -> Self {
        Self {
            service,
            language: language.to_string(),
            poll_interval,
            deadline,
        }
    }

    /// Submit a job for the given media and wait for its transcript.
    ///
    /// Polls at the configured interval until the job reaches COMPLETED or
    /// FAILED, the deadline expires, or the token is cancelled. On COMPLETED
    /// the result document is fetched and the first transcript's text
    /// returned. Nothing is persisted here; any failure leaves no state.
    #[instrument(skip(self, cancel), fields(media_uri = %media_uri))]
    pub async fn submit_and_await(
        &self,
        media_uri: &str,
        cancel: &CancellationToken,
    ) -> Result<String> {
        let job_name = format!("transcribe-job-{}", Uuid::new_v4());
        let format = media_format(media_uri)?;

        info!("Submitting transcription job {}", job_name);
        self.service
            .start_job(&job_name, media_uri, format, &self.language)
            .await?;

        let started = Instant::now();
        let state = loop {
            let state = self.service.get_status(&job_name).await?;
            if state.status.is_terminal() {
                break state;
            }
            debug!("Job {} still {:?}", job_name, state.status);

            if started.elapsed() + self.poll_interval > self.deadline {
                return Err(DagbokError::Transcription(format!(
                    "Job {} did not finish within {:?}",
                    job_name, self.deadline
                )));
            }

            tokio::select! {
                _ = cancel.cancelled() => {
                    return Err(DagbokError::Transcription(format!(
                        "Polling of job {} was cancelled",
                        job_name
                    )));
                }
                _ = tokio::time::sleep(self.poll_interval) => {}
            }
        };

        if state.status == JobStatus::Failed {
            return Err(DagbokError::JobFailed(job_name));
        }

        let result_uri = state.result_uri.ok_or_else(|| {
            DagbokError::MalformedResult(format!("Job {} completed without a result URI", job_name))
        })?;

        let raw = self.service.fetch_result(&result_uri).await?;
        let transcript = parse_result_document(&raw)?;
        info!("Job {} completed ({} chars)", job_name, transcript.len());
        Ok(transcript)
    }
}

/// Infer the media format from the substring after the URI's last `.`.
fn media_format(media_uri: &str) -> Result<&str> {
    match media_uri.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() && !ext.contains('/') => Ok(ext),
        _ => Err(DagbokError::InvalidInput(format!(
            "Cannot infer media format from {}",
            media_uri
        ))),
    }
}
