//! HTTP client for the transcription service.
//!
//! Talks to a REST-style service: `POST {base}/jobs` to start a job,
//! `GET {base}/jobs/{name}` for status, and a plain `GET` of the reported
//! result URI for the result document.

use super::{JobState, TranscriptionService};
use crate::error::{DagbokError, Result};
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, instrument};

/// Environment variable holding the service bearer token.
const TOKEN_ENV: &str = "DAGBOK_TRANSCRIBE_TOKEN";

/// Reqwest-based transcription service client.
pub struct HttpTranscriptionService {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpTranscriptionService {
    /// Create a client for the service at the given base URL.
    ///
    /// Reads the bearer token from `DAGBOK_TRANSCRIBE_TOKEN` if set.
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(DagbokError::Http)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: std::env::var(TOKEN_ENV).ok(),
        })
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }
}

#[async_trait]
impl TranscriptionService for HttpTranscriptionService {
    #[instrument(skip(self))]
    async fn start_job(
        &self,
        name: &str,
        media_uri: &str,
        format: &str,
        language: &str,
    ) -> Result<()> {
        let body = json!({
            "job_name": name,
            "media_uri": media_uri,
            "media_format": format,
            "language_code": language,
        });

        let response = self
            .authorize(self.client.post(format!("{}/jobs", self.base_url)))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DagbokError::Transcription(format!(
                "start_job returned {}",
                response.status()
            )));
        }

        debug!("Started transcription job {}", name);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_status(&self, name: &str) -> Result<JobState> {
        let response = self
            .authorize(self.client.get(format!("{}/jobs/{}", self.base_url, name)))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DagbokError::Transcription(format!(
                "get_status returned {}",
                response.status()
            )));
        }

        let state: JobState = response.json().await?;
        Ok(state)
    }

    async fn fetch_result(&self, uri: &str) -> Result<String> {
        let response = self.authorize(self.client.get(uri)).send().await?;

        if !response.status().is_success() {
            return Err(DagbokError::Transcription(format!(
                "fetch_result returned {}",
                response.status()
            )));
        }

        Ok(response.text().await?)
    }
}
