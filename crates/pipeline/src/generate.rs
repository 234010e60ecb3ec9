/// Job submission and status polling.
///
/// Submission posts one JSON request and returns the job descriptor.
/// Polling is a linear retry-until-terminal loop: fixed interval,
/// fixed attempt ceiling, no backoff, no jitter. A transport or HTTP
/// failure on any probe is immediately fatal; only non-terminal job
/// statuses keep the loop going.
use crate::cancel::CancelToken;
use crate::config::StudioConfig;
use crate::error::{PipelineError, Result};
use crate::job::{JobDescriptor, JobStatus, StatusResponse};
use crate::workflow::Generator;
use async_trait::async_trait;
use log::{debug, info, warn};
use serde::Serialize;
use std::future::Future;
use std::time::Duration;

/// Receiver for per-attempt poll progress, so a front end can show
/// "PROCESSING... (n)" while the loop runs.
pub trait ProgressSink: Send + Sync {
    fn polling(&self, attempt: u32, status: JobStatus);
}

/// Sink that discards progress updates.
pub struct NullSink;

impl ProgressSink for NullSink {
    fn polling(&self, _attempt: u32, _status: JobStatus) {}
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationRequest<'a> {
    model: &'a str,
    tool_type: &'a str,
    effect_id: &'a str,
    image_url: &'a str,
    user_id: &'a str,
    remove_watermark: bool,
    is_private: bool,
}

pub struct GenerationClient {
    config: StudioConfig,
    client: reqwest::Client,
}

impl GenerationClient {
    pub fn new(config: StudioConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Submit a generation job referencing a previously uploaded
    /// image.
    pub async fn submit(&self, image_url: &str) -> Result<JobDescriptor> {
        let request = GenerationRequest {
            model: &self.config.model,
            tool_type: &self.config.model,
            effect_id: &self.config.effect_id,
            image_url,
            user_id: &self.config.user_id,
            remove_watermark: true,
            is_private: true,
        };

        let response = self
            .client
            .post(self.config.submit_endpoint())
            .json(&request)
            .send()
            .await
            .map_err(|e| PipelineError::Submission(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PipelineError::Submission(response.status().to_string()));
        }

        let descriptor: JobDescriptor = response
            .json()
            .await
            .map_err(|e| PipelineError::Submission(e.to_string()))?;

        info!(
            "job {} submitted, status {}",
            descriptor.job_id, descriptor.status
        );
        Ok(descriptor)
    }

    /// One status probe.
    pub async fn status(&self, job_id: &str) -> Result<StatusResponse> {
        let response = self
            .client
            .get(self.config.status_endpoint(job_id))
            .send()
            .await
            .map_err(|e| PipelineError::StatusCheck(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PipelineError::StatusCheck(response.status().to_string()));
        }

        response
            .json()
            .await
            .map_err(|e| PipelineError::StatusCheck(e.to_string()))
    }

    /// Poll `job_id` until a terminal status, the attempt budget runs
    /// out, or `cancel` fires.
    pub async fn poll(
        &self,
        job_id: &str,
        cancel: &CancelToken,
        sink: &dyn ProgressSink,
    ) -> Result<StatusResponse> {
        poll_until_terminal(
            |_attempt| self.status(job_id),
            Duration::from_millis(self.config.poll_interval_ms),
            self.config.max_polls,
            cancel,
            sink,
        )
        .await
    }
}

/// The poll loop itself, generic over the probe so the timing and
/// terminal-state behavior can be exercised with scripted responses.
pub(crate) async fn poll_until_terminal<F, Fut>(
    mut fetch: F,
    interval: Duration,
    max_polls: u32,
    cancel: &CancelToken,
    sink: &dyn ProgressSink,
) -> Result<StatusResponse>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<StatusResponse>>,
{
    for attempt in 1..=max_polls {
        if cancel.is_cancelled() {
            return Err(PipelineError::Cancelled);
        }

        let response = fetch(attempt).await?;
        debug!("poll {}/{}: {}", attempt, max_polls, response.status);

        match response.status {
            JobStatus::Completed => return Ok(response),
            JobStatus::Failed | JobStatus::Error => {
                return Err(PipelineError::JobFailed(
                    response
                        .error
                        .unwrap_or_else(|| "job processing failed".to_string()),
                ));
            }
            status => {
                if status == JobStatus::Unknown {
                    warn!("unrecognized job status on poll {}, still waiting", attempt);
                }
                sink.polling(attempt, status);
                tokio::time::sleep(interval).await;
            }
        }
    }

    Err(PipelineError::JobTimeout {
        attempts: max_polls,
    })
}

#[async_trait]
impl Generator for GenerationClient {
    async fn submit(&self, image_url: &str) -> Result<JobDescriptor> {
        GenerationClient::submit(self, image_url).await
    }

    async fn poll(
        &self,
        job_id: &str,
        cancel: &CancelToken,
        sink: &dyn ProgressSink,
    ) -> Result<StatusResponse> {
        GenerationClient::poll(self, job_id, cancel, sink).await
    }
}
