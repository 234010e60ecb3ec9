/// Error kinds for the generation pipeline.
///
/// Every kind is terminal for the workflow step that produced it;
/// nothing is retried automatically except the poller's own loop, and
/// that loop retries only on non-terminal job statuses, never on
/// transport errors.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The signed-URL endpoint refused or could not be reached.
    #[error("failed to get signed upload URL: {0}")]
    SignedUrl(String),

    /// The PUT of the file bytes to the signed URL failed.
    #[error("failed to upload file: {0}")]
    Upload(String),

    /// The generation endpoint rejected the job request.
    #[error("failed to submit job: {0}")]
    Submission(String),

    /// A status probe failed at the transport or HTTP level.
    #[error("failed to check job status: {0}")]
    StatusCheck(String),

    /// The job reached a failed/error terminal status.
    #[error("job failed: {0}")]
    JobFailed(String),

    /// The poll attempt budget ran out before a terminal status.
    #[error("job timed out after {attempts} polls")]
    JobTimeout { attempts: u32 },

    /// A completed job carried no recognizable media URL.
    #[error("no media URL in job result")]
    MissingResultUrl,

    /// Every download strategy failed.
    #[error("{0}")]
    Download(String),

    /// The owning controller cancelled the operation.
    #[error("operation cancelled")]
    Cancelled,

    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
