/// Job descriptors and the closed status enumeration.
use serde::{Deserialize, Serialize};

/// Server-side job status.
///
/// `Unknown` absorbs any status string the server starts emitting that
/// this client does not know yet; it is tagged non-terminal so the
/// poller keeps waiting instead of failing on it, and the poller logs
/// it at warn level so it cannot pass silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Processing,
    Completed,
    Failed,
    Error,
    #[serde(other)]
    Unknown,
}

impl JobStatus {
    /// Terminal statuses admit no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Error)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Queued => "queued",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Error => "error",
            Self::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

/// Descriptor returned by job submission.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDescriptor {
    pub job_id: String,
    pub status: JobStatus,
}

/// One status probe's response.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusResponse {
    pub status: JobStatus,

    /// Result payload, present once the job completes.
    #[serde(default)]
    pub result: Option<serde_json::Value>,

    /// Server-supplied failure message.
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_parsing() {
        let parse = |s: &str| serde_json::from_value::<JobStatus>(json!(s)).unwrap();
        assert_eq!(parse("queued"), JobStatus::Queued);
        assert_eq!(parse("processing"), JobStatus::Processing);
        assert_eq!(parse("completed"), JobStatus::Completed);
        assert_eq!(parse("failed"), JobStatus::Failed);
        assert_eq!(parse("error"), JobStatus::Error);
        assert_eq!(parse("warming-up"), JobStatus::Unknown);
    }

    #[test]
    fn test_terminal_tagging() {
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
        assert!(JobStatus::Error.is_terminal());
        assert!(!JobStatus::Queued.is_terminal());
        assert!(!JobStatus::Processing.is_terminal());
        assert!(!JobStatus::Unknown.is_terminal());
    }

    #[test]
    fn test_descriptor_parsing() {
        let descriptor: JobDescriptor =
            serde_json::from_value(json!({"jobId": "J1", "status": "queued"})).unwrap();
        assert_eq!(descriptor.job_id, "J1");
        assert_eq!(descriptor.status, JobStatus::Queued);
    }

    #[test]
    fn test_status_response_optional_fields() {
        let response: StatusResponse =
            serde_json::from_value(json!({"status": "processing"})).unwrap();
        assert!(response.result.is_none());
        assert!(response.error.is_none());

        let response: StatusResponse = serde_json::from_value(json!({
            "status": "failed",
            "error": "face not detected"
        }))
        .unwrap();
        assert_eq!(response.error.as_deref(), Some("face not detected"));
    }
}
