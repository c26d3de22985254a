use serde::{Deserialize, Serialize};

use crate::id::generate_id;
use crate::time::{Timestamp, now_utc};

/// Lifecycle states of a bulk send job.
///
/// Admission only ever produces `Pending`; the later transitions belong to
/// a separate job processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Finished,
    Failed,
}

/// An admitted (not yet processed) request to send one template to many
/// recipients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkJob {
    pub id: String,
    pub template_id: String,
    pub job_status: JobStatus,
    /// Number of data rows in the admitted request, excluding the header.
    pub notification_count: usize,
    pub created_at: Timestamp,
}

impl BulkJob {
    /// Creates a pending job record with a fresh id and creation timestamp.
    #[must_use]
    pub fn pending(template_id: impl Into<String>, notification_count: usize) -> Self {
        Self {
            id: generate_id(),
            template_id: template_id.into(),
            job_status: JobStatus::Pending,
            notification_count,
            created_at: now_utc(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_job_creation() {
        let job = BulkJob::pending("t-1", 42);
        assert!(!job.id.is_empty());
        assert_eq!(job.template_id, "t-1");
        assert_eq!(job.job_status, JobStatus::Pending);
        assert_eq!(job.notification_count, 42);
    }

    #[test]
    fn test_job_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&JobStatus::Pending).unwrap(),
            "\"pending\""
        );
        assert_eq!(
            serde_json::to_string(&JobStatus::Processing).unwrap(),
            "\"processing\""
        );
    }

    #[test]
    fn test_job_serialization() {
        let job = BulkJob::pending("t-1", 1);
        let json = serde_json::to_value(&job).unwrap();
        assert_eq!(json["job_status"], "pending");
        assert_eq!(json["notification_count"], 1);
        assert_eq!(json["template_id"], "t-1");
    }
}
