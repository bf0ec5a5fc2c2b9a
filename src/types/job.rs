//! Job queue types for the async optimization pipeline (C5).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::route::{RoutePlanJobRequest, RoutePlanResult};

/// Response to a `submit` call: the job is enqueued and this returns immediately.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSubmitResponse {
    pub job_id: Uuid,
}

/// Current status of a submitted job, per spec.md §4.5's `status(job_id)` contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum JobStatus {
    #[serde(rename = "queued")]
    Queued,
    #[serde(rename = "started")]
    Started,
    #[serde(rename = "done")]
    Done { result: RoutePlanResult },
    #[serde(rename = "failed")]
    Failed { error: String },
}

/// A status update broadcast on `{SUBJECT_STATUS_PREFIX}.{job_id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatusUpdate {
    pub job_id: Uuid,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub status: JobStatus,
}

impl JobStatusUpdate {
    pub fn new(job_id: Uuid, status: JobStatus) -> Self {
        Self {
            job_id,
            timestamp: Utc::now(),
            status,
        }
    }
}

/// A job as it sits on the JetStream queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueuedJob {
    pub id: Uuid,
    pub request: RoutePlanJobRequest,
    pub queued_at: DateTime<Utc>,
}

impl QueuedJob {
    pub fn new(request: RoutePlanJobRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            request,
            queued_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_request() -> RoutePlanJobRequest {
        RoutePlanJobRequest {
            depot_id: Uuid::nil(),
            vehicle_ids: vec![Uuid::nil()],
            stop_ids: vec![Uuid::nil()],
            date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
        }
    }

    #[test]
    fn test_job_submit_response_serializes_camel_case() {
        let response = JobSubmitResponse { job_id: Uuid::nil() };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("jobId"));
    }

    #[test]
    fn test_job_status_queued_tag() {
        let json = serde_json::to_string(&JobStatus::Queued).unwrap();
        assert!(json.contains("\"queued\""));
    }

    #[test]
    fn test_job_status_failed_carries_error() {
        let status = JobStatus::Failed {
            error: "no stops found".to_string(),
        };
        let json = serde_json::to_string(&status).unwrap();
        assert!(json.contains("failed"));
        assert!(json.contains("no stops found"));
    }

    #[test]
    fn test_queued_job_new_assigns_fresh_id() {
        let job1 = QueuedJob::new(sample_request());
        let job2 = QueuedJob::new(sample_request());
        assert_ne!(job1.id, job2.id);
    }
}
