// [libs/domain/models/src/job.rs]
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::{LoanCategory, SyncJobStatus};

/// One attempt to sync a single `(tenant, category)` pair. At most one job
/// per pair may be `Pending` or `InProgress` at a time; the metadata
/// store's dedup guard enforces this with an immediate transaction on
/// insert (spec.md §4.7, §5).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncJob {
    pub id: i64,
    pub tenant_id: i64,
    pub category: LoanCategory,
    pub status: SyncJobStatus,
    /// The `X-Data-Version` observed on the credit-stream probe that
    /// triggered this job. Recorded independently from the payment version
    /// so the worker can reuse one stream's last partition while the other
    /// still needs a fresh download (spec.md §4.8 "selective load",
    /// scenario 6).
    pub remote_version_credit: Option<i64>,
    pub remote_version_payment: Option<i64>,
    pub created_at: DateTime<Utc>,
    /// Set exactly once, when the worker pipeline picks the job up (the
    /// PENDING -> IN_PROGRESS transition) — never at creation, even though
    /// the job may sit `Pending` on the queue beforehand (spec.md §9, Open
    /// Question: explicit set-at-begin semantics).
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Free-form one-line summary set on every terminal transition, e.g.
    /// `"12,430 credit rows, 48,002 payment rows"` on success.
    pub result_summary: Option<String>,
    pub error_message: Option<String>,
}

impl SyncJob {
    pub fn duration(&self) -> Option<chrono::Duration> {
        match (self.started_at, self.completed_at) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }

    /// Whether this job still counts against the dedup guard.
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

/// Validation + profiling summary attached to a finished job. Written once,
/// on the terminal transition (spec.md §3, §4.6): `succeed` writes totals,
/// full profiling stats and any quality warnings; `fail_validation` writes
/// only the critical error list, with a zero row count and an empty
/// profiling blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncReport {
    pub id: i64,
    pub job_id: i64,
    pub credit_row_count: i64,
    pub payment_row_count: i64,
    pub total_rows_processed: i64,
    /// Opaque JSON blob produced by the profiler: per-column stats keyed by
    /// column name, shape depending on that column's `FieldType`.
    pub profiling_stats: serde_json::Value,
    /// Ordered human-readable messages: critical errors on a failed
    /// validation, quality warnings on a successful one.
    pub validation_errors: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_job() -> SyncJob {
        SyncJob {
            id: 1,
            tenant_id: 1,
            category: LoanCategory::Commercial,
            status: SyncJobStatus::Success,
            remote_version_credit: Some(7),
            remote_version_payment: Some(3),
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            started_at: Some(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 1).unwrap()),
            completed_at: Some(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 31).unwrap()),
            result_summary: Some("ok".into()),
            error_message: None,
        }
    }

    #[test]
    fn duration_is_none_until_both_timestamps_are_set() {
        let mut job = sample_job();
        job.completed_at = None;
        assert!(job.duration().is_none());
        job.completed_at = Some(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 31).unwrap());
        assert_eq!(job.duration().unwrap().num_seconds(), 30);
    }

    #[test]
    fn active_tracks_dedup_relevant_statuses() {
        let mut job = sample_job();
        job.status = SyncJobStatus::Pending;
        assert!(job.is_active());
        job.status = SyncJobStatus::Success;
        assert!(!job.is_active());
    }
}
