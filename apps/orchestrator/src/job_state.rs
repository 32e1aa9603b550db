// [apps/orchestrator/src/job_state.rs]
//! Owns the five legal transitions a [`sync_domain_models::SyncJob`] can
//! make (spec.md §3, §4.6): `create` and `begin` are plumbing around the
//! metadata store's dedup guard; `succeed`/`fail_validation`/`fail_system`
//! each pair a `sync_reports` write with the matching `sync_jobs` status
//! update so the two tables never disagree about how a job ended.

use sync_domain_models::{LoanCategory, SyncJob, SyncReport};
use sync_infra_metadata::{JobRepository, MetadataError, ReportRepository};

pub async fn create(
    jobs: &JobRepository,
    tenant_id: i64,
    category: LoanCategory,
    remote_version_credit: Option<i64>,
    remote_version_payment: Option<i64>,
) -> Result<SyncJob, MetadataError> {
    jobs.try_create_job(tenant_id, category, remote_version_credit, remote_version_payment)
        .await
}

/// PENDING -> IN_PROGRESS. Only called by the worker that actually picked
/// the job up, never at creation time (spec.md §9).
pub async fn begin(jobs: &JobRepository, job_id: i64) -> Result<(), MetadataError> {
    jobs.mark_started(job_id).await
}

/// IN_PROGRESS -> SUCCESS. Writes the full report: both row counts, the
/// profiler's per-column stats and any non-fatal quality warnings.
pub async fn succeed(
    jobs: &JobRepository,
    reports: &ReportRepository,
    job_id: i64,
    credit_row_count: i64,
    payment_row_count: i64,
    profiling_stats: &serde_json::Value,
    quality_warnings: &[String],
) -> Result<SyncReport, MetadataError> {
    let report = reports
        .create(job_id, credit_row_count, payment_row_count, profiling_stats, quality_warnings)
        .await?;
    let summary = format!("{credit_row_count} credit rows, {payment_row_count} payment rows");
    jobs.mark_success(job_id, &summary).await?;
    Ok(report)
}

/// IN_PROGRESS -> FAILED via the validation-critical path: zero row
/// counts, an empty profiling blob, and only the critical error list
/// (spec.md §4.4, scenario 3). The base tables are never touched.
pub async fn fail_validation(
    jobs: &JobRepository,
    reports: &ReportRepository,
    job_id: i64,
    critical_errors: &[String],
) -> Result<SyncReport, MetadataError> {
    let report = reports
        .create(job_id, 0, 0, &serde_json::json!({}), critical_errors)
        .await?;
    jobs.mark_failed(job_id, "Data Validation Failed").await?;
    Ok(report)
}

/// IN_PROGRESS -> FAILED via any other unhandled error: upstream
/// unreachable, warehouse write failure, normalizer panic, etc. No report
/// row is written; `detail` becomes the job's `error_message` verbatim
/// inside the fixed `"System Error: {detail}"` wording (spec.md §7).
pub async fn fail_system(jobs: &JobRepository, job_id: i64, detail: &str) -> Result<(), MetadataError> {
    jobs.mark_failed(job_id, &format!("System Error: {detail}")).await
}
