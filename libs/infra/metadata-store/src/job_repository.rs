// [libs/infra/metadata-store/src/job_repository.rs]
use chrono::Utc;
use libsql::{params, Connection, TransactionBehavior};
use sync_domain_models::{LoanCategory, SyncJob, SyncJobStatus};
use tracing::{info, instrument, warn};

use crate::errors::MetadataError;

pub struct JobRepository {
    conn: Connection,
}

impl JobRepository {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Creates a new `Pending` job for `(tenant_id, category)`, unless one is
    /// already `Pending` or `InProgress` for that pair. Uses an immediate
    /// transaction so the check-then-insert is atomic even when the
    /// scheduler tick and a manual trigger race each other (spec.md §4.7,
    /// §5). `remote_version_credit`/`remote_version_payment` are recorded
    /// independently so the worker can later decide, per file-type, whether
    /// to re-stream or reuse the prior base-table partition (spec.md §4.8).
    #[instrument(skip(self))]
    pub async fn try_create_job(
        &self,
        tenant_id: i64,
        category: LoanCategory,
        remote_version_credit: Option<i64>,
        remote_version_payment: Option<i64>,
    ) -> Result<SyncJob, MetadataError> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .await
            .map_err(|_| MetadataError::Transaction)?;

        let mut existing = tx
            .query(
                "SELECT id FROM sync_jobs \
                 WHERE tenant_id = ?1 AND category = ?2 AND status IN ('PENDING', 'IN_PROGRESS') \
                 LIMIT 1",
                params![tenant_id, category.wire()],
            )
            .await?;

        if existing.next().await?.is_some() {
            warn!(tenant_id, category = category.wire(), "dedup guard rejected a new job, one is already active");
            return Err(MetadataError::JobAlreadyActive);
        }

        let created_at = Utc::now();
        tx.execute(
            "INSERT INTO sync_jobs \
             (tenant_id, category, status, remote_version_credit, remote_version_payment, created_at) \
             VALUES (?1, ?2, 'PENDING', ?3, ?4, ?5)",
            params![
                tenant_id,
                category.wire(),
                remote_version_credit,
                remote_version_payment,
                created_at.to_rfc3339()
            ],
        )
        .await?;

        let id = tx.last_insert_rowid();
        tx.commit().await.map_err(|_| MetadataError::Transaction)?;

        info!(job_id = id, tenant_id, category = category.wire(), "sync job created");
        Ok(SyncJob {
            id,
            tenant_id,
            category,
            status: SyncJobStatus::Pending,
            remote_version_credit,
            remote_version_payment,
            created_at,
            started_at: None,
            completed_at: None,
            result_summary: None,
            error_message: None,
        })
    }

    /// Transitions a job to `InProgress` and stamps `started_at`. Called
    /// exactly once, when a worker picks the job off the queue — never at
    /// creation time, even though the job may have sat `Pending` for a
    /// while (spec.md §9).
    #[instrument(skip(self))]
    pub async fn mark_started(&self, job_id: i64) -> Result<(), MetadataError> {
        let affected = self
            .conn
            .execute(
                "UPDATE sync_jobs SET status = 'IN_PROGRESS', started_at = ?1 \
                 WHERE id = ?2 AND status = 'PENDING'",
                params![Utc::now().to_rfc3339(), job_id],
            )
            .await?;
        if affected == 0 {
            return Err(MetadataError::JobNotFound(job_id));
        }
        Ok(())
    }

    #[instrument(skip(self, result_summary))]
    pub async fn mark_success(&self, job_id: i64, result_summary: &str) -> Result<(), MetadataError> {
        let affected = self
            .conn
            .execute(
                "UPDATE sync_jobs SET status = 'SUCCESS', completed_at = ?1, result_summary = ?2 \
                 WHERE id = ?3",
                params![Utc::now().to_rfc3339(), result_summary, job_id],
            )
            .await?;
        if affected == 0 {
            return Err(MetadataError::JobNotFound(job_id));
        }
        Ok(())
    }

    /// `error_message` carries the caller's exact wording — `"Data
    /// Validation Failed"` for a validation abort, `"System Error: {detail}"`
    /// for anything else (spec.md §7) — this repository just persists it.
    #[instrument(skip(self, error_message))]
    pub async fn mark_failed(&self, job_id: i64, error_message: &str) -> Result<(), MetadataError> {
        let affected = self
            .conn
            .execute(
                "UPDATE sync_jobs SET status = 'FAILED', completed_at = ?1, error_message = ?2 \
                 WHERE id = ?3",
                params![Utc::now().to_rfc3339(), error_message, job_id],
            )
            .await?;
        if affected == 0 {
            return Err(MetadataError::JobNotFound(job_id));
        }
        Ok(())
    }

    /// Most recent job for `(tenant_id, category)` regardless of status,
    /// backing the "latest job" status-check endpoint.
    #[instrument(skip(self))]
    pub async fn find_latest(&self, tenant_id: i64, category: LoanCategory) -> Result<Option<SyncJob>, MetadataError> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, tenant_id, category, status, remote_version_credit, remote_version_payment, \
                        created_at, started_at, completed_at, result_summary, error_message \
                 FROM sync_jobs WHERE tenant_id = ?1 AND category = ?2 \
                 ORDER BY created_at DESC LIMIT 1",
                params![tenant_id, category.wire()],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(map_job(&row)?)),
            None => Ok(None),
        }
    }

    /// A single job by id, backing the report lookup endpoint (it needs to
    /// tell a missing job apart from a job with no report yet).
    #[instrument(skip(self))]
    pub async fn find_by_id(&self, job_id: i64) -> Result<Option<SyncJob>, MetadataError> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, tenant_id, category, status, remote_version_credit, remote_version_payment, \
                        created_at, started_at, completed_at, result_summary, error_message \
                 FROM sync_jobs WHERE id = ?1",
                params![job_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(map_job(&row)?)),
            None => Ok(None),
        }
    }

    /// The upstream versions recorded on this tenant/category's last
    /// successful run, consulted by the worker to decide per file-type
    /// whether to re-stream or reuse the prior partition (spec.md §4.8).
    #[instrument(skip(self))]
    pub async fn last_successful_versions(
        &self,
        tenant_id: i64,
        category: LoanCategory,
    ) -> Result<Option<(Option<i64>, Option<i64>)>, MetadataError> {
        let mut rows = self
            .conn
            .query(
                "SELECT remote_version_credit, remote_version_payment FROM sync_jobs \
                 WHERE tenant_id = ?1 AND category = ?2 AND status = 'SUCCESS' \
                 ORDER BY completed_at DESC LIMIT 1",
                params![tenant_id, category.wire()],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some((row.get::<Option<i64>>(0)?, row.get::<Option<i64>>(1)?))),
            None => Ok(None),
        }
    }
}

fn map_job(row: &libsql::Row) -> Result<SyncJob, MetadataError> {
    let category_raw: String = row.get(2)?;
    let status_raw: String = row.get(3)?;
    let created_at: String = row.get(6)?;
    let started_at: Option<String> = row.get(7)?;
    let completed_at: Option<String> = row.get(8)?;

    Ok(SyncJob {
        id: row.get(0)?,
        tenant_id: row.get(1)?,
        category: LoanCategory::parse(&category_raw)
            .ok_or_else(|| MetadataError::Mapping(format!("unknown category {category_raw}")))?,
        status: SyncJobStatus::parse(&status_raw)
            .ok_or_else(|| MetadataError::Mapping(format!("unknown status {status_raw}")))?,
        remote_version_credit: row.get::<Option<i64>>(4)?,
        remote_version_payment: row.get::<Option<i64>>(5)?,
        created_at: created_at
            .parse()
            .map_err(|e: chrono::ParseError| MetadataError::Mapping(e.to_string()))?,
        started_at: started_at
            .map(|s| s.parse())
            .transpose()
            .map_err(|e: chrono::ParseError| MetadataError::Mapping(e.to_string()))?,
        completed_at: completed_at
            .map(|s| s.parse())
            .transpose()
            .map_err(|e: chrono::ParseError| MetadataError::Mapping(e.to_string()))?,
        result_summary: row.get(9)?,
        error_message: row.get(10)?,
    })
}
