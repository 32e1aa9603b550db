// [libs/infra/metadata-store/src/report_repository.rs]
use chrono::Utc;
use libsql::{params, Connection};
use sync_domain_models::SyncReport;
use tracing::instrument;

use crate::errors::MetadataError;

pub struct ReportRepository {
    conn: Connection,
}

impl ReportRepository {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Written once, on a job's terminal transition (spec.md §3, §4.6):
    /// `succeed` passes the full row counts, profiling stats and any
    /// quality warnings; `fail_validation` passes zero row counts, an empty
    /// profiling object and just the critical error list.
    #[instrument(skip(self, profiling_stats, validation_errors))]
    pub async fn create(
        &self,
        job_id: i64,
        credit_row_count: i64,
        payment_row_count: i64,
        profiling_stats: &serde_json::Value,
        validation_errors: &[String],
    ) -> Result<SyncReport, MetadataError> {
        let created_at = Utc::now();
        let profiling_text = profiling_stats.to_string();
        let validation_text = serde_json::to_string(validation_errors)
            .map_err(|e| MetadataError::Mapping(e.to_string()))?;
        let total_rows_processed = credit_row_count + payment_row_count;

        self.conn
            .execute(
                "INSERT INTO sync_reports \
                 (job_id, credit_row_count, payment_row_count, total_rows_processed, \
                  profiling_stats, validation_errors, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    job_id,
                    credit_row_count,
                    payment_row_count,
                    total_rows_processed,
                    profiling_text,
                    validation_text,
                    created_at.to_rfc3339()
                ],
            )
            .await?;

        Ok(SyncReport {
            id: self.conn.last_insert_rowid(),
            job_id,
            credit_row_count,
            payment_row_count,
            total_rows_processed,
            profiling_stats: profiling_stats.clone(),
            validation_errors: validation_errors.to_vec(),
            created_at,
        })
    }

    #[instrument(skip(self))]
    pub async fn find_by_job_id(&self, job_id: i64) -> Result<Option<SyncReport>, MetadataError> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, job_id, credit_row_count, payment_row_count, total_rows_processed, \
                        profiling_stats, validation_errors, created_at \
                 FROM sync_reports WHERE job_id = ?1",
                params![job_id],
            )
            .await?;

        let Some(row) = rows.next().await? else {
            return Ok(None);
        };

        let profiling_text: String = row.get(5)?;
        let validation_text: String = row.get(6)?;
        let created_at_text: String = row.get(7)?;

        Ok(Some(SyncReport {
            id: row.get(0)?,
            job_id: row.get(1)?,
            credit_row_count: row.get(2)?,
            payment_row_count: row.get(3)?,
            total_rows_processed: row.get(4)?,
            profiling_stats: serde_json::from_str(&profiling_text)
                .map_err(|e| MetadataError::Mapping(e.to_string()))?,
            validation_errors: serde_json::from_str(&validation_text)
                .map_err(|e| MetadataError::Mapping(e.to_string()))?,
            created_at: created_at_text
                .parse()
                .map_err(|e: chrono::ParseError| MetadataError::Mapping(e.to_string()))?,
        }))
    }
}
