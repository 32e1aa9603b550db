// [libs/infra/metadata-store/src/schema.rs]
use libsql::Connection;

use crate::errors::MetadataError;

const CREATE_TENANTS: &str = r#"
CREATE TABLE IF NOT EXISTS tenants (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    slug TEXT NOT NULL UNIQUE,
    display_name TEXT NOT NULL,
    base_url TEXT NOT NULL,
    upstream_bearer TEXT,
    api_key_hash TEXT NOT NULL,
    is_active INTEGER NOT NULL DEFAULT 1
)
"#;

const CREATE_SYNC_JOBS: &str = r#"
CREATE TABLE IF NOT EXISTS sync_jobs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    tenant_id INTEGER NOT NULL REFERENCES tenants(id),
    category TEXT NOT NULL,
    status TEXT NOT NULL,
    remote_version_credit INTEGER,
    remote_version_payment INTEGER,
    created_at TEXT NOT NULL,
    started_at TEXT,
    completed_at TEXT,
    result_summary TEXT,
    error_message TEXT
)
"#;

const CREATE_SYNC_JOBS_ACTIVE_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS idx_sync_jobs_active
    ON sync_jobs (tenant_id, category, status)
"#;

const CREATE_SYNC_REPORTS: &str = r#"
CREATE TABLE IF NOT EXISTS sync_reports (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    job_id INTEGER NOT NULL UNIQUE REFERENCES sync_jobs(id),
    credit_row_count INTEGER NOT NULL,
    payment_row_count INTEGER NOT NULL,
    total_rows_processed INTEGER NOT NULL,
    profiling_stats TEXT NOT NULL,
    validation_errors TEXT NOT NULL,
    created_at TEXT NOT NULL
)
"#;

/// Idempotent bootstrap applied on every connect, same convention as the
/// teacher's libsql client.
pub async fn apply_schema(conn: &Connection) -> Result<(), MetadataError> {
    conn.execute(CREATE_TENANTS, ()).await?;
    conn.execute(CREATE_SYNC_JOBS, ()).await?;
    conn.execute(CREATE_SYNC_JOBS_ACTIVE_INDEX, ()).await?;
    conn.execute(CREATE_SYNC_REPORTS, ()).await?;
    Ok(())
}
