// [libs/infra/metadata-store/src/errors.rs]
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("[META-CONN] could not reach metadata store: {0}")]
    Connection(String),

    #[error("[META-QUERY] query failed: {0}")]
    Query(#[from] libsql::Error),

    #[error("[META-MAP] row mapping failed: {0}")]
    Mapping(String),

    #[error("[META-TX] transaction could not be committed")]
    Transaction,

    #[error("[META-NOTFOUND] tenant not found: {0}")]
    TenantNotFound(String),

    #[error("[META-NOTFOUND] job not found: {0}")]
    JobNotFound(i64),

    #[error("[META-CONFLICT] an active job already exists for this tenant/category")]
    JobAlreadyActive,
}
