// [apps/orchestrator/src/errors.rs]
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Top-level error type returned by HTTP handlers. Wraps the per-crate
/// error catalogs so a handler can use `?` regardless of which layer
/// failed.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
            Self::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized".to_string()),
            Self::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
            Self::Internal(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        };
        (status, axum::Json(json!({ "error": message }))).into_response()
    }
}

impl From<sync_infra_metadata::MetadataError> for ApiError {
    fn from(e: sync_infra_metadata::MetadataError) -> Self {
        use sync_infra_metadata::MetadataError as M;
        match e {
            M::TenantNotFound(s) => Self::NotFound(format!("tenant {s}")),
            M::JobNotFound(id) => Self::NotFound(format!("job {id}")),
            M::JobAlreadyActive => Self::Conflict("a sync job is already active for this tenant/category".into()),
            other => Self::Internal(other.into()),
        }
    }
}
