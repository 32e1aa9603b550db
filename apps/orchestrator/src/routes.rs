// [apps/orchestrator/src/routes.rs]
//! HTTP surface (spec.md §6): a manual trigger endpoint guarded by the
//! tenant's own API key, and two read-only status endpoints for polling a
//! job/report after the fact.

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use sync_domain_models::{LoanCategory, SyncJob, SyncReport};
use sync_infra_metadata::{JobRepository, ReportRepository, TenantRepository};

use crate::auth::authenticate;
use crate::errors::ApiError;
use crate::scheduler::trigger_sync;
use crate::state::AppState;
use crate::worker::WorkQueue;

/// State handed to every axum handler. Kept separate from [`AppState`]
/// because the worker pool's send half is only known once `spawn_pool`
/// has run, after `AppState::bootstrap`.
#[derive(Clone)]
pub struct ApiState {
    pub app: AppState,
    pub queue: WorkQueue,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/api/sync", post(trigger))
        .route("/api/jobs/:tenant/:category/latest", get(latest_job))
        .route("/api/reports/:job_id", get(report))
        .with_state(state)
}

/// Request body for `POST /api/sync` (spec.md §6). `loan_category` is the
/// only required field; `force` defaults to `true` on this path — an
/// operator hitting the endpoint almost always wants a sync to actually
/// run, not a silent no-op because nothing changed upstream — while the
/// periodic scheduler always calls `trigger_sync` with `force: false`
/// explicitly (spec.md §4.7).
#[derive(Debug, Deserialize)]
struct TriggerRequest {
    loan_category: String,
    force: Option<bool>,
}

#[derive(Debug, Serialize)]
struct TriggerResponse {
    message: String,
    job_id: i64,
}

fn api_key_from_headers(headers: &HeaderMap) -> Result<&str, ApiError> {
    headers
        .get("X-API-Key")
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::Unauthorized)
}

/// `POST /api/sync` — the manual trigger path of spec.md §4.7. The tenant is
/// never named in the request; it is derived entirely from whichever active
/// tenant's key hash matches `X-API-Key` (spec.md §6). A dedup-guard skip or
/// a version-probe failure both surface as 409, since from the caller's
/// perspective both mean "a sync could not be started right now."
async fn trigger(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Json(body): Json<TriggerRequest>,
) -> Result<(axum::http::StatusCode, Json<TriggerResponse>), ApiError> {
    let api_key = api_key_from_headers(&headers)?;

    let category = LoanCategory::parse(&body.loan_category)
        .ok_or_else(|| ApiError::BadRequest(format!("unknown loan_category '{}'", body.loan_category)))?;

    let conn = state.app.metadata.connection()?;
    let tenant = authenticate(&TenantRepository::new(conn), api_key).await?;

    let force = body.force.unwrap_or(true);
    let outcome = trigger_sync(&state.app, &state.queue, &tenant, category, force).await?;

    match outcome {
        Some(job) => Ok((
            axum::http::StatusCode::ACCEPTED,
            Json(TriggerResponse {
                message: "sync enqueued".to_string(),
                job_id: job.id,
            }),
        )),
        None => Err(ApiError::Conflict(
            "no sync started: either a version probe failed or nothing has changed upstream".to_string(),
        )),
    }
}

/// `GET /api/jobs/{tenant}/{category}/latest` — most recent job for a
/// tenant/category pair, regardless of its status.
async fn latest_job(
    State(state): State<ApiState>,
    Path((tenant_slug, category)): Path<(String, String)>,
) -> Result<Json<SyncJob>, ApiError> {
    let category = LoanCategory::parse(&category)
        .ok_or_else(|| ApiError::BadRequest(format!("unknown category '{category}'")))?;

    let conn = state.app.metadata.connection()?;
    let tenant = TenantRepository::new(conn.clone()).find_by_slug(&tenant_slug).await?;

    let job = JobRepository::new(conn)
        .find_latest(tenant.id, category)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("no jobs yet for {tenant_slug}/{category}")))?;
    Ok(Json(job))
}

/// `GET /api/reports/{job_id}` — the validation/profiling report for one
/// job. 404 both when the job itself doesn't exist and when it exists but
/// hasn't reached a terminal state yet (no report has been written).
async fn report(State(state): State<ApiState>, Path(job_id): Path<i64>) -> Result<Json<SyncReport>, ApiError> {
    let conn = state.app.metadata.connection()?;
    JobRepository::new(conn.clone())
        .find_by_id(job_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("job {job_id}")))?;

    let report = ReportRepository::new(conn)
        .find_by_job_id(job_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("no report yet for job {job_id}")))?;
    Ok(Json(report))
}
