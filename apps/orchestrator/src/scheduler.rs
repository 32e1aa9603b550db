// [apps/orchestrator/src/scheduler.rs]
//! Decides *whether* a sync is worth running and, if so, creates the job
//! and hands it to the worker pool. Shared by the periodic tick and the
//! manual trigger API (spec.md §4.7) so both paths go through the same
//! dedup guard and version-comparison logic.

use std::time::Duration;

use sync_domain_models::{FileRole, LoanCategory, SyncJob, Tenant};
use sync_infra_metadata::{JobRepository, MetadataError, TenantRepository};
use sync_infra_upstream::probe_version;
use tracing::{error, info, instrument, warn};

use crate::job_state;
use crate::state::AppState;
use crate::worker::{WorkItem, WorkQueue};

/// Probes both upstream streams for `category`, tolerating any probe
/// failure (timeout, non-2xx, missing/non-integer header) as "no version
/// information" rather than propagating an error — a flaky version probe
/// should never crash the scheduler, it should just make this tenant/pair
/// un-syncable this tick (spec.md §4.7 step 1, §9).
async fn probe_both(state: &AppState, tenant: &Tenant, category: LoanCategory) -> (Option<i64>, Option<i64>) {
    let tenant_wire_id = tenant.wire_id();
    let api_key = tenant.upstream_bearer.as_deref();

    let credit_file_type = category.file_type(FileRole::Credit);
    let credit = probe_version(&state.http, &tenant.base_url, api_key, &tenant_wire_id, &credit_file_type)
        .await
        .unwrap_or_else(|e| {
            warn!(tenant = %tenant.slug, %category, error = %e, "credit version probe failed, treating as absent");
            None
        });

    let payment_file_type = category.file_type(FileRole::Payment);
    let payment = probe_version(&state.http, &tenant.base_url, api_key, &tenant_wire_id, &payment_file_type)
        .await
        .unwrap_or_else(|e| {
            warn!(tenant = %tenant.slug, %category, error = %e, "payment version probe failed, treating as absent");
            None
        });

    (credit, payment)
}

/// Probes, decides, and — unless skipped — creates a `Pending` job and
/// dispatches it to the worker pool.
///
/// Returns `Ok(None)` when `force` is false and both streams' versions
/// exactly match the tenant/category's last successful run: nothing has
/// changed upstream, so there is nothing to sync. `force` bypasses this
/// comparison but never bypasses the dedup guard — a tenant/category pair
/// with an active job still rejects with [`MetadataError::JobAlreadyActive`]
/// either way (spec.md §4.7).
#[instrument(skip(state, queue, tenant), fields(tenant = %tenant.slug, %category, force))]
pub async fn trigger_sync(
    state: &AppState,
    queue: &WorkQueue,
    tenant: &Tenant,
    category: LoanCategory,
    force: bool,
) -> Result<Option<SyncJob>, MetadataError> {
    let conn = state.metadata.connection()?;
    let jobs = JobRepository::new(conn);

    let (remote_version_credit, remote_version_payment) = probe_both(state, tenant, category).await;

    // spec.md §4.7 step 1: either probe coming back absent skips the tenant
    // for this tick outright, regardless of `force` — there is nothing to
    // compare against and nothing worth downloading blind.
    let (Some(remote_version_credit), Some(remote_version_payment)) =
        (remote_version_credit, remote_version_payment)
    else {
        info!(tenant = %tenant.slug, %category, "a version probe returned absent, skipping this tick");
        return Ok(None);
    };

    if !force {
        if let Some((prior_credit, prior_payment)) = jobs.last_successful_versions(tenant.id, category).await? {
            let has_update = prior_credit != Some(remote_version_credit) || prior_payment != Some(remote_version_payment);
            if !has_update {
                info!(tenant = %tenant.slug, %category, "both streams unchanged since last success, skipping");
                return Ok(None);
            }
        }
    }

    let job = job_state::create(
        &jobs,
        tenant.id,
        category,
        Some(remote_version_credit),
        Some(remote_version_payment),
    )
    .await?;
    queue
        .dispatch(WorkItem {
            tenant: tenant.clone(),
            job: job.clone(),
        })
        .await;
    Ok(Some(job))
}

/// Drives the periodic sweep: every `interval`, probe every active tenant
/// across both loan categories. A `JobAlreadyActive` or probe-driven skip
/// is expected steady-state behavior, not a failure — only unexpected
/// metadata-store errors are logged at `error` level.
pub async fn run_periodic(state: AppState, queue: WorkQueue, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    loop {
        ticker.tick().await;
        if let Err(e) = sweep_once(&state, &queue).await {
            error!(error = %e, "scheduler sweep failed to list tenants");
        }
    }
}

async fn sweep_once(state: &AppState, queue: &WorkQueue) -> Result<(), MetadataError> {
    let conn = state.metadata.connection()?;
    let tenants = TenantRepository::new(conn).list_active().await?;

    for tenant in &tenants {
        for category in LoanCategory::all() {
            match trigger_sync(state, queue, tenant, category, false).await {
                Ok(_) => {}
                Err(MetadataError::JobAlreadyActive) => {
                    info!(tenant = %tenant.slug, %category, "skipping tick, a job is already active");
                }
                Err(e) => {
                    error!(tenant = %tenant.slug, %category, error = %e, "failed to evaluate tenant/category");
                }
            }
        }
    }
    Ok(())
}
