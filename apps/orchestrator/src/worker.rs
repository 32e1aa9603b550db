// [apps/orchestrator/src/worker.rs]
//! Bounded worker pool: one mpsc queue, a fixed number of consumer tasks,
//! mirroring the teacher's worker-pool shape rather than spawning a task
//! per job (spec.md §5, "at most `worker_pool_size` jobs run concurrently").

use std::sync::Arc;

use sync_domain_models::SyncJob;
use sync_infra_metadata::{JobRepository, ReportRepository};
use tokio::sync::{mpsc, Mutex};
use tracing::{error, info, instrument, warn};

use crate::job_state;
use crate::pipeline::{run_pipeline, PipelineOutcome};
use crate::state::AppState;

/// One job handed from the scheduler (or the trigger API) to a worker.
/// Carries the tenant inline since the worker needs it for every upstream
/// call and `find_by_slug` would otherwise mean a metadata round trip per
/// dequeue.
#[derive(Debug, Clone)]
pub struct WorkItem {
    pub tenant: sync_domain_models::Tenant,
    pub job: SyncJob,
}

#[derive(Clone)]
pub struct WorkQueue {
    tx: mpsc::Sender<WorkItem>,
}

impl WorkQueue {
    /// Hands a job to the pool. If every worker has exited (process
    /// shutting down) the job is simply left `Pending`; the next scheduler
    /// tick or operator retry will pick it up again.
    pub async fn dispatch(&self, item: WorkItem) {
        let job_id = item.job.id;
        if self.tx.send(item).await.is_err() {
            error!(job_id, "worker pool is gone, job stays PENDING");
        }
    }
}

/// Spawns `pool_size` worker tasks draining a shared queue.
pub fn spawn_pool(state: AppState, pool_size: usize) -> WorkQueue {
    let (tx, rx) = mpsc::channel(1024);
    let rx = Arc::new(Mutex::new(rx));

    for worker_id in 0..pool_size.max(1) {
        let state = state.clone();
        let rx = rx.clone();
        tokio::spawn(async move {
            loop {
                let item = {
                    let mut rx = rx.lock().await;
                    rx.recv().await
                };
                let Some(item) = item else {
                    info!(worker_id, "work queue closed, worker exiting");
                    break;
                };
                run_one(&state, worker_id, item).await;
            }
        });
    }

    WorkQueue { tx }
}

#[instrument(skip(state, item), fields(worker_id, job_id = item.job.id, tenant = %item.tenant.slug, category = %item.job.category))]
async fn run_one(state: &AppState, worker_id: usize, item: WorkItem) {
    let WorkItem { tenant, job } = item;

    let conn = match state.metadata.connection() {
        Ok(conn) => conn,
        Err(e) => {
            error!(worker_id, job_id = job.id, error = %e, "could not open a metadata connection, job stays PENDING");
            return;
        }
    };
    let jobs = JobRepository::new(conn.clone());
    let reports = ReportRepository::new(conn);

    if let Err(e) = job_state::begin(&jobs, job.id).await {
        error!(worker_id, job_id = job.id, error = %e, "failed to mark job IN_PROGRESS, skipping");
        return;
    }

    match run_pipeline(state, &tenant, &job).await {
        Ok(PipelineOutcome::Success {
            credit_row_count,
            payment_row_count,
            profiling_stats,
            quality_warnings,
        }) => {
            if let Err(e) = job_state::succeed(
                &jobs,
                &reports,
                job.id,
                credit_row_count,
                payment_row_count,
                &profiling_stats,
                &quality_warnings,
            )
            .await
            {
                error!(worker_id, job_id = job.id, error = %e, "failed to record a successful job");
            } else {
                info!(worker_id, job_id = job.id, credit_row_count, payment_row_count, "sync succeeded");
            }
        }
        Ok(PipelineOutcome::ValidationFailed { critical_errors }) => {
            warn!(worker_id, job_id = job.id, errors = ?critical_errors, "sync failed validation");
            if let Err(e) = job_state::fail_validation(&jobs, &reports, job.id, &critical_errors).await {
                error!(worker_id, job_id = job.id, error = %e, "failed to record a validation failure");
            }
        }
        Err(e) => {
            error!(worker_id, job_id = job.id, error = %e, "sync failed with a system error");
            if let Err(e) = job_state::fail_system(&jobs, job.id, &e.to_string()).await {
                error!(worker_id, job_id = job.id, error = %e, "failed to record a system-error failure");
            }
        }
    }
}
