// [apps/orchestrator/src/pipeline.rs]
use std::sync::atomic::{AtomicU64, Ordering};

use sync_core_normalizer::{normalize_credit_row, normalize_payment_row, NormalizeMode};
use sync_domain_models::{FileRole, LoanCategory, SyncJob, Tenant};
use sync_infra_upstream::stream_rows;
use sync_infra_warehouse::staging::{StagingGuard, StagingRole};
use tokio::sync::mpsc;
use tracing::{info, instrument, warn};

use crate::state::AppState;

/// What a pipeline run settled on: either a clean swap with whatever
/// quality warnings the validator surfaced, or a validation-critical abort
/// that never touched the base tables (spec.md §4.4, §4.6).
pub enum PipelineOutcome {
    Success {
        credit_row_count: i64,
        payment_row_count: i64,
        profiling_stats: serde_json::Value,
        quality_warnings: Vec<String>,
    },
    ValidationFailed {
        critical_errors: Vec<String>,
    },
}

#[derive(Debug, Default)]
struct LoadOutcome {
    loaded: u64,
    warnings: Vec<String>,
}

/// Runs one full sync for both the credit and payment streams of `job`'s
/// category: per stream, decide selective reuse vs. a fresh download, then
/// normalize -> stage -> validate -> profile -> atomic swap (spec.md §4.8,
/// §4.3-§4.6). Staging tables are cleaned up no matter how this function
/// exits, via [`StagingGuard`]'s `Drop` impl.
#[instrument(skip(state, tenant, job), fields(tenant = %tenant.slug, category = %job.category))]
pub async fn run_pipeline(state: &AppState, tenant: &Tenant, job: &SyncJob) -> anyhow::Result<PipelineOutcome> {
    let conn = state.metadata.connection()?;
    let jobs = sync_infra_metadata::JobRepository::new(conn);
    let prior_versions = jobs.last_successful_versions(tenant.id, job.category).await?;
    let (prior_credit, prior_payment) = prior_versions.unwrap_or((None, None));

    let credit_guard =
        StagingGuard::prepare(&state.warehouse, &tenant.slug, &tenant.wire_id(), job.category, StagingRole::Credit)
            .await?;
    let payment_guard =
        StagingGuard::prepare(&state.warehouse, &tenant.slug, &tenant.wire_id(), job.category, StagingRole::Payment)
            .await?;

    let reuse_credit = can_reuse(prior_credit, job.remote_version_credit);
    let reuse_payment = can_reuse(prior_payment, job.remote_version_payment);

    let credit_outcome = if reuse_credit {
        info!("credit stream version unchanged, reusing prior partition");
        credit_guard.copy_partition().await?;
        LoadOutcome::default()
    } else {
        load_and_stage_credits(state, tenant, job.category, &credit_guard).await?
    };

    let payment_outcome = if reuse_payment {
        info!("payment stream version unchanged, reusing prior partition");
        payment_guard.copy_partition().await?;
        LoadOutcome::default()
    } else {
        load_and_stage_payments(state, tenant, job.category, &payment_guard).await?
    };

    let validation = sync_infra_warehouse::validator::run_all(
        &state.warehouse,
        credit_guard.table_name(),
        payment_guard.table_name(),
    )
    .await?;

    if validation.is_critical() {
        warn!(errors = ?validation.critical, "validation failed, aborting without touching base tables");
        return Ok(PipelineOutcome::ValidationFailed {
            critical_errors: validation.critical,
        });
    }

    let credit_profile = sync_infra_warehouse::profiler::profile_table(
        &state.warehouse,
        credit_guard.table_name(),
        sync_domain_models::CREDIT_FIELD_SCHEMA,
    )
    .await?;
    let payment_profile = sync_infra_warehouse::profiler::profile_table(
        &state.warehouse,
        payment_guard.table_name(),
        sync_domain_models::PAYMENT_FIELD_SCHEMA,
    )
    .await?;

    credit_guard.swap_partition().await?;
    payment_guard.swap_partition().await?;

    let mut quality_warnings = validation.quality;
    quality_warnings.extend(credit_outcome.warnings);
    quality_warnings.extend(payment_outcome.warnings);

    info!(
        credits_loaded = credit_outcome.loaded,
        payments_loaded = payment_outcome.loaded,
        quality_warnings = quality_warnings.len(),
        "pipeline run complete"
    );

    Ok(PipelineOutcome::Success {
        credit_row_count: credit_outcome.loaded as i64,
        payment_row_count: payment_outcome.loaded as i64,
        profiling_stats: serde_json::json!({
            "credits": credit_profile,
            "payments": payment_profile,
        }),
        quality_warnings,
    })
}

/// A stream is eligible for the selective-reuse fast path only when both
/// the prior and current probes returned a concrete version and they
/// match exactly; an absent version on either side always forces a fresh
/// download (spec.md §4.8).
fn can_reuse(prior: Option<i64>, current: Option<i64>) -> bool {
    matches!((prior, current), (Some(p), Some(c)) if p == c)
}

const CHANNEL_CAPACITY: usize = 256;

async fn load_and_stage_credits(
    state: &AppState,
    tenant: &Tenant,
    category: LoanCategory,
    guard: &StagingGuard,
) -> anyhow::Result<LoadOutcome> {
    let (tx, mut rx) = mpsc::channel(CHANNEL_CAPACITY);
    let file_type = category.file_type(FileRole::Credit);
    let http = state.http.clone();
    let base_url = tenant.base_url.clone();
    let api_key = tenant.upstream_bearer.clone();
    let tenant_wire_id = tenant.wire_id();

    let producer = tokio::spawn(async move {
        stream_rows(&http, &base_url, api_key.as_deref(), &tenant_wire_id, &file_type, tx).await
    });

    let loaded = AtomicU64::new(0);
    let mut warnings = Vec::new();
    let mut batch = Vec::with_capacity(state.config.insert_batch_size);
    let tenant_wire_id = tenant.wire_id();

    while let Some(raw) = rx.recv().await {
        match raw {
            Ok(value) => {
                let Some(obj) = value.as_object() else {
                    warnings.push("skipped a row that was not a JSON object".to_string());
                    continue;
                };
                match normalize_credit_row(obj, category, &tenant_wire_id, NormalizeMode::Lenient) {
                    Ok((row, row_warnings)) => {
                        warnings.extend(row_warnings);
                        batch.push(row);
                        if batch.len() >= state.config.insert_batch_size {
                            guard.insert_credits(&batch).await?;
                            loaded.fetch_add(batch.len() as u64, Ordering::Relaxed);
                            batch.clear();
                        }
                    }
                    Err(e) => {
                        warnings.push(format!("dropped a credit row missing a required field: {e}"));
                    }
                }
            }
            Err(e) => anyhow::bail!("upstream stream error: {e}"),
        }
    }
    if !batch.is_empty() {
        loaded.fetch_add(batch.len() as u64, Ordering::Relaxed);
        guard.insert_credits(&batch).await?;
    }

    producer.await??;

    Ok(LoadOutcome {
        loaded: loaded.into_inner(),
        warnings,
    })
}

async fn load_and_stage_payments(
    state: &AppState,
    tenant: &Tenant,
    category: LoanCategory,
    guard: &StagingGuard,
) -> anyhow::Result<LoadOutcome> {
    let (tx, mut rx) = mpsc::channel(CHANNEL_CAPACITY);
    let file_type = category.file_type(FileRole::Payment);
    let http = state.http.clone();
    let base_url = tenant.base_url.clone();
    let api_key = tenant.upstream_bearer.clone();
    let tenant_wire_id = tenant.wire_id();

    let producer = tokio::spawn(async move {
        stream_rows(&http, &base_url, api_key.as_deref(), &tenant_wire_id, &file_type, tx).await
    });

    let loaded = AtomicU64::new(0);
    let mut warnings = Vec::new();
    let mut batch = Vec::with_capacity(state.config.insert_batch_size);
    let tenant_wire_id = tenant.wire_id();

    while let Some(raw) = rx.recv().await {
        match raw {
            Ok(value) => {
                let Some(obj) = value.as_object() else {
                    warnings.push("skipped a row that was not a JSON object".to_string());
                    continue;
                };
                match normalize_payment_row(obj, category, &tenant_wire_id, NormalizeMode::Lenient) {
                    Ok((row, row_warnings)) => {
                        warnings.extend(row_warnings);
                        batch.push(row);
                        if batch.len() >= state.config.insert_batch_size {
                            guard.insert_payments(&batch).await?;
                            loaded.fetch_add(batch.len() as u64, Ordering::Relaxed);
                            batch.clear();
                        }
                    }
                    Err(e) => {
                        warnings.push(format!("dropped a payment row missing a required field: {e}"));
                    }
                }
            }
            Err(e) => anyhow::bail!("upstream stream error: {e}"),
        }
    }
    if !batch.is_empty() {
        loaded.fetch_add(batch.len() as u64, Ordering::Relaxed);
        guard.insert_payments(&batch).await?;
    }

    producer.await??;

    Ok(LoadOutcome {
        loaded: loaded.into_inner(),
        warnings,
    })
}
