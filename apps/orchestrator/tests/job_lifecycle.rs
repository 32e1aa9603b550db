// [apps/orchestrator/tests/job_lifecycle.rs]
//! End-to-end exercise of the metadata store against an in-memory `libsql`
//! database: tenant provisioning, the dedup guard, and all three terminal
//! transitions of the job state machine. No warehouse dependency — the
//! warehouse is an HTTP-only external collaborator with no in-memory mode,
//! so this test covers everything reachable without one.

use sync_domain_models::LoanCategory;
use sync_infra_metadata::{JobRepository, MetadataClient, ReportRepository, TenantRepository};
use sync_orchestrator::{auth, job_state};

async fn test_metadata() -> MetadataClient {
    MetadataClient::connect(":memory:", None)
        .await
        .expect("in-memory metadata store should always connect")
}

#[tokio::test]
async fn dedup_guard_rejects_a_second_active_job_for_the_same_pair() {
    let metadata = test_metadata().await;
    let conn = metadata.connection().unwrap();
    let tenants = TenantRepository::new(conn.clone());
    let jobs = JobRepository::new(conn);

    tenants
        .upsert("acme", "Acme Bank", "https://acme.example", None, &auth::hash_api_key("k"))
        .await
        .unwrap();
    let tenant = tenants.find_by_slug("acme").await.unwrap();

    job_state::create(&jobs, tenant.id, LoanCategory::Commercial, Some(1), Some(1))
        .await
        .expect("first job should be accepted");

    let second = job_state::create(&jobs, tenant.id, LoanCategory::Commercial, Some(2), Some(2)).await;
    assert!(
        matches!(second, Err(sync_infra_metadata::MetadataError::JobAlreadyActive)),
        "a second job for the same pending pair must be rejected"
    );

    // A different category is unaffected by the guard.
    job_state::create(&jobs, tenant.id, LoanCategory::Retail, Some(1), Some(1))
        .await
        .expect("a different category is not blocked by the first pair's guard");
}

#[tokio::test]
async fn success_path_writes_a_full_report_and_frees_the_dedup_guard() {
    let metadata = test_metadata().await;
    let conn = metadata.connection().unwrap();
    let tenants = TenantRepository::new(conn.clone());
    let jobs = JobRepository::new(conn.clone());
    let reports = ReportRepository::new(conn);

    tenants
        .upsert("acme", "Acme Bank", "https://acme.example", None, &auth::hash_api_key("k"))
        .await
        .unwrap();
    let tenant = tenants.find_by_slug("acme").await.unwrap();

    let job = job_state::create(&jobs, tenant.id, LoanCategory::Commercial, Some(5), Some(9))
        .await
        .unwrap();
    job_state::begin(&jobs, job.id).await.unwrap();

    let report = job_state::succeed(
        &jobs,
        &reports,
        job.id,
        120,
        340,
        &serde_json::json!({ "credits": {}, "payments": {} }),
        &["orphan payment row 42".to_string()],
    )
    .await
    .unwrap();

    assert_eq!(report.total_rows_processed, 460);
    assert_eq!(report.validation_errors, vec!["orphan payment row 42".to_string()]);

    let versions = jobs
        .last_successful_versions(tenant.id, LoanCategory::Commercial)
        .await
        .unwrap()
        .expect("a successful run must be visible to later version comparisons");
    assert_eq!(versions, (Some(5), Some(9)));

    // The dedup guard no longer sees this pair as active.
    job_state::create(&jobs, tenant.id, LoanCategory::Commercial, Some(6), Some(10))
        .await
        .expect("a completed job must free the dedup guard for the next run");
}

#[tokio::test]
async fn validation_failure_records_only_the_critical_errors_with_zero_counts() {
    let metadata = test_metadata().await;
    let conn = metadata.connection().unwrap();
    let tenants = TenantRepository::new(conn.clone());
    let jobs = JobRepository::new(conn.clone());
    let reports = ReportRepository::new(conn);

    tenants
        .upsert("acme", "Acme Bank", "https://acme.example", None, &auth::hash_api_key("k"))
        .await
        .unwrap();
    let tenant = tenants.find_by_slug("acme").await.unwrap();

    let job = job_state::create(&jobs, tenant.id, LoanCategory::Retail, None, None)
        .await
        .unwrap();
    job_state::begin(&jobs, job.id).await.unwrap();

    let critical = vec!["CRITICAL: 3 rows missing Loan Account Number. Sync Aborted.".to_string()];
    let report = job_state::fail_validation(&jobs, &reports, job.id, &critical).await.unwrap();

    assert_eq!(report.credit_row_count, 0);
    assert_eq!(report.payment_row_count, 0);
    assert_eq!(report.validation_errors, critical);

    let finished = jobs.find_by_id(job.id).await.unwrap().unwrap();
    assert_eq!(finished.error_message.as_deref(), Some("Data Validation Failed"));
}

#[tokio::test]
async fn api_key_auth_resolves_the_tenant_without_a_slug_hint() {
    let metadata = test_metadata().await;
    let conn = metadata.connection().unwrap();
    let tenants = TenantRepository::new(conn.clone());

    tenants
        .upsert("acme", "Acme Bank", "https://acme.example", None, &auth::hash_api_key("acme-key"))
        .await
        .unwrap();
    tenants
        .upsert("globex", "Globex Corp", "https://globex.example", None, &auth::hash_api_key("globex-key"))
        .await
        .unwrap();

    let resolved = auth::authenticate(&tenants, "globex-key")
        .await
        .expect("the right key should resolve to its tenant regardless of request order");
    assert_eq!(resolved.slug, "globex");

    assert!(
        auth::authenticate(&tenants, "not-a-real-key").await.is_err(),
        "an unknown key must be rejected"
    );
}
