// [apps/orchestrator/src/bin/migrator.rs]
//! Standalone CLI that applies the metadata store and warehouse schemas
//! without booting the HTTP server or the scheduler. Both
//! `MetadataClient::connect` and `WarehouseClient::connect` already apply
//! their schema idempotently on every connect; this binary exists so an
//! operator (or a deploy pipeline) can run that step on its own and get a
//! clean exit code before the orchestrator process ever starts.

use sync_infra_metadata::MetadataClient;
use sync_infra_warehouse::WarehouseClient;
use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    sync_shared_observability::init_tracing();

    let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;

    runtime.block_on(async {
        let config = sync_orchestrator::Config::from_env()?;

        info!("applying metadata store schema");
        if let Err(e) = MetadataClient::connect(&config.metadata_database_url, config.metadata_auth_token.clone()).await {
            error!(error = %e, "metadata schema migration failed");
            std::process::exit(1);
        }

        info!("applying warehouse schema");
        if let Err(e) = WarehouseClient::connect(
            &config.warehouse_url,
            &config.warehouse_database,
            &config.warehouse_user,
            &config.warehouse_password,
        )
        .await
        {
            error!(error = %e, "warehouse schema migration failed");
            std::process::exit(1);
        }

        info!("migration complete");
        Ok(())
    })
}
