// [apps/orchestrator/src/state.rs]
use std::sync::Arc;

use sync_infra_metadata::MetadataClient;
use sync_infra_warehouse::WarehouseClient;

use crate::config::Config;

/// Shared application state, cloned into every axum handler and background
/// daemon. Cloning is cheap: both clients wrap an `Arc` internally.
#[derive(Clone)]
pub struct AppState {
    pub metadata: MetadataClient,
    pub warehouse: WarehouseClient,
    pub http: reqwest::Client,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn bootstrap(config: Config) -> anyhow::Result<Self> {
        let metadata = MetadataClient::connect(&config.metadata_database_url, config.metadata_auth_token.clone())
            .await?;
        let warehouse = WarehouseClient::connect(
            &config.warehouse_url,
            &config.warehouse_database,
            &config.warehouse_user,
            &config.warehouse_password,
        )
        .await?;
        let http = reqwest::Client::builder().build()?;

        Ok(Self {
            metadata,
            warehouse,
            http,
            config: Arc::new(config),
        })
    }
}
