// [apps/orchestrator/src/config.rs]
use std::time::Duration;

/// Process-wide configuration, read once at startup from the environment.
/// Nothing downstream re-reads `std::env` directly.
#[derive(Debug, Clone)]
pub struct Config {
    pub metadata_database_url: String,
    pub metadata_auth_token: Option<String>,
    pub warehouse_url: String,
    pub warehouse_database: String,
    pub warehouse_user: String,
    pub warehouse_password: String,
    pub listen_port: u16,
    /// How often the scheduler probes every active tenant/category pair.
    pub scheduler_interval: Duration,
    /// Upper bound on concurrently running sync jobs across all tenants.
    pub worker_pool_size: usize,
    /// Row batch size for staging inserts; also the rough unit the
    /// streaming loader's channel capacity is sized against.
    pub insert_batch_size: usize,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            metadata_database_url: require_env("METADATA_DATABASE_URL")?,
            metadata_auth_token: std::env::var("METADATA_AUTH_TOKEN").ok(),
            warehouse_url: require_env("CLICKHOUSE_URL")?,
            warehouse_database: std::env::var("CLICKHOUSE_DATABASE").unwrap_or_else(|_| "default".into()),
            warehouse_user: std::env::var("CLICKHOUSE_USER").unwrap_or_else(|_| "default".into()),
            warehouse_password: std::env::var("CLICKHOUSE_PASSWORD").unwrap_or_default(),
            listen_port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
            scheduler_interval: Duration::from_secs(
                std::env::var("SCHEDULER_INTERVAL_SECONDS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(300),
            ),
            worker_pool_size: std::env::var("WORKER_POOL_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(|| num_cpus::get().max(2)),
            insert_batch_size: std::env::var("INSERT_BATCH_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10_000),
        })
    }
}

fn require_env(key: &str) -> anyhow::Result<String> {
    std::env::var(key).map_err(|_| anyhow::anyhow!("{key} is not set"))
}
