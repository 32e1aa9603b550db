// [apps/orchestrator/src/main.rs]
use sync_orchestrator::routes::{router, ApiState};
use sync_orchestrator::scheduler::run_periodic;
use sync_orchestrator::worker::spawn_pool;
use sync_orchestrator::{AppState, Config};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    sync_shared_observability::init_tracing();

    let config = Config::from_env()?;
    let listen_port = config.listen_port;
    let scheduler_interval = config.scheduler_interval;
    let worker_pool_size = config.worker_pool_size;

    let state = AppState::bootstrap(config).await?;
    let queue = spawn_pool(state.clone(), worker_pool_size);

    tokio::spawn(run_periodic(state.clone(), queue.clone(), scheduler_interval));

    let app = router(ApiState {
        app: state,
        queue,
    });

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", listen_port)).await?;
    info!(port = listen_port, "orchestrator listening");
    axum::serve(listener, app).await?;

    Ok(())
}
