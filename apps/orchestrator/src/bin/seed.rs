// [apps/orchestrator/src/bin/seed.rs]
//! Provisions or updates one tenant out of band from the sync pipeline
//! (spec.md §3: tenants are never created by the pipeline itself). Prints
//! the plaintext API key exactly once; only its SHA-256 hash is persisted.

use clap::Parser;
use sync_infra_metadata::{MetadataClient, TenantRepository};
use sync_orchestrator::auth::hash_api_key;
use tracing::info;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(about = "Provision or update a sync tenant")]
struct Args {
    #[arg(long)]
    slug: String,
    #[arg(long)]
    display_name: String,
    #[arg(long)]
    base_url: String,
    /// Bearer token sent to this tenant's upstream provider, if it requires one.
    #[arg(long)]
    upstream_bearer: Option<String>,
    /// The inbound API key callers must present to trigger syncs for this
    /// tenant. Generated if omitted.
    #[arg(long)]
    api_key: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    sync_shared_observability::init_tracing();

    let args = Args::parse();
    let config = sync_orchestrator::Config::from_env()?;

    let metadata = MetadataClient::connect(&config.metadata_database_url, config.metadata_auth_token.clone()).await?;
    let conn = metadata.connection()?;

    let api_key = args.api_key.unwrap_or_else(|| Uuid::new_v4().to_string());
    let api_key_hash = hash_api_key(&api_key);

    TenantRepository::new(conn)
        .upsert(
            &args.slug,
            &args.display_name,
            &args.base_url,
            args.upstream_bearer.as_deref(),
            &api_key_hash,
        )
        .await?;

    info!(slug = %args.slug, "tenant provisioned");
    println!("tenant '{}' provisioned. API key (shown once): {api_key}", args.slug);
    Ok(())
}
