// [libs/infra/metadata-store/src/client.rs]
use std::sync::Arc;

use libsql::{Builder, Connection, Database};
use tracing::{info, instrument};

use crate::errors::MetadataError;
use crate::schema::apply_schema;

/// Shared handle to the metadata database. One `MetadataClient` is built
/// once at startup and cloned into every repository and into the
/// scheduler/orchestrator state.
#[derive(Clone)]
pub struct MetadataClient {
    database: Arc<Database>,
}

impl MetadataClient {
    #[instrument(skip(access_token))]
    pub async fn connect(url: &str, access_token: Option<String>) -> Result<Self, MetadataError> {
        if url.is_empty() {
            return Err(MetadataError::Connection("METADATA_DATABASE_URL is empty".into()));
        }

        let is_remote = url.starts_with("libsql://") || url.starts_with("https://");
        let database = if is_remote {
            let token = access_token
                .ok_or_else(|| MetadataError::Connection("remote metadata store requires an access token".into()))?;
            Builder::new_remote(url.to_string(), token).build().await
        } else {
            Builder::new_local(url).build().await
        }
        .map_err(|e| MetadataError::Connection(e.to_string()))?;

        let database = Arc::new(database);
        let bootstrap = database
            .connect()
            .map_err(|e| MetadataError::Connection(e.to_string()))?;
        apply_schema(&bootstrap).await?;

        info!(url, "metadata store connected and schema applied");
        Ok(Self { database })
    }

    pub fn connection(&self) -> Result<Connection, MetadataError> {
        self.database
            .connect()
            .map_err(|e| MetadataError::Connection(e.to_string()))
    }
}
