// [libs/infra/metadata-store/src/tenant_repository.rs]
use libsql::{params, Connection};
use sync_domain_models::Tenant;
use tracing::instrument;

use crate::errors::MetadataError;

pub struct TenantRepository {
    conn: Connection,
}

const SELECT_COLUMNS: &str =
    "id, slug, display_name, base_url, upstream_bearer, api_key_hash, is_active";

impl TenantRepository {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    #[instrument(skip(self))]
    pub async fn list_active(&self) -> Result<Vec<Tenant>, MetadataError> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM tenants WHERE is_active = 1");
        let mut rows = self.conn.query(&sql, ()).await?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(map_tenant(&row)?);
        }
        Ok(out)
    }

    #[instrument(skip(self))]
    pub async fn find_by_slug(&self, slug: &str) -> Result<Tenant, MetadataError> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM tenants WHERE slug = ?1");
        let mut rows = self.conn.query(&sql, params![slug]).await?;

        match rows.next().await? {
            Some(row) => map_tenant(&row),
            None => Err(MetadataError::TenantNotFound(slug.to_string())),
        }
    }

    /// Candidate set for API-key authentication: every active tenant's
    /// `api_key_hash`, so the caller can do a constant-time compare against
    /// each one rather than looking a tenant up by an attacker-supplied
    /// slug (spec.md §6 — the tenant is derived from the presented key, not
    /// from a request parameter).
    #[instrument(skip(self))]
    pub async fn find_by_api_key_hash(&self, api_key_hash: &str) -> Result<Option<Tenant>, MetadataError> {
        for tenant in self.list_active().await? {
            let matches: bool = subtle::ConstantTimeEq::ct_eq(
                tenant.api_key_hash.as_bytes(),
                api_key_hash.as_bytes(),
            )
            .into();
            if matches {
                return Ok(Some(tenant));
            }
        }
        Ok(None)
    }

    #[instrument(skip(self, api_key_hash, upstream_bearer))]
    pub async fn upsert(
        &self,
        slug: &str,
        display_name: &str,
        base_url: &str,
        upstream_bearer: Option<&str>,
        api_key_hash: &str,
    ) -> Result<(), MetadataError> {
        self.conn
            .execute(
                "INSERT INTO tenants (slug, display_name, base_url, upstream_bearer, api_key_hash, is_active) \
                 VALUES (?1, ?2, ?3, ?4, ?5, 1) \
                 ON CONFLICT(slug) DO UPDATE SET \
                   display_name = excluded.display_name, \
                   base_url = excluded.base_url, \
                   upstream_bearer = excluded.upstream_bearer, \
                   api_key_hash = excluded.api_key_hash, \
                   is_active = 1",
                params![slug, display_name, base_url, upstream_bearer, api_key_hash],
            )
            .await?;
        Ok(())
    }
}

fn map_tenant(row: &libsql::Row) -> Result<Tenant, MetadataError> {
    Ok(Tenant {
        id: row.get(0)?,
        slug: row.get(1)?,
        display_name: row.get(2)?,
        base_url: row.get(3)?,
        upstream_bearer: row.get(4)?,
        api_key_hash: row.get(5)?,
        is_active: row.get::<i64>(6)? != 0,
    })
}
