// [libs/infra/warehouse/src/staging.rs]
use sync_domain_models::{CreditRow, LoanCategory, PaymentRow};
use tracing::{error, info, instrument, warn};

use crate::client::WarehouseClient;
use crate::errors::WarehouseError;
use crate::identifiers::validate_identifier;
use crate::schema::{CREDITS_TABLE, PAYMENTS_TABLE};
use crate::wire::{credit_row_to_json, payment_row_to_json, to_ndjson};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StagingRole {
    Credit,
    Payment,
}

impl StagingRole {
    fn base_table(&self) -> &'static str {
        match self {
            Self::Credit => CREDITS_TABLE,
            Self::Payment => PAYMENTS_TABLE,
        }
    }

    fn suffix(&self) -> &'static str {
        match self {
            Self::Credit => "credit",
            Self::Payment => "payment",
        }
    }
}

fn staging_table_name(tenant_slug: &str, category: LoanCategory, role: StagingRole) -> String {
    format!("stg_{}_{}_{}", tenant_slug.to_lowercase(), category.slug(), role.suffix())
}

/// Owns one staging table for the lifetime of a single worker pipeline run.
/// Guarantees the staging table is dropped exactly once: either explicitly
/// via [`StagingGuard::swap_partition`] after a successful partition swap,
/// or best effort on drop if the pipeline bails out early. This mirrors the
/// teacher's RAII connection-anchor pattern, applied to a resource that
/// needs cleanup instead of one that needs to stay alive.
pub struct StagingGuard {
    client: WarehouseClient,
    table: String,
    role: StagingRole,
    /// Upper-cased tenant id as stored in the `tenant_id` partition column
    /// (spec.md §3's `tenant_id`, distinct from the lower-case slug used in
    /// staging table names).
    tenant_wire_id: String,
    category: LoanCategory,
    committed: bool,
}

impl StagingGuard {
    #[instrument(skip(client))]
    pub async fn prepare(
        client: &WarehouseClient,
        tenant_slug: &str,
        tenant_wire_id: &str,
        category: LoanCategory,
        role: StagingRole,
    ) -> Result<Self, WarehouseError> {
        let table = staging_table_name(tenant_slug, category, role);
        let validated = validate_identifier(&table)?.to_string();
        let base = validate_identifier(role.base_table())?;

        client.execute(&format!("DROP TABLE IF EXISTS {validated}")).await?;
        client
            .execute(&format!("CREATE TABLE {validated} AS {base}"))
            .await?;

        info!(table = %validated, "staging table prepared");
        Ok(Self {
            client: client.clone(),
            table: validated,
            role,
            tenant_wire_id: tenant_wire_id.to_string(),
            category,
            committed: false,
        })
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    /// Fills staging by copying the current base-table partition verbatim,
    /// used for the selective-reuse fast path when a stream's upstream
    /// version has not advanced since the last successful sync (spec.md
    /// §4.8). Leaves `self` uncommitted; the caller still owns the decision
    /// of whether/when to swap.
    #[instrument(skip(self))]
    pub async fn copy_partition(&self) -> Result<(), WarehouseError> {
        let base = validate_identifier(self.role.base_table())?;
        let sql = format!(
            "INSERT INTO {} SELECT * FROM {base} WHERE tenant_id = '{}' AND loan_type = '{}'",
            self.table,
            self.tenant_wire_id,
            self.category.wire(),
        );
        self.client.execute(&sql).await?;
        info!(table = %self.table, "staging filled from prior base partition");
        Ok(())
    }

    #[instrument(skip(self, rows))]
    pub async fn insert_credits(&self, rows: &[CreditRow]) -> Result<(), WarehouseError> {
        debug_assert_eq!(self.role, StagingRole::Credit);
        if rows.is_empty() {
            return Ok(());
        }
        let json_rows: Vec<_> = rows.iter().map(credit_row_to_json).collect();
        let sql = format!("INSERT INTO {} FORMAT JSONEachRow", self.table);
        self.client.execute_with_body(&sql, to_ndjson(&json_rows)).await
    }

    #[instrument(skip(self, rows))]
    pub async fn insert_payments(&self, rows: &[PaymentRow]) -> Result<(), WarehouseError> {
        debug_assert_eq!(self.role, StagingRole::Payment);
        if rows.is_empty() {
            return Ok(());
        }
        let json_rows: Vec<_> = rows.iter().map(payment_row_to_json).collect();
        let sql = format!("INSERT INTO {} FORMAT JSONEachRow", self.table);
        self.client.execute_with_body(&sql, to_ndjson(&json_rows)).await
    }

    /// Atomically replaces this tenant/category's partition in the base
    /// table with the contents of the staging table, then drops staging.
    /// Consumes `self` so a caller cannot accidentally insert into a table
    /// that no longer exists.
    #[instrument(skip(self))]
    pub async fn swap_partition(mut self) -> Result<(), WarehouseError> {
        let base = validate_identifier(self.role.base_table())?;
        let sql = format!(
            "ALTER TABLE {base} REPLACE PARTITION ('{}', '{}') FROM {}",
            self.tenant_wire_id,
            self.category.wire(),
            self.table
        );
        self.client.execute(&sql).await?;
        self.client
            .execute(&format!("DROP TABLE {}", self.table))
            .await?;
        info!(table = %self.table, "atomic partition swap complete");
        self.committed = true;
        Ok(())
    }
}

impl Drop for StagingGuard {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        let client = self.client.clone();
        let table = self.table.clone();
        warn!(table = %table, "staging guard dropped without a commit, scheduling cleanup");
        tokio::spawn(async move {
            if let Err(e) = client.execute(&format!("DROP TABLE IF EXISTS {table}")).await {
                error!(table = %table, error = %e, "failed to clean up abandoned staging table");
            }
        });
    }
}
