// [libs/infra/warehouse/src/validator.rs]
use tracing::instrument;

use crate::client::WarehouseClient;
use crate::errors::WarehouseError;
use crate::identifiers::validate_identifier;

/// Result of running the data-quality checks against a pair of staging
/// tables before they are swapped into the base tables (spec.md §4.4).
///
/// A non-empty `critical` list means the sync must abort: the pipeline
/// writes a `FAILED` job with `error_message = "Data Validation Failed"`
/// and a report carrying only these messages, and the staging tables are
/// torn down without ever touching the base tables. `quality` messages
/// never block the swap; they ride along on a successful report as
/// operator-facing warnings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub critical: Vec<String>,
    pub quality: Vec<String>,
}

impl ValidationOutcome {
    pub fn is_critical(&self) -> bool {
        !self.critical.is_empty()
    }
}

/// Credit rows whose `loan_account_number` is blank or the literal string
/// `"None"` — a loan the warehouse cannot key on or join payments against
/// at all, so it always aborts the sync (spec.md §4.4, scenario 3).
#[instrument(skip(client))]
async fn count_ghost_loans(client: &WarehouseClient, credits_staging: &str) -> Result<i64, WarehouseError> {
    let table = validate_identifier(credits_staging)?;
    let sql = format!(
        "SELECT count() AS c FROM {table} \
         WHERE trimBoth(loan_account_number) = '' OR trimBoth(loan_account_number) = 'None'"
    );
    scalar_count(client, &sql).await
}

/// Payments that reference a `loan_account_number` absent from this run's
/// credit staging table. A data-quality warning, not an abort condition —
/// upstream feeds legitimately stagger credit and payment exports by a day.
#[instrument(skip(client))]
async fn count_orphan_payments(
    client: &WarehouseClient,
    credits_staging: &str,
    payments_staging: &str,
) -> Result<i64, WarehouseError> {
    let credits = validate_identifier(credits_staging)?;
    let payments = validate_identifier(payments_staging)?;
    let sql = format!(
        "SELECT count() AS c FROM {payments} \
         WHERE loan_account_number NOT IN (SELECT loan_account_number FROM {credits})"
    );
    scalar_count(client, &sql).await
}

/// Open/active loans with a negative outstanding balance: always a data
/// error, never a legitimate state, but not severe enough to abort a sync
/// on its own.
#[instrument(skip(client))]
async fn count_negative_balances(client: &WarehouseClient, credits_staging: &str) -> Result<i64, WarehouseError> {
    let table = validate_identifier(credits_staging)?;
    let sql = format!("SELECT count() AS c FROM {table} WHERE outstanding_principal_balance < 0");
    scalar_count(client, &sql).await
}

pub async fn run_all(
    client: &WarehouseClient,
    credits_staging: &str,
    payments_staging: &str,
) -> Result<ValidationOutcome, WarehouseError> {
    let ghost_loans = count_ghost_loans(client, credits_staging).await?;
    let orphan_payments = count_orphan_payments(client, credits_staging, payments_staging).await?;
    let negative_balances = count_negative_balances(client, credits_staging).await?;

    let mut outcome = ValidationOutcome::default();
    if ghost_loans > 0 {
        outcome.critical.push(format!(
            "CRITICAL: {ghost_loans} rows missing Loan Account Number. Sync Aborted."
        ));
    }
    if orphan_payments > 0 {
        outcome.quality.push(format!(
            "WARNING: {orphan_payments} payment rows reference a Loan Account Number not present in this sync's credit data."
        ));
    }
    if negative_balances > 0 {
        outcome.quality.push(format!(
            "WARNING: {negative_balances} credit rows have a negative Outstanding Principal Balance."
        ));
    }
    Ok(outcome)
}

async fn scalar_count(client: &WarehouseClient, sql: &str) -> Result<i64, WarehouseError> {
    let rows = client.query_rows(sql).await?;
    let count = rows
        .first()
        .and_then(|v| v.get("c"))
        .and_then(|v| v.as_i64())
        .unwrap_or(0);
    Ok(count)
}
