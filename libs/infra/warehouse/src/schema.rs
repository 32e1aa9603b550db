// [libs/infra/warehouse/src/schema.rs]
use crate::client::WarehouseClient;
use crate::errors::WarehouseError;

const CREDITS_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS credits_all (
    loan_account_number String,
    customer_id String,
    tenant_id String,
    loan_type String,
    customer_type String,
    loan_status_code String,
    loan_status_flag String,
    loan_product_type Nullable(String),
    final_maturity_date Nullable(Date),
    first_payment_date Nullable(Date),
    loan_start_date Date,
    loan_closing_date Nullable(Date),
    original_loan_amount Decimal(18, 4),
    outstanding_principal_balance Decimal(18, 4),
    total_interest_amount Nullable(Decimal(18, 4)),
    kkdf_amount Nullable(Decimal(18, 4)),
    bsmv_amount Nullable(Decimal(18, 4)),
    nominal_interest_rate Nullable(Decimal(10, 6)),
    kkdf_rate Nullable(Decimal(10, 6)),
    bsmv_rate Nullable(Decimal(10, 6)),
    total_installment_count Nullable(Int32),
    outstanding_installment_count Nullable(Int32),
    paid_installment_count Nullable(Int32),
    installment_frequency Nullable(String),
    grace_period_months Nullable(Int32),
    days_past_due Nullable(Int32),
    internal_rating Nullable(String),
    internal_credit_rating Nullable(String),
    external_rating Nullable(String),
    default_probability Nullable(Decimal(18, 4)),
    risk_class Nullable(String),
    sector_code Nullable(String),
    customer_segment Nullable(String),
    customer_province_code Nullable(String),
    customer_district_code Nullable(String),
    customer_region_code Nullable(String),
    insurance_included Nullable(String),
    inserted_at DateTime DEFAULT now()
)
ENGINE = MergeTree()
PARTITION BY (tenant_id, loan_type)
ORDER BY (loan_account_number)
"#;

const PAYMENTS_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS payments_all (
    loan_account_number String,
    tenant_id String,
    loan_type String,
    installment_number Int32,
    actual_payment_date Nullable(Date),
    scheduled_payment_date Date,
    installment_amount Decimal(18, 4),
    principal_component Nullable(Decimal(18, 4)),
    interest_component Nullable(Decimal(18, 4)),
    kkdf_component Nullable(Decimal(18, 4)),
    bsmv_component Nullable(Decimal(18, 4)),
    installment_status Nullable(String),
    remaining_principal Nullable(Decimal(18, 4)),
    remaining_interest Nullable(Decimal(18, 4)),
    remaining_kkdf Nullable(Decimal(18, 4)),
    remaining_bsmv Nullable(Decimal(18, 4)),
    inserted_at DateTime DEFAULT now()
)
ENGINE = MergeTree()
PARTITION BY (tenant_id, loan_type)
ORDER BY (loan_account_number, installment_number)
"#;

/// Idempotent bootstrap, run once per [`WarehouseClient::connect`] the same
/// way the teacher's libsql client applies its schema on every connect.
pub async fn init_tables(client: &WarehouseClient) -> Result<(), WarehouseError> {
    client.execute(CREDITS_DDL).await?;
    client.execute(PAYMENTS_DDL).await?;
    Ok(())
}

pub const CREDITS_TABLE: &str = "credits_all";
pub const PAYMENTS_TABLE: &str = "payments_all";
