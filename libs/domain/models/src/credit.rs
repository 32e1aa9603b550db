// [libs/domain/models/src/credit.rs]
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::enums::{
    CustomerType, FieldType, InsuranceIncluded, LoanCategory, LoanProductType, LoanStatusCode,
    LoanStatusFlag,
};

/// A single normalized row of the `{category}_credit` upstream stream.
///
/// Field order here has no bearing on wire or warehouse column order; that
/// order lives in [`CREDIT_COLUMNS`] and must be kept in sync with the
/// `CREATE TABLE` / `INSERT` column lists in `sync-infra-warehouse`.
///
/// Only the columns a sync cannot proceed without (`customer_id`,
/// `customer_type`, `loan_status_code`, `loan_start_date`,
/// `original_loan_amount`, `outstanding_principal_balance`) are required;
/// everything else may legitimately come back absent from lenient-mode
/// normalization (spec.md §4.1, "each field normalized independently").
/// `loan_account_number` is always present but may be an empty string or
/// the literal `"None"` — a ghost loan the validator rejects the sync for
/// (spec.md §4.4) rather than a field the normalizer drops the row for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditRow {
    pub loan_account_number: String,
    pub customer_id: String,
    /// Injected by the loader from the triggering job, never present in the
    /// upstream payload.
    pub tenant_id: String,
    pub loan_type: LoanCategory,
    pub customer_type: CustomerType,
    pub loan_status_code: LoanStatusCode,
    /// Derived from `loan_status_code` when the upstream row omits it
    /// (spec.md §4.1).
    pub loan_status_flag: LoanStatusFlag,
    pub loan_product_type: Option<LoanProductType>,
    pub final_maturity_date: Option<NaiveDate>,
    pub first_payment_date: Option<NaiveDate>,
    pub loan_start_date: NaiveDate,
    pub loan_closing_date: Option<NaiveDate>,
    /// 4 decimal places, as stored in the warehouse's `Decimal(18,4)` columns.
    pub original_loan_amount: Decimal,
    pub outstanding_principal_balance: Decimal,
    pub total_interest_amount: Option<Decimal>,
    pub kkdf_amount: Option<Decimal>,
    pub bsmv_amount: Option<Decimal>,
    /// 6 decimal places; see the Excel-corruption repair in the normalizer.
    pub nominal_interest_rate: Option<Decimal>,
    pub kkdf_rate: Option<Decimal>,
    pub bsmv_rate: Option<Decimal>,
    pub total_installment_count: Option<i32>,
    pub outstanding_installment_count: Option<i32>,
    pub paid_installment_count: Option<i32>,
    pub installment_frequency: Option<String>,
    pub grace_period_months: Option<i32>,
    pub days_past_due: Option<i32>,
    pub internal_rating: Option<String>,
    pub internal_credit_rating: Option<String>,
    pub external_rating: Option<String>,
    pub default_probability: Option<Decimal>,
    pub risk_class: Option<String>,
    pub sector_code: Option<String>,
    pub customer_segment: Option<String>,
    pub customer_province_code: Option<String>,
    pub customer_district_code: Option<String>,
    pub customer_region_code: Option<String>,
    pub insurance_included: Option<InsuranceIncluded>,
}

/// Warehouse column order for `credits_all`. Every streaming insert and
/// every `copy_partition` projection must use columns in this exact order.
pub const CREDIT_COLUMNS: &[&str] = &[
    "loan_account_number",
    "customer_id",
    "tenant_id",
    "loan_type",
    "customer_type",
    "loan_status_code",
    "loan_status_flag",
    "loan_product_type",
    "final_maturity_date",
    "first_payment_date",
    "loan_start_date",
    "loan_closing_date",
    "original_loan_amount",
    "outstanding_principal_balance",
    "total_interest_amount",
    "kkdf_amount",
    "bsmv_amount",
    "nominal_interest_rate",
    "kkdf_rate",
    "bsmv_rate",
    "total_installment_count",
    "outstanding_installment_count",
    "paid_installment_count",
    "installment_frequency",
    "grace_period_months",
    "days_past_due",
    "internal_rating",
    "internal_credit_rating",
    "external_rating",
    "default_probability",
    "risk_class",
    "sector_code",
    "customer_segment",
    "customer_province_code",
    "customer_district_code",
    "customer_region_code",
    "insurance_included",
];

/// Drives the profiler's per-column strategy (spec.md §4.5). Identifier and
/// join-key columns are `Skip`: they add no statistical signal and the
/// profiler omits them from the report entirely.
pub const CREDIT_FIELD_SCHEMA: &[(&str, FieldType)] = &[
    ("loan_account_number", FieldType::Skip),
    ("customer_id", FieldType::Skip),
    ("tenant_id", FieldType::Skip),
    ("loan_type", FieldType::Categorical),
    ("customer_type", FieldType::Categorical),
    ("loan_status_code", FieldType::Categorical),
    ("loan_status_flag", FieldType::Categorical),
    ("loan_product_type", FieldType::Categorical),
    ("final_maturity_date", FieldType::Date),
    ("first_payment_date", FieldType::Date),
    ("loan_start_date", FieldType::Date),
    ("loan_closing_date", FieldType::Date),
    ("original_loan_amount", FieldType::Numeric),
    ("outstanding_principal_balance", FieldType::Numeric),
    ("total_interest_amount", FieldType::Numeric),
    ("kkdf_amount", FieldType::Numeric),
    ("bsmv_amount", FieldType::Numeric),
    ("nominal_interest_rate", FieldType::Numeric),
    ("kkdf_rate", FieldType::Numeric),
    ("bsmv_rate", FieldType::Numeric),
    ("total_installment_count", FieldType::Numeric),
    ("outstanding_installment_count", FieldType::Numeric),
    ("paid_installment_count", FieldType::Numeric),
    ("installment_frequency", FieldType::Categorical),
    ("grace_period_months", FieldType::Numeric),
    ("days_past_due", FieldType::Numeric),
    ("internal_rating", FieldType::Categorical),
    ("internal_credit_rating", FieldType::Categorical),
    ("external_rating", FieldType::Categorical),
    ("default_probability", FieldType::Numeric),
    ("risk_class", FieldType::Categorical),
    ("sector_code", FieldType::Categorical),
    ("customer_segment", FieldType::Categorical),
    ("customer_province_code", FieldType::Categorical),
    ("customer_district_code", FieldType::Categorical),
    ("customer_region_code", FieldType::Categorical),
    ("insurance_included", FieldType::Categorical),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_list_and_field_schema_stay_aligned() {
        assert_eq!(CREDIT_COLUMNS.len(), CREDIT_FIELD_SCHEMA.len());
        for col in CREDIT_COLUMNS {
            assert!(
                CREDIT_FIELD_SCHEMA.iter().any(|(name, _)| name == col),
                "{col} missing from CREDIT_FIELD_SCHEMA"
            );
        }
    }
}
