// [libs/domain/models/src/payment.rs]
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::enums::{FieldType, InstallmentStatus, LoanCategory};

/// A single normalized row of the `{category}_payment` upstream stream.
/// Only the join key (`loan_account_number`, `installment_number`) and the
/// scheduled date/amount are required; the remaining components may be
/// absent in lenient mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRow {
    pub loan_account_number: String,
    /// Injected by the loader from the triggering job.
    pub tenant_id: String,
    pub loan_type: LoanCategory,
    pub installment_number: i32,
    pub actual_payment_date: Option<NaiveDate>,
    pub scheduled_payment_date: NaiveDate,
    pub installment_amount: Decimal,
    pub principal_component: Option<Decimal>,
    pub interest_component: Option<Decimal>,
    pub kkdf_component: Option<Decimal>,
    pub bsmv_component: Option<Decimal>,
    pub installment_status: Option<InstallmentStatus>,
    pub remaining_principal: Option<Decimal>,
    pub remaining_interest: Option<Decimal>,
    pub remaining_kkdf: Option<Decimal>,
    pub remaining_bsmv: Option<Decimal>,
}

/// Warehouse column order for `payments_all`.
pub const PAYMENT_COLUMNS: &[&str] = &[
    "loan_account_number",
    "tenant_id",
    "loan_type",
    "installment_number",
    "actual_payment_date",
    "scheduled_payment_date",
    "installment_amount",
    "principal_component",
    "interest_component",
    "kkdf_component",
    "bsmv_component",
    "installment_status",
    "remaining_principal",
    "remaining_interest",
    "remaining_kkdf",
    "remaining_bsmv",
];

pub const PAYMENT_FIELD_SCHEMA: &[(&str, FieldType)] = &[
    ("loan_account_number", FieldType::Skip),
    ("tenant_id", FieldType::Skip),
    ("loan_type", FieldType::Categorical),
    ("installment_number", FieldType::Numeric),
    ("actual_payment_date", FieldType::Date),
    ("scheduled_payment_date", FieldType::Date),
    ("installment_amount", FieldType::Numeric),
    ("principal_component", FieldType::Numeric),
    ("interest_component", FieldType::Numeric),
    ("kkdf_component", FieldType::Numeric),
    ("bsmv_component", FieldType::Numeric),
    ("installment_status", FieldType::Categorical),
    ("remaining_principal", FieldType::Numeric),
    ("remaining_interest", FieldType::Numeric),
    ("remaining_kkdf", FieldType::Numeric),
    ("remaining_bsmv", FieldType::Numeric),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_list_and_field_schema_stay_aligned() {
        assert_eq!(PAYMENT_COLUMNS.len(), PAYMENT_FIELD_SCHEMA.len());
        for col in PAYMENT_COLUMNS {
            assert!(PAYMENT_FIELD_SCHEMA.iter().any(|(name, _)| name == col));
        }
    }
}
