// [libs/core/normalizer/src/payment_row.rs]
use sync_domain_models::{InstallmentStatus, LoanCategory, PaymentRow};

use crate::decimal::{to_int_count, to_money};
use crate::enum_norm::to_enum;
use crate::errors::NormalizeError;
use crate::mode::{FieldCollector, NormalizeMode};
use crate::row::{field_str, RawRow};

fn str_field(row: &RawRow, key: &str) -> Result<Option<String>, NormalizeError> {
    Ok(field_str(row, key).map(|c| c.into_owned()))
}

/// Normalizes one raw payment row into a typed [`PaymentRow`]. The join key
/// (`loan_account_number`, `installment_number`) and the scheduled
/// date/amount are required; everything else may be absent in lenient mode
/// (spec.md §4.1).
pub fn normalize_payment_row(
    row: &RawRow,
    loan_type: LoanCategory,
    tenant_id: &str,
    mode: NormalizeMode,
) -> Result<(PaymentRow, Vec<String>), NormalizeError> {
    let mut c = FieldCollector::new(mode);

    let loan_account_number = c.required("loan_account_number", str_field(row, "loan_account_number"))?;
    let installment_number = c.required(
        "installment_number",
        to_int_count(field_str(row, "installment_number").as_deref()),
    )?;
    let scheduled_payment_date = c.required(
        "scheduled_payment_date",
        crate::date::to_date(field_str(row, "scheduled_payment_date").as_deref()),
    )?;
    let installment_amount = c.required(
        "installment_amount",
        to_money(field_str(row, "installment_amount").as_deref()),
    )?;

    let actual_payment_date = c.optional(
        "actual_payment_date",
        crate::date::to_date(field_str(row, "actual_payment_date").as_deref()),
    )?;
    let principal_component = c.optional(
        "principal_component",
        to_money(field_str(row, "principal_component").as_deref()),
    )?;
    let interest_component = c.optional(
        "interest_component",
        to_money(field_str(row, "interest_component").as_deref()),
    )?;
    let kkdf_component = c.optional(
        "kkdf_component",
        to_money(field_str(row, "kkdf_component").as_deref()),
    )?;
    let bsmv_component = c.optional(
        "bsmv_component",
        to_money(field_str(row, "bsmv_component").as_deref()),
    )?;
    let installment_status = c.optional(
        "installment_status",
        to_enum::<InstallmentStatus>(field_str(row, "installment_status").as_deref(), "InstallmentStatus"),
    )?;
    let remaining_principal = c.optional(
        "remaining_principal",
        to_money(field_str(row, "remaining_principal").as_deref()),
    )?;
    let remaining_interest = c.optional(
        "remaining_interest",
        to_money(field_str(row, "remaining_interest").as_deref()),
    )?;
    let remaining_kkdf = c.optional(
        "remaining_kkdf",
        to_money(field_str(row, "remaining_kkdf").as_deref()),
    )?;
    let remaining_bsmv = c.optional(
        "remaining_bsmv",
        to_money(field_str(row, "remaining_bsmv").as_deref()),
    )?;

    let parsed = PaymentRow {
        loan_account_number,
        tenant_id: tenant_id.to_string(),
        loan_type,
        installment_number,
        actual_payment_date,
        scheduled_payment_date,
        installment_amount,
        principal_component,
        interest_component,
        kkdf_component,
        bsmv_component,
        installment_status,
        remaining_principal,
        remaining_interest,
        remaining_kkdf,
        remaining_bsmv,
    };

    Ok((parsed, c.warnings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(fields: &[(&str, serde_json::Value)]) -> RawRow {
        let mut map = serde_json::Map::new();
        for (k, v) in fields {
            map.insert(k.to_string(), v.clone());
        }
        map
    }

    fn complete_row() -> RawRow {
        row(&[
            ("loan_account_number", json!("L-1")),
            ("installment_number", json!(3)),
            ("scheduled_payment_date", json!("2025-03-01")),
            ("actual_payment_date", json!("2025-03-01")),
            ("installment_amount", json!("1500.00")),
            ("principal_component", json!("1200.00")),
            ("interest_component", json!("300.00")),
            ("installment_status", json!("Odendi")),
        ])
    }

    #[test]
    fn normalizes_a_paid_installment() {
        let raw = complete_row();
        let (parsed, warnings) =
            normalize_payment_row(&raw, LoanCategory::Retail, "ACME", NormalizeMode::Strict).unwrap();
        assert!(warnings.is_empty());
        assert_eq!(parsed.installment_number, 3);
        assert_eq!(parsed.installment_status, Some(InstallmentStatus::Paid));
        assert!(parsed.actual_payment_date.is_some());
    }

    #[test]
    fn missing_scheduled_date_rejects_the_row() {
        let raw = row(&[("loan_account_number", json!("L-1")), ("installment_number", json!(1))]);
        assert!(normalize_payment_row(&raw, LoanCategory::Retail, "ACME", NormalizeMode::Lenient).is_err());
    }

    #[test]
    fn lenient_mode_absorbs_bad_optional_component_as_warning() {
        let mut raw = complete_row();
        raw.insert("interest_component".into(), json!("garbage"));
        let (parsed, warnings) =
            normalize_payment_row(&raw, LoanCategory::Retail, "ACME", NormalizeMode::Lenient).unwrap();
        assert_eq!(parsed.interest_component, None);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn installment_number_zero_is_valid_not_absent() {
        let mut raw = complete_row();
        raw.insert("installment_number".into(), json!(0));
        let (parsed, _) =
            normalize_payment_row(&raw, LoanCategory::Retail, "ACME", NormalizeMode::Strict).unwrap();
        assert_eq!(parsed.installment_number, 0);
    }
}
