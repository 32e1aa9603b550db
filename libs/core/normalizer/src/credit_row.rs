// [libs/core/normalizer/src/credit_row.rs]
use sync_domain_models::{
    CreditRow, CustomerType, InsuranceIncluded, LoanCategory, LoanProductType, LoanStatusCode,
    LoanStatusFlag,
};

use crate::decimal::{to_int_count, to_money};
use crate::enum_norm::to_enum;
use crate::errors::NormalizeError;
use crate::mode::{FieldCollector, NormalizeMode};
use crate::rate::to_rate_default;
use crate::row::{field_str, loan_account_number_str, RawRow};

fn str_field(row: &RawRow, key: &str) -> Result<Option<String>, NormalizeError> {
    Ok(field_str(row, key).map(|c| c.into_owned()))
}

/// Normalizes one raw credit row into a typed [`CreditRow`], injecting the
/// `loan_type`/`tenant_id` the triggering job carries (the upstream payload
/// never carries either). Returns the row plus any per-field warnings
/// absorbed in [`NormalizeMode::Lenient`] mode.
///
/// The six columns a sync cannot proceed without — `customer_id`,
/// `customer_type`, `loan_status_code`, `loan_start_date`,
/// `original_loan_amount`, `outstanding_principal_balance` — abort the row
/// in both modes when missing or malformed; every other column degrades to
/// `None` in lenient mode instead (spec.md §4.1).
///
/// `loan_account_number` is deliberately not in that list: an empty or null
/// value is a *ghost loan*, not a malformed row, and must reach staging so
/// the validator's critical check can count it and fail the sync
/// (spec.md §4.4, §8 scenario 3). It is carried through verbatim via
/// [`loan_account_number_str`] instead of the usual required-field path.
pub fn normalize_credit_row(
    row: &RawRow,
    loan_type: LoanCategory,
    tenant_id: &str,
    mode: NormalizeMode,
) -> Result<(CreditRow, Vec<String>), NormalizeError> {
    let mut c = FieldCollector::new(mode);

    let loan_account_number = loan_account_number_str(row);
    let customer_id = c.required("customer_id", str_field(row, "customer_id"))?;
    let customer_type = c.required(
        "customer_type",
        to_enum::<CustomerType>(field_str(row, "customer_type").as_deref(), "CustomerType"),
    )?;
    let loan_status_code = c.required(
        "loan_status_code",
        to_enum::<LoanStatusCode>(field_str(row, "loan_status_code").as_deref(), "LoanStatusCode"),
    )?;
    let loan_start_date = c.required(
        "loan_start_date",
        crate::date::to_date(field_str(row, "loan_start_date").as_deref()),
    )?;
    let original_loan_amount = c.required(
        "original_loan_amount",
        to_money(field_str(row, "original_loan_amount").as_deref()),
    )?;
    let outstanding_principal_balance = c.required(
        "outstanding_principal_balance",
        to_money(field_str(row, "outstanding_principal_balance").as_deref()),
    )?;

    // loan_status_flag defaults from loan_status_code when the upstream row
    // omits it or sends something unrecognized — commercial feeds carry a
    // distinct flag, retail feeds often only ever send the status code.
    let loan_status_flag = c
        .optional(
            "loan_status_flag",
            to_enum::<LoanStatusFlag>(field_str(row, "loan_status_flag").as_deref(), "LoanStatusFlag"),
        )?
        .unwrap_or_else(|| default_status_flag(loan_status_code));

    let loan_product_type = c.optional(
        "loan_product_type",
        to_enum::<LoanProductType>(field_str(row, "loan_product_type").as_deref(), "LoanProductType"),
    )?;
    let final_maturity_date = c.optional(
        "final_maturity_date",
        crate::date::to_date(field_str(row, "final_maturity_date").as_deref()),
    )?;
    let first_payment_date = c.optional(
        "first_payment_date",
        crate::date::to_date(field_str(row, "first_payment_date").as_deref()),
    )?;
    let loan_closing_date = c.optional(
        "loan_closing_date",
        crate::date::to_date(field_str(row, "loan_closing_date").as_deref()),
    )?;
    let total_interest_amount = c.optional(
        "total_interest_amount",
        to_money(field_str(row, "total_interest_amount").as_deref()),
    )?;
    let kkdf_amount = c.optional("kkdf_amount", to_money(field_str(row, "kkdf_amount").as_deref()))?;
    let bsmv_amount = c.optional("bsmv_amount", to_money(field_str(row, "bsmv_amount").as_deref()))?;
    let nominal_interest_rate = c.optional(
        "nominal_interest_rate",
        to_rate_default(field_str(row, "nominal_interest_rate").as_deref()),
    )?;
    let kkdf_rate = c.optional(
        "kkdf_rate",
        to_rate_default(field_str(row, "kkdf_rate").as_deref()),
    )?;
    let bsmv_rate = c.optional(
        "bsmv_rate",
        to_rate_default(field_str(row, "bsmv_rate").as_deref()),
    )?;
    let total_installment_count = c.optional(
        "total_installment_count",
        to_int_count(field_str(row, "total_installment_count").as_deref()),
    )?;
    let outstanding_installment_count = c.optional(
        "outstanding_installment_count",
        to_int_count(field_str(row, "outstanding_installment_count").as_deref()),
    )?;
    let paid_installment_count = c.optional(
        "paid_installment_count",
        to_int_count(field_str(row, "paid_installment_count").as_deref()),
    )?;
    let installment_frequency = c.optional("installment_frequency", str_field(row, "installment_frequency"))?;
    let grace_period_months = c.optional(
        "grace_period_months",
        to_int_count(field_str(row, "grace_period_months").as_deref()),
    )?;
    let days_past_due = c.optional(
        "days_past_due",
        to_int_count(field_str(row, "days_past_due").as_deref()),
    )?;
    let internal_rating = c.optional("internal_rating", str_field(row, "internal_rating"))?;
    let internal_credit_rating = c.optional("internal_credit_rating", str_field(row, "internal_credit_rating"))?;
    let external_rating = c.optional("external_rating", str_field(row, "external_rating"))?;
    let default_probability = c.optional(
        "default_probability",
        to_money(field_str(row, "default_probability").as_deref()),
    )?;
    let risk_class = c.optional("risk_class", str_field(row, "risk_class"))?;
    let sector_code = c.optional("sector_code", str_field(row, "sector_code"))?;
    let customer_segment = c.optional("customer_segment", str_field(row, "customer_segment"))?;
    let customer_province_code = c.optional("customer_province_code", str_field(row, "customer_province_code"))?;
    let customer_district_code = c.optional("customer_district_code", str_field(row, "customer_district_code"))?;
    let customer_region_code = c.optional("customer_region_code", str_field(row, "customer_region_code"))?;
    let insurance_included = c.optional(
        "insurance_included",
        to_enum::<InsuranceIncluded>(field_str(row, "insurance_included").as_deref(), "InsuranceIncluded"),
    )?;

    let parsed = CreditRow {
        loan_account_number,
        customer_id,
        tenant_id: tenant_id.to_string(),
        loan_type,
        customer_type,
        loan_status_code,
        loan_status_flag,
        loan_product_type,
        final_maturity_date,
        first_payment_date,
        loan_start_date,
        loan_closing_date,
        original_loan_amount,
        outstanding_principal_balance,
        total_interest_amount,
        kkdf_amount,
        bsmv_amount,
        nominal_interest_rate,
        kkdf_rate,
        bsmv_rate,
        total_installment_count,
        outstanding_installment_count,
        paid_installment_count,
        installment_frequency,
        grace_period_months,
        days_past_due,
        internal_rating,
        internal_credit_rating,
        external_rating,
        default_probability,
        risk_class,
        sector_code,
        customer_segment,
        customer_province_code,
        customer_district_code,
        customer_region_code,
        insurance_included,
    };

    Ok((parsed, c.warnings))
}

fn default_status_flag(status_code: LoanStatusCode) -> LoanStatusFlag {
    match status_code {
        LoanStatusCode::Active => LoanStatusFlag::Performing,
        LoanStatusCode::Closed => LoanStatusFlag::Closed,
        LoanStatusCode::NonPerforming => LoanStatusFlag::NonPerforming,
        LoanStatusCode::Restructured => LoanStatusFlag::Performing,
    }
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
            ("customer_id", json!("C-1")),
            ("customer_type", json!("K")),
            ("loan_status_code", json!("A")),
            ("loan_start_date", json!("2024-01-15")),
            ("original_loan_amount", json!("100,000.00")),
            ("outstanding_principal_balance", json!("50000")),
            ("nominal_interest_rate", json!("May.14")),
            ("bsmv_rate", json!("5.Mar")),
            ("kkdf_rate", json!("0.01")),
            ("final_maturity_date", json!("2029-01-15")),
        ])
    }

    #[test]
    fn normalizes_a_complete_commercial_row() {
        let raw = complete_row();
        let (parsed, warnings) =
            normalize_credit_row(&raw, LoanCategory::Commercial, "ACME", NormalizeMode::Strict).unwrap();
        assert!(warnings.is_empty());
        assert_eq!(parsed.loan_account_number, "L-1");
        assert_eq!(parsed.tenant_id, "ACME");
        assert_eq!(parsed.bsmv_rate.unwrap().to_string(), "0.053000");
        assert_eq!(parsed.loan_status_flag, LoanStatusFlag::Performing);
    }

    #[test]
    fn missing_required_field_rejects_the_row_in_both_modes() {
        let raw = row(&[("loan_account_number", json!("L-2"))]);
        assert!(normalize_credit_row(&raw, LoanCategory::Retail, "ACME", NormalizeMode::Lenient).is_err());
        assert!(normalize_credit_row(&raw, LoanCategory::Retail, "ACME", NormalizeMode::Strict).is_err());
    }

    #[test]
    fn ghost_loan_account_number_reaches_staging_instead_of_dropping_the_row() {
        let mut raw = complete_row();
        raw.insert("loan_account_number".into(), json!(""));
        let (parsed, _) =
            normalize_credit_row(&raw, LoanCategory::Commercial, "ACME", NormalizeMode::Lenient).unwrap();
        assert_eq!(parsed.loan_account_number, "");

        let mut raw = complete_row();
        raw.insert("loan_account_number".into(), serde_json::Value::Null);
        let (parsed, _) =
            normalize_credit_row(&raw, LoanCategory::Commercial, "ACME", NormalizeMode::Lenient).unwrap();
        assert_eq!(parsed.loan_account_number, "None");
    }

    #[test]
    fn lenient_mode_absorbs_a_bad_optional_field_as_a_warning() {
        let mut raw = complete_row();
        raw.insert("default_probability".into(), json!("not-a-number"));
        let (parsed, warnings) =
            normalize_credit_row(&raw, LoanCategory::Commercial, "ACME", NormalizeMode::Lenient).unwrap();
        assert_eq!(parsed.default_probability, None);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("default_probability"));
    }

    #[test]
    fn strict_mode_rejects_a_bad_optional_field() {
        let mut raw = complete_row();
        raw.insert("default_probability".into(), json!("not-a-number"));
        assert!(normalize_credit_row(&raw, LoanCategory::Commercial, "ACME", NormalizeMode::Strict).is_err());
    }

    #[test]
    fn status_flag_defaults_from_status_code_when_absent() {
        let raw = complete_row();
        let (parsed, _) =
            normalize_credit_row(&raw, LoanCategory::Commercial, "ACME", NormalizeMode::Lenient).unwrap();
        assert_eq!(parsed.loan_status_flag, LoanStatusFlag::Performing);
    }
}
