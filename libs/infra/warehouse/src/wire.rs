// [libs/infra/warehouse/src/wire.rs]
//! Converts typed domain rows into the JSON object shape ClickHouse expects
//! for `FORMAT JSONEachRow` inserts: enum fields serialize to their wire
//! `code()`, not their Rust variant name.

use serde_json::{json, Value};
use sync_domain_models::{CreditRow, EnumCode, PaymentRow};

pub fn credit_row_to_json(row: &CreditRow) -> Value {
    json!({
        "loan_account_number": row.loan_account_number,
        "customer_id": row.customer_id,
        "tenant_id": row.tenant_id,
        "loan_type": row.loan_type.wire(),
        "customer_type": row.customer_type.code(),
        "loan_status_code": row.loan_status_code.code(),
        "loan_status_flag": row.loan_status_flag.code(),
        "loan_product_type": row.loan_product_type.map(|v| v.code()),
        "final_maturity_date": row.final_maturity_date.map(|d| d.to_string()),
        "first_payment_date": row.first_payment_date.map(|d| d.to_string()),
        "loan_start_date": row.loan_start_date.to_string(),
        "loan_closing_date": row.loan_closing_date.map(|d| d.to_string()),
        "original_loan_amount": row.original_loan_amount.to_string(),
        "outstanding_principal_balance": row.outstanding_principal_balance.to_string(),
        "total_interest_amount": row.total_interest_amount.map(|v| v.to_string()),
        "kkdf_amount": row.kkdf_amount.map(|v| v.to_string()),
        "bsmv_amount": row.bsmv_amount.map(|v| v.to_string()),
        "nominal_interest_rate": row.nominal_interest_rate.map(|v| v.to_string()),
        "kkdf_rate": row.kkdf_rate.map(|v| v.to_string()),
        "bsmv_rate": row.bsmv_rate.map(|v| v.to_string()),
        "total_installment_count": row.total_installment_count,
        "outstanding_installment_count": row.outstanding_installment_count,
        "paid_installment_count": row.paid_installment_count,
        "installment_frequency": row.installment_frequency,
        "grace_period_months": row.grace_period_months,
        "days_past_due": row.days_past_due,
        "internal_rating": row.internal_rating,
        "internal_credit_rating": row.internal_credit_rating,
        "external_rating": row.external_rating,
        "default_probability": row.default_probability.map(|v| v.to_string()),
        "risk_class": row.risk_class,
        "sector_code": row.sector_code,
        "customer_segment": row.customer_segment,
        "customer_province_code": row.customer_province_code,
        "customer_district_code": row.customer_district_code,
        "customer_region_code": row.customer_region_code,
        "insurance_included": row.insurance_included.map(|v| v.code()),
    })
}

pub fn payment_row_to_json(row: &PaymentRow) -> Value {
    json!({
        "loan_account_number": row.loan_account_number,
        "tenant_id": row.tenant_id,
        "loan_type": row.loan_type.wire(),
        "installment_number": row.installment_number,
        "actual_payment_date": row.actual_payment_date.map(|d| d.to_string()),
        "scheduled_payment_date": row.scheduled_payment_date.to_string(),
        "installment_amount": row.installment_amount.to_string(),
        "principal_component": row.principal_component.map(|v| v.to_string()),
        "interest_component": row.interest_component.map(|v| v.to_string()),
        "kkdf_component": row.kkdf_component.map(|v| v.to_string()),
        "bsmv_component": row.bsmv_component.map(|v| v.to_string()),
        "installment_status": row.installment_status.map(|v| v.code()),
        "remaining_principal": row.remaining_principal.map(|v| v.to_string()),
        "remaining_interest": row.remaining_interest.map(|v| v.to_string()),
        "remaining_kkdf": row.remaining_kkdf.map(|v| v.to_string()),
        "remaining_bsmv": row.remaining_bsmv.map(|v| v.to_string()),
    })
}

/// Renders rows as newline-delimited JSON for a `FORMAT JSONEachRow` insert body.
pub fn to_ndjson(rows: &[Value]) -> String {
    rows.iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
