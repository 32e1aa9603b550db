// [libs/core/normalizer/src/rate.rs]
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::errors::NormalizeError;
use crate::excel_repair::repair_excel_rate;

const ONE_HUNDRED: Decimal = Decimal::from_parts(100, 0, 0, false, 0);
const TEN_THOUSAND: Decimal = Decimal::from_parts(10000, 0, 0, false, 0);

/// Normalizes a raw interest/tax rate string to a fractional [`Decimal`]
/// (e.g. `"5.14%"` -> `0.0514`), quantized to `precision` places (6 by
/// default for warehouse `Decimal(10, 6)` columns).
///
/// Order of operations mirrors the source system's quirks exactly:
/// 1. strip `%` and thousands commas
/// 2. `bps` suffix divides by 10,000 and returns immediately (no percentage heuristic)
/// 3. repair Excel's month-abbreviation corruption
/// 4. values `>= 1` are assumed to be written as whole percentages and divided by 100
pub fn to_rate(raw: Option<&str>, precision: u32) -> Result<Option<Decimal>, NormalizeError> {
    let Some(raw) = raw else { return Ok(None) };
    if raw.is_empty() {
        return Ok(None);
    }
    let mut cleaned = raw.trim().replace('%', "").replace(',', "");

    if cleaned.to_lowercase().contains("bps") {
        cleaned = cleaned.to_lowercase().replace("bps", "").trim().to_string();
        let bps = Decimal::from_str(&cleaned)
            .map_err(|_| NormalizeError::InvalidRate(raw.to_string()))?;
        return Ok(Some((bps / TEN_THOUSAND).round_dp(precision)));
    }

    cleaned = repair_excel_rate(&cleaned);
    let mut parsed =
        Decimal::from_str(&cleaned).map_err(|_| NormalizeError::InvalidRate(raw.to_string()))?;
    if parsed >= Decimal::ONE {
        parsed /= ONE_HUNDRED;
    }
    Ok(Some(parsed.round_dp(precision)))
}

/// Rates default to 6 decimal places, matching the warehouse's
/// `Decimal(10, 6)` columns.
pub fn to_rate_default(raw: Option<&str>) -> Result<Option<Decimal>, NormalizeError> {
    to_rate(raw, 6)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn plain_fraction_passes_through_unscaled() {
        assert_eq!(to_rate_default(Some("0.0514")).unwrap(), Some(dec!(0.051400)));
    }

    #[test]
    fn whole_percentage_is_divided_by_100() {
        assert_eq!(to_rate_default(Some("18.5")).unwrap(), Some(dec!(0.185000)));
        assert_eq!(to_rate_default(Some("5.14%")).unwrap(), Some(dec!(0.051400)));
    }

    #[test]
    fn bps_suffix_divides_by_ten_thousand_and_skips_percentage_heuristic() {
        assert_eq!(to_rate_default(Some("514 bps")).unwrap(), Some(dec!(0.051400)));
    }

    #[test]
    fn excel_corrupted_rate_is_repaired_before_parsing() {
        // "May.14" -> "5.14" -> >= 1 so /100 -> 0.0514, matching the documented
        // bsmv_rate regression value.
        assert_eq!(to_rate_default(Some("May.14")).unwrap(), Some(dec!(0.051400)));
        assert_eq!(to_rate_default(Some("5.Mar")).unwrap(), Some(dec!(0.053000)));
    }

    #[test]
    fn none_and_empty_are_not_errors() {
        assert_eq!(to_rate_default(None).unwrap(), None);
        assert_eq!(to_rate_default(Some("")).unwrap(), None);
    }
}
