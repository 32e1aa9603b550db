// [libs/core/normalizer/src/decimal.rs]
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::errors::NormalizeError;

/// Normalizes a raw monetary amount to a [`Decimal`] quantized to `precision`
/// places. Strips thousands-separator commas; does not interpret `%` or
/// `bps` suffixes (use [`crate::rate::to_rate`] for those).
pub fn to_decimal(raw: Option<&str>, precision: u32) -> Result<Option<Decimal>, NormalizeError> {
    let Some(raw) = raw else { return Ok(None) };
    if raw.is_empty() {
        return Ok(None);
    }
    let cleaned = raw.replace(',', "");
    let parsed = Decimal::from_str(&cleaned)
        .map_err(|_| NormalizeError::InvalidDecimal(raw.to_string()))?;
    Ok(Some(parsed.round_dp(precision)))
}

/// Monetary amounts default to 4 decimal places, matching the warehouse's
/// `Decimal(18, 4)` columns.
pub fn to_money(raw: Option<&str>) -> Result<Option<Decimal>, NormalizeError> {
    to_decimal(raw, 4)
}

/// Normalizes an installment/rating count: `"0"` and empty/absent are
/// handled symmetrically (spec.md §4.1 — "0 is valid, empty -> absent"),
/// unlike [`to_decimal`] where empty and `"0"` both simply parse normally.
/// Anything non-numeric is an error, same as any other field primitive.
pub fn to_int_count(raw: Option<&str>) -> Result<Option<i32>, NormalizeError> {
    let Some(raw) = raw else { return Ok(None) };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<i32>()
        .map(Some)
        .map_err(|_| NormalizeError::InvalidDecimal(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn strips_commas_and_quantizes() {
        assert_eq!(to_money(Some("12,345.6")).unwrap(), Some(dec!(12345.6000)));
    }

    #[test]
    fn empty_and_none_are_none() {
        assert_eq!(to_money(None).unwrap(), None);
        assert_eq!(to_money(Some("")).unwrap(), None);
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(to_money(Some("not-a-number")).is_err());
    }

    #[test]
    fn int_count_treats_zero_and_empty_symmetrically() {
        assert_eq!(to_int_count(Some("0")).unwrap(), Some(0));
        assert_eq!(to_int_count(Some("")).unwrap(), None);
        assert_eq!(to_int_count(None).unwrap(), None);
        assert_eq!(to_int_count(Some("12")).unwrap(), Some(12));
    }

    #[test]
    fn int_count_rejects_non_numeric_input() {
        assert!(to_int_count(Some("abc")).is_err());
    }
}
