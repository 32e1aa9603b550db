// [libs/core/normalizer/src/enum_norm.rs]
use sync_domain_models::EnumCode;

use crate::errors::NormalizeError;

/// Maps a raw value to a canonical enum, accepting either the wire code or
/// the display label (case-insensitive). Returns `Ok(None)` for blank input.
pub fn to_enum<T: EnumCode>(raw: Option<&str>, enum_name: &'static str) -> Result<Option<T>, NormalizeError> {
    let Some(raw) = raw else { return Ok(None) };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    T::from_code_or_label(trimmed)
        .map(Some)
        .ok_or_else(|| NormalizeError::UnknownCategory {
            enum_name,
            raw: trimmed.to_string(),
        })
}

/// Runs `f` and swallows any [`NormalizeError`], returning `None` instead.
/// Used throughout lenient-mode row normalization so one bad field degrades
/// to a null rather than aborting the whole row; the profiler picks up the
/// resulting null-rate.
pub fn safe_normalize<T>(result: Result<Option<T>, NormalizeError>) -> Option<T> {
    result.ok().flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sync_domain_models::LoanStatusCode;

    #[test]
    fn resolves_code_or_label() {
        assert_eq!(
            to_enum::<LoanStatusCode>(Some("K"), "LoanStatusCode").unwrap(),
            Some(LoanStatusCode::Closed)
        );
        assert_eq!(
            to_enum::<LoanStatusCode>(Some("kapali"), "LoanStatusCode").unwrap(),
            Some(LoanStatusCode::Closed)
        );
    }

    #[test]
    fn unknown_value_is_an_error_but_safe_normalize_swallows_it() {
        let result = to_enum::<LoanStatusCode>(Some("nonsense"), "LoanStatusCode");
        assert!(result.is_err());
        assert_eq!(safe_normalize(result), None);
    }

    #[test]
    fn blank_is_none_not_an_error() {
        assert_eq!(to_enum::<LoanStatusCode>(Some(""), "LoanStatusCode").unwrap(), None);
    }
}
