// [libs/core/normalizer/src/date.rs]
use chrono::format::{parse, Parsed, StrftimeItems};
use chrono::NaiveDate;

use crate::errors::NormalizeError;

/// Formats tried in order, ISO first since it is the overwhelming majority
/// of real traffic; the legacy `%b.%y` form only shows up in a handful of
/// older commercial-loan exports.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y%m%d", "%d.%m.%Y", "%d/%m/%Y", "%b.%y"];

/// `%b.%y` carries no day component, so `NaiveDate::parse_from_str` always
/// fails it with `NotEnoughInformation`; fill the day in ourselves so the
/// month/year still resolve to the first of the month, matching what a
/// `strptime("%b.%y")` default would give.
fn parse_abbreviated_month_year(trimmed: &str) -> Option<NaiveDate> {
    let mut parsed = Parsed::new();
    parse(&mut parsed, trimmed, StrftimeItems::new("%b.%y")).ok()?;
    parsed.set_day(1).ok()?;
    parsed.to_naive_date().ok()
}

/// Normalizes a raw date string to a [`NaiveDate`]. Empty/whitespace input
/// is a valid "no date" and returns `Ok(None)`; anything else that matches
/// none of [`DATE_FORMATS`] is an error.
pub fn to_date(raw: Option<&str>) -> Result<Option<NaiveDate>, NormalizeError> {
    let Some(raw) = raw else { return Ok(None) };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    for fmt in DATE_FORMATS {
        if *fmt == "%b.%y" {
            if let Some(date) = parse_abbreviated_month_year(trimmed) {
                return Ok(Some(date));
            }
            continue;
        }
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Ok(Some(date));
        }
    }
    Err(NormalizeError::InvalidDate(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_iso_and_compact_and_tr_forms() {
        let expected = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        assert_eq!(to_date(Some("2025-09-01")).unwrap(), Some(expected));
        assert_eq!(to_date(Some("20250901")).unwrap(), Some(expected));
        assert_eq!(to_date(Some("01.09.2025")).unwrap(), Some(expected));
        assert_eq!(to_date(Some("01/09/2025")).unwrap(), Some(expected));
    }

    #[test]
    fn accepts_legacy_abbreviated_month_year() {
        let parsed = to_date(Some("May.24")).unwrap().unwrap();
        assert_eq!(parsed.format("%Y-%m").to_string(), "2024-05");
    }

    #[test]
    fn blank_and_none_are_not_errors() {
        assert_eq!(to_date(None).unwrap(), None);
        assert_eq!(to_date(Some("   ")).unwrap(), None);
    }

    #[test]
    fn unparseable_value_is_an_error() {
        assert!(to_date(Some("not-a-date")).is_err());
    }
}
