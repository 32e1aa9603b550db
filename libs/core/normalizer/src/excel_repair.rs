// [libs/core/normalizer/src/excel_repair.rs]
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Month abbreviations, English and Turkish, that Excel's autocorrect
/// silently substitutes for a decimal point's leading digits (`5.14` becomes
/// `May.14`, `5.03` becomes `5.Mar`). Both `mar` and `may` are shared
/// between the two languages, so the table has exactly one entry for each.
static MONTH_MAP: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("jan", "1"), ("feb", "2"), ("mar", "3"), ("apr", "4"), ("may", "5"), ("jun", "6"),
        ("jul", "7"), ("aug", "8"), ("sep", "9"), ("oct", "10"), ("nov", "11"), ("dec", "12"),
        ("oca", "1"), ("şub", "2"), ("nis", "4"), ("haz", "6"),
        ("tem", "7"), ("ağu", "8"), ("eyl", "9"), ("eki", "10"), ("kas", "11"), ("ara", "12"),
    ]
    .into_iter()
    .collect()
});

static MONTH_DOT_DIGITS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^([a-zşçöğüı]{3})\.?(\d+)$").unwrap());
static DIGITS_DOT_MONTH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(\d+)\.([a-zşçöğüı]{3})$").unwrap());

/// Repairs the month.digits (`"may.14"`) and digits.month (`"5.mar"`) Excel
/// corruption patterns back into a plain decimal string. Values that don't
/// match either pattern pass through untouched.
pub fn repair_excel_rate(value: &str) -> String {
    let lower = value.to_lowercase();

    if let Some(caps) = MONTH_DOT_DIGITS.captures(&lower) {
        let month = &caps[1];
        let remainder = &caps[2];
        if let Some(num) = MONTH_MAP.get(month) {
            return format!("{num}.{remainder}");
        }
    }

    if let Some(caps) = DIGITS_DOT_MONTH.captures(&lower) {
        let digits = &caps[1];
        let month = &caps[2];
        if let Some(num) = MONTH_MAP.get(month) {
            return format!("{digits}.{num}");
        }
    }

    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repairs_month_dot_digits() {
        assert_eq!(repair_excel_rate("May.14"), "5.14");
        assert_eq!(repair_excel_rate("may14"), "5.14");
    }

    #[test]
    fn repairs_digits_dot_month() {
        assert_eq!(repair_excel_rate("5.Mar"), "5.3");
    }

    #[test]
    fn repairs_turkish_month_abbreviations() {
        assert_eq!(repair_excel_rate("Şub.2"), "2.2");
    }

    #[test]
    fn passes_through_plain_decimals() {
        assert_eq!(repair_excel_rate("5.14"), "5.14");
        assert_eq!(repair_excel_rate("0.051400"), "0.051400");
    }
}
