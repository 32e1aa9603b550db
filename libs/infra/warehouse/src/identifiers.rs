// [libs/infra/warehouse/src/identifiers.rs]
use crate::errors::WarehouseError;

/// Every table and column name this crate interpolates into SQL (instead of
/// binding as a parameter, which ClickHouse's HTTP interface does not
/// support for identifiers) must pass through here first. Staging table
/// names are built from tenant slugs and category names, both of which
/// ultimately come from operator-controlled config rather than upstream
/// data, but we validate anyway since a typo'd slug is as dangerous as a
/// malicious one once it's sitting inside a format string.
pub fn validate_identifier(raw: &str) -> Result<&str, WarehouseError> {
    if raw.is_empty() || raw.len() > 128 {
        return Err(WarehouseError::UnsafeIdentifier(raw.to_string()));
    }
    let mut chars = raw.chars();
    let first_ok = chars.next().map(|c| c.is_ascii_alphabetic() || c == '_').unwrap_or(false);
    let rest_ok = raw.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if first_ok && rest_ok {
        Ok(raw)
    } else {
        Err(WarehouseError::UnsafeIdentifier(raw.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_identifiers() {
        assert!(validate_identifier("stg_acme_retail_credit").is_ok());
        assert!(validate_identifier("credits_all").is_ok());
    }

    #[test]
    fn rejects_anything_that_could_break_out_of_an_identifier() {
        assert!(validate_identifier("credits_all; DROP TABLE credits_all").is_err());
        assert!(validate_identifier("").is_err());
        assert!(validate_identifier("1leading_digit").is_err());
        assert!(validate_identifier("has space").is_err());
    }
}
