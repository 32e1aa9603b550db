// [libs/core/normalizer/src/row.rs]
use serde_json::{Map, Value};

/// Upstream rows arrive as one JSON object per element of a streamed array;
/// this is that object before any typing has been applied.
pub type RawRow = Map<String, Value>;

/// Reads `key` out of `row` and stringifies it the way the source system's
/// loose typing would: strings pass through, numbers and bools are
/// rendered textually, `null`/absent keys become `None`.
pub fn field_str<'a>(row: &'a RawRow, key: &str) -> Option<std::borrow::Cow<'a, str>> {
    match row.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => {
            if s.is_empty() {
                None
            } else {
                Some(std::borrow::Cow::Borrowed(s.as_str()))
            }
        }
        Some(Value::Number(n)) => Some(std::borrow::Cow::Owned(n.to_string())),
        Some(Value::Bool(b)) => Some(std::borrow::Cow::Owned(b.to_string())),
        Some(other) => Some(std::borrow::Cow::Owned(other.to_string())),
    }
}

/// `loan_account_number` is never absorbed into `None`: a missing key
/// stringifies to `""` and a present-but-null value stringifies to the
/// literal `"None"`, mirroring the upstream system's own loose typing. Both
/// are "ghost loan" markers the validator checks for (spec.md §4.4), so the
/// row must keep carrying the key instead of dropping it the way
/// [`field_str`] would for every other column.
pub fn loan_account_number_str(row: &RawRow) -> String {
    match row.get("loan_account_number") {
        None => String::new(),
        Some(Value::Null) => "None".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => other.to_string(),
    }
}
