// [libs/core/normalizer/src/errors.rs]
use thiserror::Error;

/// Raised when a single field cannot be coerced to its target type.
///
/// In lenient mode (the default for full-row normalization) callers catch
/// this per-field and fall back to `None`, tracking the miss for the
/// profiler's null-rate stats. In strict mode it aborts the whole row.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("[NORM-DATE] invalid date format: {0:?}")]
    InvalidDate(String),

    #[error("[NORM-DECIMAL] invalid monetary amount: {0:?}")]
    InvalidDecimal(String),

    #[error("[NORM-RATE] invalid rate: {0:?}")]
    InvalidRate(String),

    #[error("[NORM-ENUM] unknown category for {enum_name}: {raw:?}")]
    UnknownCategory { enum_name: &'static str, raw: String },

    #[error("[NORM-REQUIRED] required field {0} is missing or blank")]
    MissingRequiredField(&'static str),
}
