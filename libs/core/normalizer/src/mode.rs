// [libs/core/normalizer/src/mode.rs]
use crate::errors::NormalizeError;

/// How a row-level normalizer reacts to a single field failing to parse
/// (spec.md §4.1, §7).
///
/// `Lenient` is the default for ingest: every field is normalized
/// independently, a bad optional field degrades to `None` plus a warning,
/// and the row is still emitted. `Strict` is used for replay/debugging
/// tooling that wants a hard failure on the first bad field instead of a
/// silently incomplete row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizeMode {
    Lenient,
    Strict,
}

/// Accumulates per-field warnings while normalizing one row. Required
/// fields always abort the row outright — there is no such thing as a
/// `CreditRow` without a join key — regardless of mode.
#[derive(Debug, Default)]
pub struct FieldCollector {
    mode: Option<NormalizeMode>,
    pub warnings: Vec<String>,
}

impl FieldCollector {
    pub fn new(mode: NormalizeMode) -> Self {
        Self {
            mode: Some(mode),
            warnings: Vec::new(),
        }
    }

    /// A field the row cannot be emitted without. Always propagates the
    /// underlying error so the caller drops the row.
    pub fn required<T>(
        &mut self,
        field: &'static str,
        result: Result<Option<T>, NormalizeError>,
    ) -> Result<T, NormalizeError> {
        match result? {
            Some(v) => Ok(v),
            None => Err(NormalizeError::MissingRequiredField(field)),
        }
    }

    /// A field that may legitimately be absent from the warehouse row. In
    /// `Strict` mode a parse failure aborts the row same as `required`; in
    /// `Lenient` mode it degrades to `None` and is recorded as a warning.
    pub fn optional<T>(
        &mut self,
        field: &'static str,
        result: Result<Option<T>, NormalizeError>,
    ) -> Result<Option<T>, NormalizeError> {
        match result {
            Ok(v) => Ok(v),
            Err(err) => match self.mode.expect("mode always set by new()") {
                NormalizeMode::Strict => Err(err),
                NormalizeMode::Lenient => {
                    self.warnings.push(format!("{field}: {err}"));
                    Ok(None)
                }
            },
        }
    }
}
