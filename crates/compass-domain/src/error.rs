//! Error types for mapping operations

use thiserror::Error;

/// A single branch record could not be folded into the accumulator
///
/// Mapping errors are always local to one record; callers skip the record and
/// carry on with the next one.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MappingError {
    /// The raw value does not have the branch record shape
    #[error("Malformed branch record: {0}")]
    Malformed(String),

    /// A MAIN record without a `state` block
    #[error("MAIN record has no state")]
    MissingState,

    /// Epoch timestamp outside the representable calendar range
    #[error("Timestamp out of range: {0} ms")]
    TimestampOutOfRange(i64),
}

impl From<serde_json::Error> for MappingError {
    fn from(e: serde_json::Error) -> Self {
        MappingError::Malformed(e.to_string())
    }
}
