//! Metadata Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction. Cooking never stops at a bad value: every problem found
//! is handed back to the caller as one of these, alongside whatever could be
//! cooked.

use derive_more::{Display, Error};

/// A metadata error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for metadata operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A raw value was rejected by the field's validator.
    #[display("invalid value for {field}: {value:?} ({reason})")]
    Validation {
        /// Key of the normalized field.
        field: String,
        /// The raw value as it was found.
        value: String,
        /// Why the validator rejected it.
        reason: String,
    },
    /// A cooking table refers to a field outside the standard vocabulary.
    #[display("unknown metadata field: {_0}")]
    UnknownField(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
