//! Pattern Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction. Every error here is a configuration problem detected
//! while compiling a plugin: once compiled, matching never fails.

use derive_more::{Display, Error};

/// A pattern error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for pattern operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A regular expression failed to compile.
    #[display("invalid regular expression: {_0}")]
    InvalidRegex(#[error(not(source))] String),
    /// A URL or regex template failed to compile or render.
    #[display("invalid template: {_0}")]
    InvalidTemplate(#[error(not(source))] String),
    /// A template references an AU parameter that was not supplied.
    #[display("missing AU parameter: {_0}")]
    MissingParam(#[error(not(source))] String),
    /// A matcher replacement string is malformed.
    #[display("invalid replacement: {_0}")]
    InvalidReplacement(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Configuration is either valid or it isn't.
        false
    }
}
