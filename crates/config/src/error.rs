//! Config Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A config error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for config operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// No plugin definition exists under that name or path.
    #[display("plugin definition not found: {_0}")]
    NotFound(#[error(not(source))] String),
    /// The file exists but could not be read.
    #[display("could not read {}", _0.display())]
    Io(#[error(not(source))] PathBuf),
    /// The definition could not be parsed, or has fields of the wrong shape.
    #[display("malformed plugin definition: {_0}")]
    Malformed(#[error(not(source))] String),
    /// The definition parsed, but doesn't make a usable article table.
    #[display("invalid plugin {plugin}: {reason}")]
    Invalid { plugin: String, reason: String },
    /// Settings could not be loaded.
    #[display("invalid settings: {_0}")]
    Settings(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}
