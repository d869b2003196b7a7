//! Store Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction. Nothing in here is raised while *reading* an archival
//! unit: a URL that isn't stored is an absent [`CachedUrl`](crate::CachedUrl),
//! not an error. Only building a store from external input can fail.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A store error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The manifest file could not be read.
    #[display("could not read manifest: {}", _0.display())]
    Io(#[error(not(source))] PathBuf),
    /// A manifest line could not be understood.
    #[display("invalid manifest entry on line {line}: {reason}")]
    Manifest {
        /// One-based line number within the manifest.
        line: usize,
        /// What was wrong with the entry.
        reason: String,
    },
    /// An AU parameter was not of the form `key=value`.
    #[display("invalid AU parameter: {_0}")]
    InvalidParam(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}
