//! CLI Error Types

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A CLI error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for CLI commands.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Settings could not be loaded.
    #[display("could not load settings")]
    Settings,
    /// The plugin definition could not be loaded or compiled.
    #[display("plugin {_0} is unusable")]
    Plugin(#[error(not(source))] String),
    /// The URL manifest could not be loaded.
    #[display("manifest {} is unusable", _0.display())]
    Manifest(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
