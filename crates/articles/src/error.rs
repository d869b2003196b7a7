//! Article Iterator Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction. Errors only arise while turning a plugin's declarative
//! aspect table into a compiled [`ArticleTable`](crate::ArticleTable) for one
//! archival unit. Iteration and resolution never fail: a URL that can't be
//! turned into an article is simply not an article.

use derive_more::{Display, Error};

/// An article iterator error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for article iterator operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The iterator specification is contradictory or incomplete.
    #[display("invalid iterator specification: {_0}")]
    InvalidSpec(#[error(not(source))] String),
    /// One aspect of the table is unusable.
    #[display("invalid aspect #{index}: {reason}")]
    InvalidAspect {
        /// Zero-based position of the aspect in declaration order.
        index: usize,
        /// What is wrong with it.
        reason: String,
    },
    /// A pattern, template or replacement could not be compiled against the
    /// AU's parameters.
    #[display("could not compile {_0}")]
    Compile(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
