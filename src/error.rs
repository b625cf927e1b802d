//! Pipeline Error Types
//!
//! Only setup problems and a broken output stream stop a run; everything
//! else is reported per resource, container or member and skipped.

use derive_more::{Display, Error};

/// A pipeline error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The configuration cannot be used.
    #[display("invalid configuration")]
    Config,
    /// The cache directory cannot be created or accessed.
    #[display("cannot prepare the cache directory")]
    Setup,
    /// Discovered URLs could not be written out.
    #[display("cannot write output")]
    Output,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Output)
    }
}
