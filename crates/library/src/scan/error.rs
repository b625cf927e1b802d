//! Error types for the [`scan`](super) module.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A scan error with automatic location tracking via [`exn::Exn`].
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for scan operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Container-level failures. Problems with a single member never surface
/// as errors; the member is logged and skipped.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The container file could not be opened.
    #[display("cannot open container {}", _0.display())]
    Open(#[error(not(source))] PathBuf),
    /// The container stream is corrupt or truncated; no further members can
    /// be read from it.
    #[display("corrupt container {}", _0.display())]
    Container(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Re-mirroring might; re-reading the same bytes won't.
        false
    }
}
