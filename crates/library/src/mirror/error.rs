//! Error types for the [`mirror`](super) module.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A mirror error with automatic location tracking via [`exn::Exn`].
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for mirror operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Why a single resource could not be mirrored.
///
/// ### Remote
/// - [`ErrorKind::Unreachable`]
/// - [`ErrorKind::Transfer`]
/// - [`ErrorKind::Truncated`]
///
/// ### Local
/// - [`ErrorKind::Cache`]
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// No session could be opened, so nothing was attempted.
    #[display("server {_0} unreachable")]
    Unreachable(#[error(not(source))] String),
    /// A size query or retrieval failed.
    #[display("transfer of {_0} failed")]
    Transfer(#[error(not(source))] String),
    /// The stream ended before (or after) the size the server reported.
    #[display("received {received} bytes, expected {expected}")]
    Truncated { expected: u64, received: u64 },
    /// The local cache directory or file could not be read or written.
    #[display("local cache error at {}", _0.display())]
    Cache(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Cache(_))
    }
}
