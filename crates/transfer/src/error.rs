//! Transfer Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.

use derive_more::{Display, Error};

/// A transfer error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for transfer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A session with the server could not be established.
    #[display("cannot connect to {_0}")]
    Connect(#[error(not(source))] String),
    /// Remote resource does not exist.
    #[display("remote file not found: {_0}")]
    NotFound(#[error(not(source))] String),
    /// Login was refused, or the resource is not readable.
    #[display("permission denied: {_0}")]
    PermissionDenied(#[error(not(source))] String),
    /// Remote path has no usable final segment to name a local file after.
    #[display("invalid remote path: {_0:?}")]
    InvalidPath(#[error(not(source))] String),
    /// Connection dropped or timed out mid-command.
    #[display("network error: {_0}")]
    Network(#[error(not(source))] String),
    /// The server answered with something the client did not expect.
    #[display("protocol error: {_0}")]
    Protocol(#[error(not(source))] String),
    /// The chunk sink refused data (usually a local write failure).
    #[display("chunk sink rejected data for {_0}")]
    Sink(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Connect(_) | Self::Network(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_display() {
        assert_eq!(
            ErrorKind::NotFound("pub/pmc/articles.A-B.tar.gz".to_string()).to_string(),
            "remote file not found: pub/pmc/articles.A-B.tar.gz"
        );
        assert_eq!(ErrorKind::InvalidPath("pub/".to_string()).to_string(), "invalid remote path: \"pub/\"");
    }

    #[test]
    fn error_kind_retryable() {
        assert!(ErrorKind::Connect("ftp.example.org".to_string()).is_retryable());
        assert!(ErrorKind::Network("reset".to_string()).is_retryable());
        assert!(!ErrorKind::NotFound("x".to_string()).is_retryable());
        assert!(!ErrorKind::Sink("x".to_string()).is_retryable());
    }
}
