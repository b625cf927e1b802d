//! Extraction Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.

use derive_more::{Display, Error};

/// An extraction error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The XML is too broken to build a tree from.
    #[display("malformed XML: {_0}")]
    MalformedXml(#[error(not(source))] String),
    /// The member could not be read at all.
    #[display("I/O error while reading document")]
    Io,
    /// The document parsed, but contains no elements.
    #[display("empty document")]
    EmptyDocument,
    #[display("could not parse {field}: {value}")]
    ParseError { field: &'static str, value: String },
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Input is either well-formed or it's not.
        false
    }
}
