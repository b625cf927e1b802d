//! Remote path utilities.
//!
//! Each remote resource is mirrored to exactly one local file, named after
//! the final segment of its remote path.

use std::path::{Component, Path, PathBuf};

use crate::error::{ErrorKind, Result};

/// Derive the local file name for a remote path.
///
/// Only the final segment is kept, so the result can never escape the
/// directory it gets joined onto.
///
/// > **Note:** remote paths always use forward slashes, regardless of the
/// >           local platform. Null bytes are explicitly rejected.
///
/// # Returns
/// Returns the final path segment, or
/// [`InvalidPath`](crate::error::ErrorKind::InvalidPath) if the remote path
/// names a directory (trailing slash), is empty, or ends in `.`/`..`.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use oami_transfer::local_name;
///
/// assert_eq!(local_name("pub/pmc/articles.A-B.tar.gz").unwrap(), Path::new("articles.A-B.tar.gz"));
/// assert_eq!(local_name("articles.O-Z.tar.gz").unwrap(), Path::new("articles.O-Z.tar.gz"));
/// assert!(local_name("pub/pmc/").is_err());
/// assert!(local_name("pub/..").is_err());
/// ```
pub fn local_name(remote: &str) -> Result<PathBuf> {
    let invalid = || ErrorKind::InvalidPath(remote.to_string());
    if remote.ends_with('/') || remote.contains('\0') {
        exn::bail!(invalid());
    }
    let Some(segment) = remote.rsplit('/').next() else {
        exn::bail!(invalid());
    };
    // Run the segment through the platform's own component parser so that
    // `.`, `..` and (on Windows) drive prefixes or backslashes are caught.
    let mut components = Path::new(segment).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(name)), None) => Ok(PathBuf::from(name)),
        _ => exn::bail!(invalid()),
    }
}
