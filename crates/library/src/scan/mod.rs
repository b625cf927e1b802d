//! Lazy iteration over the article documents inside a mirrored container.
//!
//! A container is a (usually compressed) tar stream. Members are visited in
//! stored order; only members named like article metadata are read and
//! parsed, each into its own [`ArticleDocument`]. A member that fails to
//! parse is logged and skipped. A corrupt container stream ends the
//! iteration with an error.

mod archive;
pub mod error;

pub use self::archive::{Archive, Documents};
use crate::error::Result as LibraryResult;
use oami_extract::ArticleDocument;
use std::ops::ControlFlow;
use std::path::Path;
use tracing::instrument;

/// Counts from one pass over a container.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanStats {
    /// Article documents parsed and handed out.
    pub documents: usize,
    /// Article members that failed to parse.
    pub skipped: usize,
}

/// Open the container at `path` and hand every article document in it to
/// `visit`, in member order, until `visit` breaks.
///
/// Each call re-opens the container from the start.
///
/// # Errors
///
/// Returns an error if the container cannot be opened, or if its stream
/// turns out to be corrupt part-way through. Documents visited before the
/// corruption was found have already been handed to `visit`.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn scan(
    path: impl AsRef<Path>,
    mut visit: impl FnMut(ArticleDocument) -> ControlFlow<()>,
) -> LibraryResult<ScanStats> {
    let mut archive = Archive::open(path)?;
    let mut documents = archive.documents()?;
    for document in documents.by_ref() {
        if visit(document?).is_break() {
            break;
        }
    }
    Ok(documents.stats())
}
