mod consts;
mod document;
pub mod error;
pub mod models;
mod resolve;
mod url;

use tracing::instrument;

pub use crate::consts::{ARTICLE_EXTENSION, is_article_name};
pub use crate::document::{ArticleDocument, Element};
pub use crate::models::{MediaFilter, Skip, SupplementaryLink};
pub use crate::resolve::Resolver;
pub use crate::url::build_url;

/// Easy, top-level entrypoint: every downloadable supplementary-material
/// link in `document`, in cross-reference order, accepting any media with a
/// mimetype.
///
/// Cross-references that cannot be resolved are dropped; see
/// [`Resolver::outcomes`] for the reasons.
#[instrument(skip(document), fields(source = document.source()))]
pub fn resolve(document: &ArticleDocument) -> Vec<SupplementaryLink> {
    Resolver::default().resolve(document).collect()
}
