//! Cross-reference resolution for one article document.

mod index;

use self::index::Index;
use crate::consts::{
    HREF_ATTR, MEDIA_TAG, MIMETYPE_ATTR, REF_TYPE_ATTR, RID_ATTR, SUPPLEMENTARY_REF_TYPE, XLINK_NAMESPACE, XREF_TAG,
};
use crate::document::{ArticleDocument, Element};
use crate::models::{MediaFilter, Skip, SupplementaryLink};
use tracing::{instrument, trace};

/// Resolves supplementary-material cross-references into links.
///
/// Resolution is read-only and deterministic: resolving the same document
/// twice yields the same links in the same order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Resolver {
    filter: MediaFilter,
}

impl Resolver {
    pub fn new(filter: MediaFilter) -> Self {
        Self { filter }
    }

    pub fn filter(&self) -> MediaFilter {
        self.filter
    }

    /// Every resolvable supplementary-material cross-reference in `document`,
    /// in document order. Unresolvable ones are dropped with a trace event.
    #[instrument(level = "trace", skip(self, document), fields(source = document.source()))]
    pub fn resolve<'a>(self, document: &'a ArticleDocument) -> impl Iterator<Item = SupplementaryLink> + 'a {
        let source = document.source();
        self.outcomes(document).filter_map(move |outcome| match outcome {
            Ok(link) => Some(link),
            Err(skip) => {
                trace!(source, reason = %skip, "dropping cross-reference");
                None
            },
        })
    }

    /// One outcome per supplementary-material cross-reference, in document
    /// order.
    pub fn outcomes<'a>(
        self,
        document: &'a ArticleDocument,
    ) -> impl Iterator<Item = Result<SupplementaryLink, Skip>> + 'a {
        let index = Index::new(document);
        let filter = self.filter;
        document
            .descendants(XREF_TAG)
            .filter(|xref| xref.attr(REF_TYPE_ATTR) == Some(SUPPLEMENTARY_REF_TYPE))
            .map(move |xref| Self::resolve_one(&index, filter, xref))
    }

    fn resolve_one(index: &Index<'_>, filter: MediaFilter, xref: Element<'_>) -> Result<SupplementaryLink, Skip> {
        let rid = xref.attr(RID_ATTR).ok_or(Skip::MissingRid)?;
        let target = index.target(rid).ok_or_else(|| Skip::DanglingRid(rid.to_string()))?;
        let media = target.child(MEDIA_TAG).ok_or_else(|| Skip::MissingMedia(rid.to_string()))?;
        let mimetype = media
            .attr(MIMETYPE_ATTR)
            .filter(|mimetype| !mimetype.is_empty())
            .ok_or_else(|| Skip::MissingMimetype(rid.to_string()))?;
        if !filter.accepts(mimetype) {
            return Err(Skip::FilteredMimetype(rid.to_string(), mimetype.to_string()));
        }
        // An empty link is still a link; it resolves to the article's bin directory.
        let href = media
            .attr_ns(XLINK_NAMESPACE, HREF_ATTR)
            .ok_or_else(|| Skip::MissingHref(rid.to_string()))?;
        let pmcid = index.pmcid().ok_or(Skip::MissingIdentifier)?;
        Ok(SupplementaryLink::new(pmcid, href))
    }
}
