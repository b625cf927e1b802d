use std::path::Path;

/// File extension of article metadata members inside a bulk archive.
pub const ARTICLE_EXTENSION: &str = "nxml";

pub(crate) const XLINK_NAMESPACE: &str = "http://www.w3.org/1999/xlink";

pub(crate) const XREF_TAG: &str = "xref";
pub(crate) const SUPPLEMENTARY_MATERIAL_TAG: &str = "supplementary-material";
pub(crate) const MEDIA_TAG: &str = "media";
pub(crate) const ARTICLE_ID_TAG: &str = "article-id";

pub(crate) const REF_TYPE_ATTR: &str = "ref-type";
pub(crate) const RID_ATTR: &str = "rid";
pub(crate) const ID_ATTR: &str = "id";
pub(crate) const MIMETYPE_ATTR: &str = "mimetype";
pub(crate) const HREF_ATTR: &str = "href";
pub(crate) const PUB_ID_TYPE_ATTR: &str = "pub-id-type";

pub(crate) const SUPPLEMENTARY_REF_TYPE: &str = "supplementary-material";
pub(crate) const PMC_ID_TYPE: &str = "pmc";
pub(crate) const PMCID_PREFIX: &str = "PMC";

pub(crate) const ARTICLE_URL_PREFIX: &str = "http://www.ncbi.nlm.nih.gov/pmc/articles/";
pub(crate) const SUPPLEMENTARY_URL_INFIX: &str = "/bin/";

/// Returns `true` if an archive member name looks like article metadata.
///
/// ```
/// use oami_extract::is_article_name;
///
/// assert!(is_article_name("Nature/PMC1234567/nature05678.nxml"));
/// assert!(!is_article_name("Nature/PMC1234567/nature05678.pdf"));
/// assert!(!is_article_name("Nature/PMC1234567/"));
/// ```
pub fn is_article_name(name: impl AsRef<Path>) -> bool {
    name.as_ref().extension().is_some_and(|ext| ext == ARTICLE_EXTENSION)
}
