use derive_more::Display;

/// Why a supplementary-material cross-reference produced no link.
///
/// None of these are errors: the cross-reference is dropped and the rest of
/// the document is still resolved.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum Skip {
    #[display("cross-reference has no rid")]
    MissingRid,
    #[display("no supplementary-material with id {_0:?}")]
    DanglingRid(String),
    #[display("supplementary-material {_0:?} has no media")]
    MissingMedia(String),
    #[display("media in {_0:?} has no mimetype")]
    MissingMimetype(String),
    #[display("media in {_0:?} has filtered mimetype {_1:?}")]
    FilteredMimetype(String, String),
    #[display("media in {_0:?} has no link")]
    MissingHref(String),
    #[display("document has no pmc identifier")]
    MissingIdentifier,
}
