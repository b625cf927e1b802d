use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::url::build_url;

/// One resolved supplementary-material reference: the article's public
/// identifier and the media link relative to the article's file area.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SupplementaryLink {
    /// Always carries the `PMC` prefix.
    pub pmcid: String,
    pub href: String,
}
impl SupplementaryLink {
    pub fn new(pmcid: impl Into<String>, href: impl Into<String>) -> Self {
        Self { pmcid: pmcid.into(), href: href.into() }
    }

    /// The absolute URL of the supplementary file.
    pub fn url(&self) -> String {
        build_url(&self.pmcid, &self.href)
    }
}

/// Displays as the absolute URL.
impl Display for SupplementaryLink {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_url() {
        let link = SupplementaryLink::new("PMC1234567", "1.avi");
        assert_eq!(link.to_string(), "http://www.ncbi.nlm.nih.gov/pmc/articles/PMC1234567/bin/1.avi");
        assert_eq!(link.to_string(), link.url());
    }
}
