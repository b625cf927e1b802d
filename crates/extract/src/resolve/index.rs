use crate::consts::{
    ARTICLE_ID_TAG, ID_ATTR, PMC_ID_TYPE, PMCID_PREFIX, PUB_ID_TYPE_ATTR, SUPPLEMENTARY_MATERIAL_TAG,
};
use crate::document::{ArticleDocument, Element};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tracing::debug;

/// Lookup tables built once per document.
#[derive(Debug)]
pub(crate) struct Index<'a> {
    targets: HashMap<&'a str, Element<'a>>,
    pmcid: Option<String>,
}

impl<'a> Index<'a> {
    pub(crate) fn new(document: &'a ArticleDocument) -> Self {
        Self {
            targets: Self::collect_targets(document),
            pmcid: Self::collect_pmcid(document),
        }
    }

    /// The supplementary-material element whose id is `rid`.
    pub(crate) fn target(&self, rid: &str) -> Option<Element<'a>> {
        self.targets.get(rid).copied()
    }

    pub(crate) fn pmcid(&self) -> Option<&str> {
        self.pmcid.as_deref()
    }

    /// First element wins on duplicate ids.
    fn collect_targets(document: &'a ArticleDocument) -> HashMap<&'a str, Element<'a>> {
        let mut targets = HashMap::new();
        for element in document.descendants(SUPPLEMENTARY_MATERIAL_TAG) {
            let Some(id) = element.attr(ID_ATTR) else {
                continue;
            };
            if let Entry::Vacant(entry) = targets.entry(id) {
                entry.insert(element);
            }
        }
        targets
    }

    /// Last pmc-typed identifier wins, even when it is empty; an empty
    /// last identifier means the document has none.
    fn collect_pmcid(document: &'a ArticleDocument) -> Option<String> {
        let candidates: Vec<&str> = document
            .descendants(ARTICLE_ID_TAG)
            .filter(|element| element.attr(PUB_ID_TYPE_ATTR) == Some(PMC_ID_TYPE))
            .map(|element| element.text().trim())
            .collect();
        let last = *candidates.last()?;
        if candidates.len() > 1 {
            debug!(?candidates, chosen = last, "multiple pmc identifiers, using the last");
        }
        (!last.is_empty()).then(|| normalize_pmcid(last))
    }
}

/// Article metadata carries the bare number; the public identifier is
/// `PMC<number>`.
pub(crate) fn normalize_pmcid(id: &str) -> String {
    let prefixed = id.get(..PMCID_PREFIX.len()).is_some_and(|head| head.eq_ignore_ascii_case(PMCID_PREFIX));
    if prefixed {
        format!("{PMCID_PREFIX}{}", &id[PMCID_PREFIX.len()..])
    } else {
        format!("{PMCID_PREFIX}{id}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1234567", "PMC1234567")]
    #[case("PMC1234567", "PMC1234567")]
    #[case("pmc1234567", "PMC1234567")]
    #[case("PM", "PMCPM")]
    fn test_normalize_pmcid(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_pmcid(input), expected);
    }

    #[test]
    fn test_last_pmcid_wins() {
        let document: ArticleDocument = r#"<article><front>
            <article-id pub-id-type="pmid">17000000</article-id>
            <article-id pub-id-type="pmc">111</article-id>
            <article-id pub-id-type="doi">10.1000/x</article-id>
            <article-id pub-id-type="pmc"> 222 </article-id>
        </front></article>"#
            .parse()
            .unwrap();
        assert_eq!(Index::new(&document).pmcid(), Some("PMC222"));
    }

    #[test]
    fn test_no_pmcid() {
        let document: ArticleDocument =
            r#"<article><article-id pub-id-type="pmid">1</article-id><article-id pub-id-type="pmc"/></article>"#
                .parse()
                .unwrap();
        assert_eq!(Index::new(&document).pmcid(), None);
    }

    #[test]
    fn test_empty_last_pmcid_hides_earlier_ones() {
        let document: ArticleDocument =
            r#"<article><article-id pub-id-type="pmc">1</article-id><article-id pub-id-type="pmc"/></article>"#
                .parse()
                .unwrap();
        assert_eq!(Index::new(&document).pmcid(), None);
    }

    #[test]
    fn test_first_target_wins() {
        let document: ArticleDocument = r#"<article>
            <supplementary-material id="S1"><media mimetype="video" n="first"/></supplementary-material>
            <supplementary-material id="S1"><media mimetype="video" n="second"/></supplementary-material>
            <supplementary-material><media mimetype="video"/></supplementary-material>
        </article>"#
            .parse()
            .unwrap();
        let index = Index::new(&document);
        let target = index.target("S1").unwrap();
        assert_eq!(target.child("media").unwrap().attr("n"), Some("first"));
        assert!(index.target("S2").is_none());
    }
}
