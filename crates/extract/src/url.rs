use crate::consts::{ARTICLE_URL_PREFIX, SUPPLEMENTARY_URL_INFIX};

/// Compose the absolute URL of a supplementary file from the article's
/// public identifier and the media link.
///
/// This is a plain concatenation: no escaping, no normalisation.
///
/// ```
/// use oami_extract::build_url;
///
/// assert_eq!(
///     build_url("PMC1234567", "1.avi"),
///     "http://www.ncbi.nlm.nih.gov/pmc/articles/PMC1234567/bin/1.avi",
/// );
/// ```
pub fn build_url(pmcid: &str, href: &str) -> String {
    let mut url = String::with_capacity(
        ARTICLE_URL_PREFIX.len() + pmcid.len() + SUPPLEMENTARY_URL_INFIX.len() + href.len(),
    );
    url.push_str(ARTICLE_URL_PREFIX);
    url.push_str(pmcid);
    url.push_str(SUPPLEMENTARY_URL_INFIX);
    url.push_str(href);
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("PMC1234567", "1.avi", "http://www.ncbi.nlm.nih.gov/pmc/articles/PMC1234567/bin/1.avi")]
    #[case("PMC1", "sup/movie 2.mov", "http://www.ncbi.nlm.nih.gov/pmc/articles/PMC1/bin/sup/movie 2.mov")]
    #[case("", "", "http://www.ncbi.nlm.nih.gov/pmc/articles//bin/")]
    fn test_build_url(#[case] pmcid: &str, #[case] href: &str, #[case] expected: &str) {
        assert_eq!(build_url(pmcid, href), expected);
    }
}
