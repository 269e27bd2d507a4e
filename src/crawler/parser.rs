//! HTML parsing: anchor extraction and anchor-target lookup

use scraper::{Html, Selector};
use std::collections::HashSet;

/// Extracted information from one fetched page
#[derive(Debug, Clone)]
pub struct ParsedPage {
    /// Raw `href` values of `<a>` elements, in document order, first
    /// occurrence per page
    pub hrefs: Vec<String>,

    /// `id` attributes present in the document, for anchor checks
    ids: HashSet<String>,
}

impl ParsedPage {
    /// True if the document contains an element with the given id.
    pub fn has_anchor(&self, id: &str) -> bool {
        self.ids.contains(id)
    }
}

/// Parses an HTML document.
///
/// Hrefs are kept raw; resolution against the page and origin is the
/// normalizer's job, not the parser's.
pub fn parse_page(html: &str) -> ParsedPage {
    let document = Html::parse_document(html);

    let mut hrefs = Vec::new();
    let mut seen = HashSet::new();
    if let Ok(selector) = Selector::parse("a[href]") {
        for element in document.select(&selector) {
            if let Some(href) = element.value().attr("href") {
                if seen.insert(href.to_string()) {
                    hrefs.push(href.to_string());
                }
            }
        }
    }

    let mut ids = HashSet::new();
    if let Ok(selector) = Selector::parse("[id]") {
        for element in document.select(&selector) {
            if let Some(id) = element.value().attr("id") {
                ids.insert(id.to_string());
            }
        }
    }

    ParsedPage { hrefs, ids }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_hrefs_in_document_order() {
        let html = r#"
            <html><body>
                <a href="/first">1</a>
                <a href="https://other.com/second">2</a>
                <a href="/third">3</a>
            </body></html>
        "#;
        let page = parse_page(html);
        assert_eq!(
            page.hrefs,
            vec!["/first", "https://other.com/second", "/third"]
        );
    }

    #[test]
    fn test_duplicate_hrefs_first_occurrence_wins() {
        let html = r#"
            <html><body>
                <a href="/page">top nav</a>
                <a href="/other">other</a>
                <a href="/page">footer</a>
            </body></html>
        "#;
        let page = parse_page(html);
        assert_eq!(page.hrefs, vec!["/page", "/other"]);
    }

    #[test]
    fn test_hrefs_kept_raw() {
        let html = r##"<html><body><a href="#section">jump</a><a href="mailto:x@y.z">mail</a></body></html>"##;
        let page = parse_page(html);
        assert_eq!(page.hrefs, vec!["#section", "mailto:x@y.z"]);
    }

    #[test]
    fn test_anchor_without_href_ignored() {
        let html = r#"<html><body><a name="old-style">x</a><a href="/real">y</a></body></html>"#;
        let page = parse_page(html);
        assert_eq!(page.hrefs, vec!["/real"]);
    }

    #[test]
    fn test_has_anchor_finds_ids() {
        let html = r#"
            <html><body>
                <h2 id="team">Team</h2>
                <div id="contact">Contact</div>
            </body></html>
        "#;
        let page = parse_page(html);
        assert!(page.has_anchor("team"));
        assert!(page.has_anchor("contact"));
        assert!(!page.has_anchor("missing"));
    }

    #[test]
    fn test_empty_document() {
        let page = parse_page("");
        assert!(page.hrefs.is_empty());
        assert!(!page.has_anchor("anything"));
    }
}
