use url::Url;

/// File extensions that mark a URL as a downloadable document rather than a
/// crawlable page.
const DOCUMENT_EXTENSIONS: &[&str] = &[
    // Document files
    "doc", "docx", "txt", "pdf", // Spreadsheet files
    "csv", "ods", "xls", "xlsx", // Audio and video files
    "aif", "mov", "mp3", "mp4", "mpg", "wav", "wma", "wmv",
];

/// Classification of a resolved link relative to the crawl origin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkClass {
    /// The path extension marks a non-HTML downloadable resource
    pub document: bool,

    /// The host differs from the origin's host
    pub external: bool,
}

/// Classifies a resolved absolute URL against the project origin.
pub fn classify_link(url: &str, origin: &str) -> LinkClass {
    LinkClass {
        document: is_document_link(url),
        external: is_external_link(url, origin),
    }
}

/// Returns true if the URL's path extension belongs to the document set.
///
/// The extension is taken from the final path segment, so queries and
/// fragments do not produce false positives.
pub fn is_document_link(url: &str) -> bool {
    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(_) => return false,
    };

    let last_segment = match parsed.path_segments().and_then(|s| s.last()) {
        Some(segment) => segment,
        None => return false,
    };

    match last_segment.rsplit_once('.') {
        Some((_, ext)) => DOCUMENT_EXTENSIONS
            .iter()
            .any(|known| ext.eq_ignore_ascii_case(known)),
        None => false,
    }
}

/// Returns true if the URL's host differs from the origin's host.
///
/// Unparseable URLs are treated as internal; they will surface as fetch
/// failures instead of being misfiled as external references.
pub fn is_external_link(url: &str, origin: &str) -> bool {
    let url_host = Url::parse(url).ok().and_then(|u| u.host_str().map(String::from));
    let origin_host = Url::parse(origin)
        .ok()
        .and_then(|u| u.host_str().map(String::from));

    match (url_host, origin_host) {
        (Some(a), Some(b)) => a != b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: &str = "https://example.com";

    #[test]
    fn test_pdf_is_document() {
        assert!(is_document_link("https://example.com/report.pdf"));
    }

    #[test]
    fn test_extension_case_insensitive() {
        assert!(is_document_link("https://example.com/report.PDF"));
    }

    #[test]
    fn test_html_page_is_not_document() {
        assert!(!is_document_link("https://example.com/about"));
        assert!(!is_document_link("https://example.com/page.html"));
    }

    #[test]
    fn test_query_does_not_trigger_document() {
        assert!(!is_document_link("https://example.com/search?q=file.pdf"));
    }

    #[test]
    fn test_document_with_query() {
        assert!(is_document_link("https://example.com/report.pdf?v=2"));
    }

    #[test]
    fn test_all_document_extensions() {
        for ext in DOCUMENT_EXTENSIONS {
            let url = format!("https://example.com/file.{}", ext);
            assert!(is_document_link(&url), "Failed for extension {}", ext);
        }
    }

    #[test]
    fn test_foreign_host_is_external() {
        assert!(is_external_link("https://other.com/page", ORIGIN));
    }

    #[test]
    fn test_same_host_is_internal() {
        assert!(!is_external_link("https://example.com/page", ORIGIN));
        // Scheme differences do not make a link external.
        assert!(!is_external_link("http://example.com/page", ORIGIN));
    }

    #[test]
    fn test_subdomain_is_external() {
        assert!(is_external_link("https://blog.example.com/page", ORIGIN));
    }

    #[test]
    fn test_classify_combines_flags() {
        let class = classify_link("https://other.com/file.xlsx", ORIGIN);
        assert!(class.document);
        assert!(class.external);

        let class = classify_link("https://example.com/about", ORIGIN);
        assert!(!class.document);
        assert!(!class.external);
    }
}
