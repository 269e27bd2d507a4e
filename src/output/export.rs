//! CSV exports for reporting
//!
//! Issues are joined against the folded reference logs so every report row
//! names the page the problem was found on, not just the failing URL.

use crate::frontier::CrawlTarget;
use crate::store::{ProjectStore, ReferenceCategory, StoreResult};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Export CSV header
pub const CSV_HEADER: &str = "Page Location;URL with Issue;Status";

/// Which issues an export covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueFilter {
    /// Visited non-document targets with an error status
    BrokenLinks,

    /// Visited document targets with an error status
    BrokenDocuments,

    /// Visited targets whose anchor fragment had no matching element
    MissingAnchors,
}

impl IssueFilter {
    /// File stem used for the export under `exports/`.
    pub fn file_stem(&self) -> &'static str {
        match self {
            Self::BrokenLinks => "broken_links",
            Self::BrokenDocuments => "broken_documents",
            Self::MissingAnchors => "missing_anchors",
        }
    }

    fn matches(&self, target: &CrawlTarget) -> bool {
        match self {
            Self::BrokenLinks => target.is_error() && !target.document_link,
            Self::BrokenDocuments => target.is_error() && target.document_link,
            Self::MissingAnchors => target.visited && target.missing_anchor == Some(true),
        }
    }
}

/// One export row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRow {
    /// The page the problem was found on
    pub page_location: String,

    /// The failing URL
    pub url_with_issue: String,

    /// Recorded status code, empty when none was recorded
    pub status: String,
}

/// Collects issue rows for a filter, one row per (referencing page, URL).
///
/// Targets nothing referenced (typically seeds) fall back to a single row
/// locating the issue at the URL itself.
pub fn collect_issues(
    targets: &[CrawlTarget],
    referrers: &HashMap<String, Vec<String>>,
    filter: IssueFilter,
) -> Vec<IssueRow> {
    let mut rows = Vec::new();

    for target in targets.iter().filter(|t| filter.matches(t)) {
        let status = target
            .status_code
            .map(|s| s.to_string())
            .unwrap_or_default();

        match referrers.get(&target.url) {
            Some(pages) if !pages.is_empty() => {
                for page in pages {
                    rows.push(IssueRow {
                        page_location: page.clone(),
                        url_with_issue: target.url.clone(),
                        status: status.clone(),
                    });
                }
            }
            _ => rows.push(IssueRow {
                page_location: target.url.clone(),
                url_with_issue: target.url.clone(),
                status,
            }),
        }
    }

    rows
}

/// Builds the URL → referencing pages map from all four link categories.
pub fn referrer_map(store: &ProjectStore) -> StoreResult<HashMap<String, Vec<String>>> {
    let mut map: HashMap<String, Vec<String>> = HashMap::new();

    let link_categories = [
        ReferenceCategory::InternalLinks,
        ReferenceCategory::InternalDocuments,
        ReferenceCategory::ExternalLinks,
        ReferenceCategory::ExternalDocuments,
    ];

    for category in link_categories {
        for record in store.read_references(category)? {
            let pages = map.entry(record.url).or_default();
            for reference in record.references {
                if !pages.contains(&reference) {
                    pages.push(reference);
                }
            }
        }
    }

    Ok(map)
}

/// Writes rows as semicolon-separated CSV with the report header.
pub fn write_csv(path: &Path, rows: &[IssueRow]) -> std::io::Result<()> {
    let mut lines = vec![CSV_HEADER.to_string()];
    lines.extend(rows.iter().map(|row| {
        format!("{};{};{}", row.page_location, row.url_with_issue, row.status)
    }));

    fs::write(path, lines.join("\n"))
}

/// Collects and writes one filter's issues into the project's exports
/// directory, returning the written path.
pub fn export_issues(
    store: &ProjectStore,
    targets: &[CrawlTarget],
    filter: IssueFilter,
) -> StoreResult<PathBuf> {
    let referrers = referrer_map(store)?;
    let rows = collect_issues(targets, &referrers, filter);

    let path = store
        .exports_dir()
        .join(format!("{}.csv", filter.file_stem()));
    write_csv(&path, &rows)?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visited(url: &str, status: u16, document: bool) -> CrawlTarget {
        let mut t = CrawlTarget::seed(url);
        t.visited = true;
        t.status_code = Some(status);
        t.document_link = document;
        t
    }

    fn referrers(pairs: &[(&str, &[&str])]) -> HashMap<String, Vec<String>> {
        pairs
            .iter()
            .map(|(url, pages)| {
                (
                    url.to_string(),
                    pages.iter().map(|p| p.to_string()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn test_broken_links_excludes_documents_and_redirects() {
        let targets = vec![
            visited("https://a.com/ok", 200, false),
            visited("https://a.com/moved", 301, false),
            visited("https://a.com/broken", 404, false),
            visited("https://a.com/file.pdf", 404, true),
        ];

        let rows = collect_issues(&targets, &HashMap::new(), IssueFilter::BrokenLinks);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].url_with_issue, "https://a.com/broken");
        assert_eq!(rows[0].status, "404");
    }

    #[test]
    fn test_broken_documents_only_documents() {
        let targets = vec![
            visited("https://a.com/broken", 404, false),
            visited("https://a.com/file.pdf", 404, true),
        ];

        let rows = collect_issues(&targets, &HashMap::new(), IssueFilter::BrokenDocuments);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].url_with_issue, "https://a.com/file.pdf");
    }

    #[test]
    fn test_missing_anchors() {
        let mut with_anchor = visited("https://a.com/page#team", 200, false);
        with_anchor.missing_anchor = Some(true);
        let mut found_anchor = visited("https://a.com/page#ok", 200, false);
        found_anchor.missing_anchor = Some(false);

        let targets = vec![with_anchor, found_anchor];
        let rows = collect_issues(&targets, &HashMap::new(), IssueFilter::MissingAnchors);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].url_with_issue, "https://a.com/page#team");
    }

    #[test]
    fn test_one_row_per_referencing_page() {
        let targets = vec![visited("https://a.com/broken", 404, false)];
        let refs = referrers(&[(
            "https://a.com/broken",
            &["https://a.com/", "https://a.com/about"][..],
        )]);

        let rows = collect_issues(&targets, &refs, IssueFilter::BrokenLinks);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].page_location, "https://a.com/");
        assert_eq!(rows[1].page_location, "https://a.com/about");
    }

    #[test]
    fn test_unreferenced_target_falls_back_to_itself() {
        let targets = vec![visited("https://a.com/broken", 500, false)];
        let rows = collect_issues(&targets, &HashMap::new(), IssueFilter::BrokenLinks);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].page_location, "https://a.com/broken");
    }

    #[test]
    fn test_write_csv_format() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out.csv");

        let rows = vec![IssueRow {
            page_location: "https://a.com/".to_string(),
            url_with_issue: "https://a.com/broken".to_string(),
            status: "404".to_string(),
        }];
        write_csv(&path, &rows).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("Page Location;URL with Issue;Status"));
        assert_eq!(
            lines.next(),
            Some("https://a.com/;https://a.com/broken;404")
        );
    }
}
