//! Append-only reference logs
//!
//! Every qualifying link discovered during processing is appended to a
//! category-specific log as a `(url, reference)` pair. The on-disk format
//! is line-delimited JSON: one object per line, appended atomically enough
//! for a single sequential writer, parseable no matter where a previous run
//! stopped.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The five reference log categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceCategory {
    /// Links to pages on the origin host
    InternalLinks,

    /// Document links on the origin host
    InternalDocuments,

    /// Links to foreign hosts
    ExternalLinks,

    /// Document links on foreign hosts
    ExternalDocuments,

    /// Requested URL → final URL pairs for detected redirects
    Redirects,
}

impl ReferenceCategory {
    /// All categories, in their canonical order.
    pub fn all() -> [ReferenceCategory; 5] {
        [
            Self::InternalLinks,
            Self::InternalDocuments,
            Self::ExternalLinks,
            Self::ExternalDocuments,
            Self::Redirects,
        ]
    }

    /// The log file name for this category.
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::InternalLinks => "internal_links.jsonl",
            Self::InternalDocuments => "internal_documents.jsonl",
            Self::ExternalLinks => "external_links.jsonl",
            Self::ExternalDocuments => "external_documents.jsonl",
            Self::Redirects => "redirects.jsonl",
        }
    }

    /// Picks the link category for a classified link.
    pub fn for_link(external: bool, document: bool) -> Self {
        match (external, document) {
            (false, false) => Self::InternalLinks,
            (false, true) => Self::InternalDocuments,
            (true, false) => Self::ExternalLinks,
            (true, true) => Self::ExternalDocuments,
        }
    }
}

impl fmt::Display for ReferenceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InternalLinks => "internal-links",
            Self::InternalDocuments => "internal-documents",
            Self::ExternalLinks => "external-links",
            Self::ExternalDocuments => "external-documents",
            Self::Redirects => "redirects",
        };
        write!(f, "{}", name)
    }
}

/// One appended log line: a target URL and the page that referenced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    pub url: String,
    pub reference: String,
}

/// The folded read view: one entry per target URL with every referencing
/// page, deduplicated and order-preserving
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceRecord {
    pub url: String,
    pub references: Vec<String>,
}

/// Folds raw log entries by URL.
///
/// The first occurrence of a URL creates its record; later occurrences
/// append their referrer only if it is not already present.
pub fn fold_references(entries: Vec<ReferenceEntry>) -> Vec<ReferenceRecord> {
    let mut records: Vec<ReferenceRecord> = Vec::new();

    for entry in entries {
        match records.iter_mut().find(|r| r.url == entry.url) {
            Some(record) => {
                if !record.references.contains(&entry.reference) {
                    record.references.push(entry.reference);
                }
            }
            None => records.push(ReferenceRecord {
                url: entry.url,
                references: vec![entry.reference],
            }),
        }
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(url: &str, reference: &str) -> ReferenceEntry {
        ReferenceEntry {
            url: url.to_string(),
            reference: reference.to_string(),
        }
    }

    #[test]
    fn test_fold_groups_by_url() {
        let records = fold_references(vec![
            entry("https://a.com/x", "https://site.com/1"),
            entry("https://a.com/y", "https://site.com/1"),
            entry("https://a.com/x", "https://site.com/2"),
        ]);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].url, "https://a.com/x");
        assert_eq!(
            records[0].references,
            vec!["https://site.com/1", "https://site.com/2"]
        );
        assert_eq!(records[1].url, "https://a.com/y");
    }

    #[test]
    fn test_fold_dedups_referrers() {
        let records = fold_references(vec![
            entry("https://a.com/x", "https://site.com/1"),
            entry("https://a.com/x", "https://site.com/1"),
        ]);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].references, vec!["https://site.com/1"]);
    }

    #[test]
    fn test_fold_preserves_first_seen_order() {
        let records = fold_references(vec![
            entry("https://a.com/b", "https://site.com/1"),
            entry("https://a.com/a", "https://site.com/1"),
        ]);

        assert_eq!(records[0].url, "https://a.com/b");
        assert_eq!(records[1].url, "https://a.com/a");
    }

    #[test]
    fn test_fold_empty() {
        assert!(fold_references(vec![]).is_empty());
    }

    #[test]
    fn test_category_for_link() {
        assert_eq!(
            ReferenceCategory::for_link(false, false),
            ReferenceCategory::InternalLinks
        );
        assert_eq!(
            ReferenceCategory::for_link(false, true),
            ReferenceCategory::InternalDocuments
        );
        assert_eq!(
            ReferenceCategory::for_link(true, false),
            ReferenceCategory::ExternalLinks
        );
        assert_eq!(
            ReferenceCategory::for_link(true, true),
            ReferenceCategory::ExternalDocuments
        );
    }

    #[test]
    fn test_entry_serialized_shape() {
        let json = serde_json::to_string(&entry("https://a.com/x", "https://b.com/p")).unwrap();
        assert_eq!(json, r#"{"url":"https://a.com/x","reference":"https://b.com/p"}"#);
    }
}
