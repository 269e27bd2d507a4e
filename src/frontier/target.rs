use crate::url::LinkClass;
use serde::{Deserialize, Serialize};

/// One discovered URL with its crawl progress
///
/// The serialized shape is fixed: full camelCase field names, one schema for
/// the lifetime of a project, so previously persisted frontiers always
/// reload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlTarget {
    /// Canonical URL, the frontier's dedup key
    pub url: String,

    /// Whether the fetch for this URL has completed (success or failure)
    pub visited: bool,

    /// Last HTTP/transport status, set when the fetch completes
    pub status_code: Option<u16>,

    /// The path extension marks a downloadable document
    #[serde(default)]
    pub document_link: bool,

    /// The host differs from the project origin
    #[serde(default)]
    pub external_link: bool,

    /// For fragment-carrying URLs: whether the anchor target was missing
    /// from the fetched document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing_anchor: Option<bool>,
}

impl CrawlTarget {
    /// Creates an unvisited target for a freshly discovered URL.
    pub fn discovered(url: impl Into<String>, class: LinkClass) -> Self {
        Self {
            url: url.into(),
            visited: false,
            status_code: None,
            document_link: class.document,
            external_link: class.external,
            missing_anchor: None,
        }
    }

    /// Creates an unvisited internal page target, used for seeds.
    pub fn seed(url: impl Into<String>) -> Self {
        Self::discovered(
            url,
            LinkClass {
                document: false,
                external: false,
            },
        )
    }

    /// True for visited targets whose status is neither success nor a
    /// redirect.
    pub fn is_error(&self) -> bool {
        if !self.visited {
            return false;
        }

        match self.status_code {
            Some(status) => !(200..300).contains(&status) && status != 301,
            None => false,
        }
    }
}
