//! File-based persistence: project directories, frontier snapshots,
//! reference logs, and crawl timers
//!
//! Each project owns one directory under the projects root:
//!
//! ```text
//! <projects>/<name>/config.json
//! <projects>/<name>/data/frontier.json
//! <projects>/<name>/data/internal_links.jsonl
//! <projects>/<name>/data/internal_documents.jsonl
//! <projects>/<name>/data/external_links.jsonl
//! <projects>/<name>/data/external_documents.jsonl
//! <projects>/<name>/data/redirects.jsonl
//! <projects>/<name>/data/crawl_timer.json
//! <projects>/<name>/exports/
//! ```

mod project;
mod references;
mod timer;

pub use project::ProjectStore;
pub use references::{fold_references, ReferenceCategory, ReferenceEntry, ReferenceRecord};
pub use timer::TimerEntry;

use crate::frontier::CrawlTarget;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    #[error("Project already exists: {0}")]
    ProjectExists(String),

    #[error("Cannot derive a project name from URL: {0}")]
    InvalidProjectUrl(String),
}

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Returns a project's persisted frontier, in insertion order.
pub fn get_frontier(projects_dir: &Path, base_url: &str) -> StoreResult<Vec<CrawlTarget>> {
    let store = ProjectStore::open(projects_dir, base_url)?;
    store.load_frontier_targets()
}

/// Returns a project's reference log for one category, folded by URL.
pub fn get_references(
    projects_dir: &Path,
    base_url: &str,
    category: ReferenceCategory,
) -> StoreResult<Vec<ReferenceRecord>> {
    let store = ProjectStore::open(projects_dir, base_url)?;
    store.read_references(category)
}

/// Reinitializes a project's frontier to the seed set derived from its
/// scope rules and truncates all reference logs and timer records.
pub fn reset_project(projects_dir: &Path, base_url: &str) -> StoreResult<()> {
    let store = ProjectStore::open(projects_dir, base_url)?;
    let config = store.load_config()?;
    store.reset(&config)
}
