//! Crawler module: fetching, parsing, and the crawl state machine

mod driver;
mod fetcher;
mod parser;

pub use driver::{CrawlOutcome, Driver};
pub use fetcher::{build_http_client, fetch_page, probe_url, FetchOutcome, FETCH_TIMEOUT};
pub use parser::{parse_page, ParsedPage};

use crate::store::ProjectStore;
use crate::Result;
use std::path::Path;
use tokio::sync::watch;

/// Runs a project's crawl until `Completed` or the shutdown signal fires.
///
/// The project must already exist; its persisted configuration and frontier
/// define where the run picks up.
///
/// # Arguments
///
/// * `projects_dir` - The projects root directory
/// * `base_url` - The project's base URL
/// * `shutdown` - Watch channel set to `true` to interrupt the run
pub async fn start_crawl(
    projects_dir: &Path,
    base_url: &str,
    shutdown: watch::Receiver<bool>,
) -> Result<CrawlOutcome> {
    let store = ProjectStore::open(projects_dir, base_url)?;
    let config = store.load_config()?;

    let mut driver = Driver::new(store, config, shutdown)?;
    driver.run().await
}
