//! The crawl driver: an explicit, resumable state machine
//!
//! One iteration moves a single target through
//! `Idle → Selecting → Fetching → Processing → Persisting` and back to
//! `Idle`; the loop terminates in `Completed` when no unvisited target
//! remains. Execution is strictly sequential: each fetch is awaited to
//! completion before the next target is selected, so the frontier is never
//! mutated concurrently.

use crate::config::ProjectConfig;
use crate::crawler::fetcher::{build_http_client, fetch_page, probe_url, FetchOutcome};
use crate::crawler::parser::{parse_page, ParsedPage};
use crate::frontier::{CrawlTarget, Frontier, SNAPSHOT_INTERVAL};
use crate::output::CrawlStats;
use crate::store::{ProjectStore, ReferenceCategory, ReferenceEntry, TimerEntry};
use crate::url::{
    anchor_fragment, classify_link, parse_scope_rules, path_in_scope, resolve_href,
    strip_fragment, url_pathname, LinkClass, ScopeRule,
};
use crate::Result;
use chrono::Utc;
use reqwest::Client;
use std::time::Duration;
use tokio::sync::watch;

/// Status recorded for a target whose fetch resolved to a different URL.
const REDIRECT_STATUS: u16 = 301;

/// Pause applied by the medium and slow crawl speed policies.
const SPEED_PAUSE: Duration = Duration::from_secs(2);

/// How a crawl run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlOutcome {
    /// No unvisited target remains
    Completed,

    /// The shutdown signal fired; the persisted frontier resumes the run
    Interrupted,
}

/// Driver states; `Fetching` and `Processing` carry the in-flight target.
enum Step {
    Idle,
    Selecting,
    Fetching(CrawlTarget),
    Processing(CrawlTarget, FetchOutcome),
    Persisting,
    Completed,
}

/// The crawl session: frontier, configuration, HTTP client, and progress
/// counters owned by one run
pub struct Driver {
    store: ProjectStore,
    config: ProjectConfig,
    scope: Vec<ScopeRule>,
    frontier: Frontier,
    client: Client,
    shutdown: watch::Receiver<bool>,
    visits_since_snapshot: usize,
    session_visits: usize,
}

impl Driver {
    /// Creates a driver over a project's persisted state.
    ///
    /// The frontier is loaded from disk and reconciled against the current
    /// scope rules, so seeds added by a configuration edit join the run.
    pub fn new(
        store: ProjectStore,
        config: ProjectConfig,
        shutdown: watch::Receiver<bool>,
    ) -> Result<Self> {
        let targets = store.load_frontier_targets()?;
        let mut frontier = Frontier::from_targets(targets, config.page_limit);
        ProjectStore::reconcile_seeds(&config, &mut frontier);

        let scope = parse_scope_rules(&config.scope_rules);
        let client = build_http_client()?;

        Ok(Self {
            store,
            config,
            scope,
            frontier,
            client,
            shutdown,
            visits_since_snapshot: 0,
            session_visits: 0,
        })
    }

    /// The driver's frontier, for inspection after a run.
    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    /// Runs the state machine until `Completed` or interruption.
    ///
    /// Either way the frontier is snapshotted and a timer record appended
    /// before returning, so the run can be resumed or inspected.
    pub async fn run(&mut self) -> Result<CrawlOutcome> {
        let started_at = Utc::now();
        tracing::info!(
            "Starting crawl for {}: {} targets known, {} pending",
            self.config.base_url,
            self.frontier.len(),
            self.frontier.pending_count()
        );

        let mut step = Step::Idle;
        let mut completed = false;

        loop {
            step = match step {
                Step::Idle => {
                    if *self.shutdown.borrow() {
                        break;
                    }
                    Step::Selecting
                }

                Step::Selecting => match self.frontier.next_unvisited() {
                    Some(target) => Step::Fetching(target.clone()),
                    None => Step::Completed,
                },

                Step::Fetching(target) => {
                    tracing::debug!("Fetching {}", target.url);
                    match self.fetch_with_cancel(&target).await {
                        Some(outcome) => Step::Processing(target, outcome),
                        None => break, // interrupted mid-fetch; target stays unvisited
                    }
                }

                Step::Processing(target, outcome) => {
                    self.process(&target, outcome)?;
                    Step::Persisting
                }

                Step::Persisting => {
                    self.persist_and_throttle().await;
                    Step::Idle
                }

                Step::Completed => {
                    completed = true;
                    break;
                }
            };
        }

        self.store.save_frontier(&self.frontier)?;
        self.store.append_timer(TimerEntry {
            started_at,
            finished_at: Utc::now(),
            pages_visited: self.session_visits,
            completed,
        })?;

        let stats = CrawlStats::from_frontier(&self.frontier);
        if completed {
            tracing::info!("Crawl completed: {}", stats);
            Ok(CrawlOutcome::Completed)
        } else {
            tracing::info!("Crawl interrupted: {}", stats);
            Ok(CrawlOutcome::Interrupted)
        }
    }

    /// Fetches a target, racing the shutdown signal.
    ///
    /// Returns `None` when the signal fired first; the in-flight request is
    /// dropped and the target is left unvisited for the next run.
    async fn fetch_with_cancel(&self, target: &CrawlTarget) -> Option<FetchOutcome> {
        let mut shutdown = self.shutdown.clone();

        let fetch = async {
            if target.external_link || target.document_link {
                probe_url(&self.client, &target.url).await
            } else {
                fetch_page(&self.client, &target.url).await
            }
        };
        tokio::pin!(fetch);

        loop {
            tokio::select! {
                outcome = &mut fetch => return Some(outcome),
                changed = shutdown.changed() => match changed {
                    Ok(()) if *shutdown.borrow() => return None,
                    Ok(()) => continue,
                    // Sender gone: cancellation can no longer fire.
                    Err(_) => break,
                },
            }
        }

        Some(fetch.await)
    }

    /// Applies one fetch outcome to the frontier and reference logs.
    fn process(&mut self, target: &CrawlTarget, outcome: FetchOutcome) -> Result<()> {
        match outcome {
            FetchOutcome::Success {
                final_url,
                status_code,
                body,
            } => {
                let redirected = strip_fragment(&target.url) != strip_fragment(&final_url);
                let status = if redirected { REDIRECT_STATUS } else { status_code };
                let mut missing_anchor = None;

                if !target.external_link && !target.document_link {
                    let page = parse_page(&body);

                    if let Some(fragment) = anchor_fragment(&target.url) {
                        missing_anchor = Some(!page.has_anchor(fragment));
                    }

                    self.process_links(target, &page)?;
                }

                if redirected {
                    tracing::debug!("Redirect: {} -> {}", target.url, final_url);
                    self.store.append_reference(
                        ReferenceCategory::Redirects,
                        &ReferenceEntry {
                            url: target.url.clone(),
                            reference: final_url.clone(),
                        },
                    )?;

                    // The redirect destination is itself a discovered URL.
                    let class = classify_link(&final_url, self.config.origin());
                    self.try_insert(final_url, class);
                }

                self.frontier.mark_visited(&target.url, status, missing_anchor);
            }

            FetchOutcome::Failed { status_code } => {
                tracing::debug!("Failed ({}): {}", status_code, target.url);
                self.frontier.mark_visited(&target.url, status_code, None);
            }
        }

        self.session_visits += 1;
        Ok(())
    }

    /// Resolves, classifies, logs, and conditionally queues each extracted
    /// href.
    fn process_links(&mut self, target: &CrawlTarget, page: &ParsedPage) -> Result<()> {
        for href in &page.hrefs {
            let Some(resolved) = resolve_href(href, &target.url, self.config.origin()) else {
                continue;
            };

            let class = classify_link(&resolved, self.config.origin());
            self.store.append_reference(
                ReferenceCategory::for_link(class.external, class.document),
                &ReferenceEntry {
                    url: resolved.clone(),
                    reference: target.url.clone(),
                },
            )?;

            self.try_insert(resolved, class);
        }

        Ok(())
    }

    /// Inserts a discovered URL when it is absent, under both caps, and
    /// either external, a document, or in scope.
    ///
    /// External and document links bypass the scope check: they are queued
    /// so their status can be tested, but they are never link-extracted.
    fn try_insert(&mut self, url: String, class: LinkClass) -> bool {
        if self.frontier.contains(&url) || self.frontier.at_capacity() {
            return false;
        }

        if !class.external && !class.document && !path_in_scope(&url_pathname(&url), &self.scope)
        {
            return false;
        }

        self.frontier.insert(CrawlTarget::discovered(url, class))
    }

    /// Snapshot cadence and crawl speed throttling.
    ///
    /// A failed snapshot is logged and retried at the next boundary; it
    /// never aborts the crawl. Unpersisted visits reload as unvisited and
    /// are re-fetched, so the on-disk frontier is always a valid subset of
    /// true progress.
    async fn persist_and_throttle(&mut self) {
        self.visits_since_snapshot += 1;
        if self.visits_since_snapshot >= SNAPSHOT_INTERVAL {
            match self.store.save_frontier(&self.frontier) {
                Ok(()) => self.visits_since_snapshot = 0,
                Err(e) => tracing::warn!("Frontier snapshot failed, will retry: {}", e),
            }
        }

        if let Some(interval) = self.config.crawling_speed.pause_interval() {
            if self.session_visits > 0 && self.session_visits % interval == 0 {
                tracing::debug!(
                    "Crawl speed pause after {} fetches",
                    self.session_visits
                );
                tokio::time::sleep(SPEED_PAUSE).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CrawlSpeed;
    use tempfile::TempDir;

    fn test_driver(rules: &[&str], page_limit: usize) -> (TempDir, Driver) {
        let dir = TempDir::new().unwrap();
        let config = ProjectConfig::new(
            "https://example.com",
            rules.iter().map(|r| r.to_string()).collect(),
            page_limit,
            CrawlSpeed::Fast,
        );
        let store = ProjectStore::create(dir.path(), &config).unwrap();
        let (_tx, rx) = watch::channel(false);
        let driver = Driver::new(store, config, rx).unwrap();
        (dir, driver)
    }

    fn class(external: bool, document: bool) -> LinkClass {
        LinkClass { external, document }
    }

    #[test]
    fn test_try_insert_respects_scope() {
        let (_dir, mut driver) = test_driver(&["/blog"], 0);

        assert!(driver.try_insert(
            "https://example.com/blog/post".to_string(),
            class(false, false)
        ));
        assert!(!driver.try_insert(
            "https://example.com/private".to_string(),
            class(false, false)
        ));
    }

    #[test]
    fn test_external_and_document_links_bypass_scope() {
        let (_dir, mut driver) = test_driver(&["/blog"], 0);

        assert!(driver.try_insert("https://other.com/page".to_string(), class(true, false)));
        assert!(driver.try_insert(
            "https://example.com/private/file.pdf".to_string(),
            class(false, true)
        ));
    }

    #[test]
    fn test_try_insert_dedups() {
        let (_dir, mut driver) = test_driver(&[], 0);

        assert!(driver.try_insert("https://example.com/a".to_string(), class(false, false)));
        assert!(!driver.try_insert("https://example.com/a".to_string(), class(false, false)));
    }

    #[test]
    fn test_try_insert_respects_page_limit() {
        // The seed already occupies one of the two slots.
        let (_dir, mut driver) = test_driver(&[], 2);

        assert!(driver.try_insert("https://example.com/a".to_string(), class(false, false)));
        assert!(!driver.try_insert("https://example.com/b".to_string(), class(false, false)));
    }

    #[test]
    fn test_driver_loads_seeded_frontier() {
        let (_dir, driver) = test_driver(&["/docs"], 0);

        assert!(driver.frontier().contains("https://example.com/"));
        assert!(driver.frontier().contains("https://example.com/docs"));
    }
}
