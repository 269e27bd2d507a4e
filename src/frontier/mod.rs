//! The crawl frontier: durable, deduplicated list of discovered URLs
//!
//! The frontier doubles as work queue and progress ledger. Targets are kept
//! in insertion order; selection is FIFO over the unvisited ones. A URL
//! index backs the dedup invariant: at most one target per canonical URL.

mod target;

pub use target::CrawlTarget;

use std::collections::HashMap;

/// Hard upper bound on frontier size, applied regardless of configuration.
pub const SAFETY_CEILING: usize = 5000;

/// Number of newly visited targets between frontier snapshots.
///
/// A crash can lose at most `SNAPSHOT_INTERVAL - 1` applied visits; those
/// targets reload as unvisited and are simply re-fetched.
pub const SNAPSHOT_INTERVAL: usize = 50;

/// In-memory frontier with capped, deduplicated insertion
#[derive(Debug)]
pub struct Frontier {
    targets: Vec<CrawlTarget>,
    index: HashMap<String, usize>,
    page_limit: usize,
    // Positions before this cursor are all visited.
    cursor: usize,
}

impl Frontier {
    /// Creates an empty frontier with the given page limit (0 = unlimited).
    pub fn new(page_limit: usize) -> Self {
        Self {
            targets: Vec::new(),
            index: HashMap::new(),
            page_limit,
            cursor: 0,
        }
    }

    /// Rebuilds a frontier from persisted targets, preserving their order.
    ///
    /// Duplicate URLs in the persisted data are dropped, keeping the first
    /// occurrence, so a damaged file cannot break the dedup invariant.
    pub fn from_targets(targets: Vec<CrawlTarget>, page_limit: usize) -> Self {
        let mut frontier = Self::new(page_limit);
        for target in targets {
            frontier.insert_unchecked(target);
        }
        frontier
    }

    /// The effective insertion cap: the page limit when configured, bounded
    /// by the safety ceiling either way.
    pub fn capacity(&self) -> usize {
        if self.page_limit == 0 {
            SAFETY_CEILING
        } else {
            self.page_limit.min(SAFETY_CEILING)
        }
    }

    /// True once no further targets may be appended.
    pub fn at_capacity(&self) -> bool {
        self.targets.len() >= self.capacity()
    }

    /// Existence check by canonical URL.
    pub fn contains(&self, url: &str) -> bool {
        self.index.contains_key(url)
    }

    /// Inserts a new target if its URL is absent and the caps allow it.
    ///
    /// Returns true if the target was appended.
    pub fn insert(&mut self, target: CrawlTarget) -> bool {
        if self.at_capacity() || self.contains(&target.url) {
            return false;
        }

        self.insert_unchecked(target);
        true
    }

    fn insert_unchecked(&mut self, target: CrawlTarget) {
        if self.index.contains_key(&target.url) {
            return;
        }

        self.index.insert(target.url.clone(), self.targets.len());
        self.targets.push(target);
    }

    /// Returns the first unvisited target in insertion order.
    pub fn next_unvisited(&mut self) -> Option<&CrawlTarget> {
        while self.cursor < self.targets.len() && self.targets[self.cursor].visited {
            self.cursor += 1;
        }

        self.targets.get(self.cursor)
    }

    /// Marks a target visited with its final status.
    ///
    /// Returns false if the URL is not present in the frontier.
    pub fn mark_visited(
        &mut self,
        url: &str,
        status_code: u16,
        missing_anchor: Option<bool>,
    ) -> bool {
        let Some(&position) = self.index.get(url) else {
            return false;
        };

        let target = &mut self.targets[position];
        target.visited = true;
        target.status_code = Some(status_code);
        if missing_anchor.is_some() {
            target.missing_anchor = missing_anchor;
        }
        true
    }

    /// All targets in insertion order.
    pub fn targets(&self) -> &[CrawlTarget] {
        &self.targets
    }

    /// Consumes the frontier, yielding its targets.
    pub fn into_targets(self) -> Vec<CrawlTarget> {
        self.targets
    }

    /// Total number of discovered targets.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// True when nothing has been discovered yet.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Number of targets whose fetch has completed.
    pub fn visited_count(&self) -> usize {
        self.targets.iter().filter(|t| t.visited).count()
    }

    /// Number of targets still waiting to be fetched.
    pub fn pending_count(&self) -> usize {
        self.targets.iter().filter(|t| !t.visited).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(url: &str) -> CrawlTarget {
        CrawlTarget::seed(url)
    }

    #[test]
    fn test_insert_and_contains() {
        let mut frontier = Frontier::new(0);
        assert!(frontier.insert(seed("https://example.com/")));
        assert!(frontier.contains("https://example.com/"));
        assert!(!frontier.contains("https://example.com/other"));
    }

    #[test]
    fn test_duplicate_insert_is_idempotent() {
        let mut frontier = Frontier::new(0);
        assert!(frontier.insert(seed("https://example.com/")));
        assert!(!frontier.insert(seed("https://example.com/")));
        assert_eq!(frontier.len(), 1);
    }

    #[test]
    fn test_page_limit_caps_insertion() {
        let mut frontier = Frontier::new(2);
        assert!(frontier.insert(seed("https://example.com/a")));
        assert!(frontier.insert(seed("https://example.com/b")));
        assert!(frontier.at_capacity());
        assert!(!frontier.insert(seed("https://example.com/c")));
        assert_eq!(frontier.len(), 2);
    }

    #[test]
    fn test_zero_limit_uses_safety_ceiling() {
        let frontier = Frontier::new(0);
        assert_eq!(frontier.capacity(), SAFETY_CEILING);
    }

    #[test]
    fn test_limit_bounded_by_safety_ceiling() {
        let frontier = Frontier::new(1_000_000);
        assert_eq!(frontier.capacity(), SAFETY_CEILING);
    }

    #[test]
    fn test_next_unvisited_is_fifo() {
        let mut frontier = Frontier::new(0);
        frontier.insert(seed("https://example.com/a"));
        frontier.insert(seed("https://example.com/b"));

        assert_eq!(
            frontier.next_unvisited().map(|t| t.url.clone()),
            Some("https://example.com/a".to_string())
        );

        frontier.mark_visited("https://example.com/a", 200, None);
        assert_eq!(
            frontier.next_unvisited().map(|t| t.url.clone()),
            Some("https://example.com/b".to_string())
        );

        frontier.mark_visited("https://example.com/b", 404, None);
        assert!(frontier.next_unvisited().is_none());
    }

    #[test]
    fn test_mark_visited_updates_target() {
        let mut frontier = Frontier::new(0);
        frontier.insert(seed("https://example.com/a"));

        assert!(frontier.mark_visited("https://example.com/a", 404, None));
        let target = &frontier.targets()[0];
        assert!(target.visited);
        assert_eq!(target.status_code, Some(404));
    }

    #[test]
    fn test_mark_visited_records_missing_anchor() {
        let mut frontier = Frontier::new(0);
        frontier.insert(seed("https://example.com/a#team"));

        frontier.mark_visited("https://example.com/a#team", 200, Some(true));
        assert_eq!(frontier.targets()[0].missing_anchor, Some(true));
    }

    #[test]
    fn test_mark_visited_unknown_url() {
        let mut frontier = Frontier::new(0);
        assert!(!frontier.mark_visited("https://example.com/missing", 200, None));
    }

    #[test]
    fn test_from_targets_preserves_order_and_dedups() {
        let targets = vec![
            seed("https://example.com/a"),
            seed("https://example.com/b"),
            seed("https://example.com/a"),
        ];
        let frontier = Frontier::from_targets(targets, 0);

        assert_eq!(frontier.len(), 2);
        assert_eq!(frontier.targets()[0].url, "https://example.com/a");
        assert_eq!(frontier.targets()[1].url, "https://example.com/b");
    }

    #[test]
    fn test_resumed_frontier_selects_unvisited() {
        let mut visited = seed("https://example.com/a");
        visited.visited = true;
        visited.status_code = Some(200);

        let targets = vec![visited, seed("https://example.com/b")];
        let mut frontier = Frontier::from_targets(targets, 0);

        assert_eq!(
            frontier.next_unvisited().map(|t| t.url.clone()),
            Some("https://example.com/b".to_string())
        );
        assert_eq!(frontier.visited_count(), 1);
        assert_eq!(frontier.pending_count(), 1);
    }
}
