use crate::frontier::{CrawlTarget, Frontier};
use std::fmt;

/// Aggregate crawl statistics, derived on demand from the frontier and
/// never stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlStats {
    /// Total discovered targets
    pub found: usize,

    /// Targets whose fetch has completed
    pub tested: usize,

    /// Targets still waiting to be fetched
    pub pending: usize,

    /// Visited targets with a non-success, non-redirect status
    pub erroring: usize,
}

impl CrawlStats {
    /// Derives statistics from a list of targets.
    pub fn from_targets(targets: &[CrawlTarget]) -> Self {
        Self {
            found: targets.len(),
            tested: targets.iter().filter(|t| t.visited).count(),
            pending: targets.iter().filter(|t| !t.visited).count(),
            erroring: targets.iter().filter(|t| t.is_error()).count(),
        }
    }

    /// Derives statistics from a live frontier.
    pub fn from_frontier(frontier: &Frontier) -> Self {
        Self::from_targets(frontier.targets())
    }
}

impl fmt::Display for CrawlStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} found, {} tested, {} pending, {} with errors",
            self.found, self.tested, self.pending, self.erroring
        )
    }
}
