use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One crawl session record, kept in `data/crawl_timer.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerEntry {
    /// When the session started
    pub started_at: DateTime<Utc>,

    /// When the session ended (completion or interruption)
    pub finished_at: DateTime<Utc>,

    /// Number of targets visited during this session
    pub pages_visited: usize,

    /// Whether the crawl reached the Completed state
    pub completed: bool,
}
