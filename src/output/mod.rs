//! Derived reporting: crawl statistics and CSV issue exports

mod export;
mod stats;

pub use export::{
    collect_issues, export_issues, referrer_map, write_csv, IssueFilter, IssueRow, CSV_HEADER,
};
pub use stats::CrawlStats;
