//! Linkscout: a resumable broken-link crawler
//!
//! This crate crawls every page reachable from a website origin, records the
//! fetch outcome for each discovered URL in a durable frontier, and keeps
//! reference logs so that broken links, misdirected redirects, and missing
//! in-page anchors can be reported together with the pages that caused them.

pub mod config;
pub mod crawler;
pub mod frontier;
pub mod output;
pub mod store;
pub mod url;

use thiserror::Error;

/// Main error type for linkscout operations
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Store(#[from] store::StoreError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Invalid scope rule '{0}': rules must start with / or !/")]
    InvalidScopeRule(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for linkscout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{CrawlSpeed, ProjectConfig, SizeProfile};
pub use crawler::{start_crawl, CrawlOutcome, Driver};
pub use frontier::{CrawlTarget, Frontier};
pub use store::{
    get_frontier, get_references, reset_project, ProjectStore, ReferenceCategory, ReferenceRecord,
};
