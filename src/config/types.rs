use serde::{Deserialize, Serialize};

/// Per-project crawl configuration, persisted as `config.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    /// The website origin the crawl starts from
    pub base_url: String,

    /// Ordered folder-restriction rules bounding the crawl
    #[serde(default)]
    pub scope_rules: Vec<String>,

    /// Maximum number of targets to discover; 0 means unlimited, still
    /// bounded by the frontier's safety ceiling
    #[serde(default)]
    pub page_limit: usize,

    /// Throttling policy applied between fetches
    #[serde(default)]
    pub crawling_speed: CrawlSpeed,
}

impl ProjectConfig {
    /// Creates a configuration with explicit limit and speed settings.
    pub fn new(
        base_url: impl Into<String>,
        scope_rules: Vec<String>,
        page_limit: usize,
        crawling_speed: CrawlSpeed,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            scope_rules,
            page_limit,
            crawling_speed,
        }
    }

    /// Creates a configuration from a predefined size profile.
    pub fn with_profile(
        base_url: impl Into<String>,
        scope_rules: Vec<String>,
        profile: SizeProfile,
    ) -> Self {
        let (page_limit, crawling_speed) = profile.settings();
        Self::new(base_url, scope_rules, page_limit, crawling_speed)
    }

    /// The origin with any trailing slash trimmed, ready for href resolution.
    pub fn origin(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// The origin root URL, i.e. the origin with a `/` path.
    pub fn origin_root(&self) -> String {
        format!("{}/", self.origin())
    }
}

/// Throttling policy applied between consecutive fetches
///
/// The pause is a fixed-interval throttle, not an adaptive or per-host rate
/// limiter: after every N completed fetches the driver sleeps for a constant
/// delay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrawlSpeed {
    /// No delay during the crawl (suitable for under 100 pages)
    #[default]
    Fast,

    /// 2s pause after every 50 crawled pages (100 to 500 pages)
    Medium,

    /// 2s pause after every 10 crawled pages (more than 500 pages)
    Slow,
}

impl CrawlSpeed {
    /// Number of completed fetches between pauses, if this policy pauses.
    pub fn pause_interval(&self) -> Option<usize> {
        match self {
            Self::Fast => None,
            Self::Medium => Some(50),
            Self::Slow => Some(10),
        }
    }
}

impl std::fmt::Display for CrawlSpeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Fast => "fast",
            Self::Medium => "medium",
            Self::Slow => "slow",
        };
        write!(f, "{}", name)
    }
}

/// Predefined configuration profiles for common website sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeProfile {
    /// Websites with fewer than 100 pages
    Small,

    /// Websites with 100 to 500 pages
    Medium,

    /// Websites with more than 500 pages
    Large,
}

impl SizeProfile {
    /// The (page limit, crawl speed) pair this profile stands for.
    pub fn settings(&self) -> (usize, CrawlSpeed) {
        match self {
            Self::Small => (100, CrawlSpeed::Fast),
            Self::Medium => (500, CrawlSpeed::Medium),
            Self::Large => (0, CrawlSpeed::Slow),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_trims_trailing_slash() {
        let config = ProjectConfig::new("https://example.com/", vec![], 0, CrawlSpeed::Fast);
        assert_eq!(config.origin(), "https://example.com");
        assert_eq!(config.origin_root(), "https://example.com/");
    }

    #[test]
    fn test_origin_without_trailing_slash() {
        let config = ProjectConfig::new("https://example.com", vec![], 0, CrawlSpeed::Fast);
        assert_eq!(config.origin(), "https://example.com");
    }

    #[test]
    fn test_profile_settings() {
        assert_eq!(SizeProfile::Small.settings(), (100, CrawlSpeed::Fast));
        assert_eq!(SizeProfile::Medium.settings(), (500, CrawlSpeed::Medium));
        assert_eq!(SizeProfile::Large.settings(), (0, CrawlSpeed::Slow));
    }

    #[test]
    fn test_pause_intervals() {
        assert_eq!(CrawlSpeed::Fast.pause_interval(), None);
        assert_eq!(CrawlSpeed::Medium.pause_interval(), Some(50));
        assert_eq!(CrawlSpeed::Slow.pause_interval(), Some(10));
    }

    #[test]
    fn test_config_json_field_names() {
        let config = ProjectConfig::new(
            "https://example.com",
            vec!["/blog".to_string()],
            100,
            CrawlSpeed::Medium,
        );
        let json = serde_json::to_value(&config).unwrap();

        assert_eq!(json["baseUrl"], "https://example.com");
        assert_eq!(json["scopeRules"][0], "/blog");
        assert_eq!(json["pageLimit"], 100);
        assert_eq!(json["crawlingSpeed"], "medium");
    }

    #[test]
    fn test_config_defaults_on_load() {
        let config: ProjectConfig =
            serde_json::from_str(r#"{"baseUrl":"https://example.com"}"#).unwrap();
        assert!(config.scope_rules.is_empty());
        assert_eq!(config.page_limit, 0);
        assert_eq!(config.crawling_speed, CrawlSpeed::Fast);
    }
}
