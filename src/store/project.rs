//! Project directory management and state persistence

use crate::config::ProjectConfig;
use crate::frontier::{CrawlTarget, Frontier};
use crate::store::references::{
    fold_references, ReferenceCategory, ReferenceEntry, ReferenceRecord,
};
use crate::store::timer::TimerEntry;
use crate::store::{StoreError, StoreResult};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use url::Url;

/// Handle to one project's directory on disk
#[derive(Debug, Clone)]
pub struct ProjectStore {
    project_dir: PathBuf,
    name: String,
}

impl ProjectStore {
    /// Derives the project name from a base URL.
    ///
    /// The name is the origin host with a `www.` prefix stripped and dots
    /// mapped to dashes; a non-default port is appended the same way.
    pub fn project_name(base_url: &str) -> StoreResult<String> {
        let parsed = Url::parse(base_url)
            .map_err(|_| StoreError::InvalidProjectUrl(base_url.to_string()))?;
        let host = parsed
            .host_str()
            .ok_or_else(|| StoreError::InvalidProjectUrl(base_url.to_string()))?;

        let host = host.strip_prefix("www.").unwrap_or(host);
        let mut name = host.replace('.', "-");
        if let Some(port) = parsed.port() {
            name.push('-');
            name.push_str(&port.to_string());
        }

        Ok(name)
    }

    /// True if a project for this base URL exists under the projects root.
    pub fn exists(projects_dir: &Path, base_url: &str) -> bool {
        match Self::project_name(base_url) {
            Ok(name) => projects_dir.join(&name).join("config.json").is_file(),
            Err(_) => false,
        }
    }

    /// Opens an existing project.
    pub fn open(projects_dir: &Path, base_url: &str) -> StoreResult<Self> {
        let name = Self::project_name(base_url)?;
        let project_dir = projects_dir.join(&name);

        if !project_dir.join("config.json").is_file() {
            return Err(StoreError::ProjectNotFound(name));
        }

        Ok(Self { project_dir, name })
    }

    /// Creates a new project: directory layout, persisted configuration,
    /// seeded frontier, and empty logs.
    pub fn create(projects_dir: &Path, config: &ProjectConfig) -> StoreResult<Self> {
        let name = Self::project_name(&config.base_url)?;
        let project_dir = projects_dir.join(&name);

        if project_dir.join("config.json").is_file() {
            return Err(StoreError::ProjectExists(name));
        }

        fs::create_dir_all(project_dir.join("data"))?;
        fs::create_dir_all(project_dir.join("exports"))?;

        let store = Self { project_dir, name };
        store.save_config(config)?;
        store.reset(config)?;

        Ok(store)
    }

    /// The project's name, as used for its directory.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The project's directory.
    pub fn dir(&self) -> &Path {
        &self.project_dir
    }

    /// The directory export files are written into.
    pub fn exports_dir(&self) -> PathBuf {
        self.project_dir.join("exports")
    }

    fn data_dir(&self) -> PathBuf {
        self.project_dir.join("data")
    }

    fn config_path(&self) -> PathBuf {
        self.project_dir.join("config.json")
    }

    fn frontier_path(&self) -> PathBuf {
        self.data_dir().join("frontier.json")
    }

    fn timer_path(&self) -> PathBuf {
        self.data_dir().join("crawl_timer.json")
    }

    fn reference_path(&self, category: ReferenceCategory) -> PathBuf {
        self.data_dir().join(category.file_name())
    }

    // ===== Configuration =====

    /// Loads the persisted project configuration.
    pub fn load_config(&self) -> StoreResult<ProjectConfig> {
        let content = fs::read_to_string(self.config_path())?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Persists the project configuration.
    pub fn save_config(&self, config: &ProjectConfig) -> StoreResult<()> {
        let content = serde_json::to_string_pretty(config)?;
        fs::write(self.config_path(), content)?;
        Ok(())
    }

    // ===== Frontier =====

    /// Loads the persisted frontier targets, in insertion order.
    pub fn load_frontier_targets(&self) -> StoreResult<Vec<CrawlTarget>> {
        let content = fs::read_to_string(self.frontier_path())?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Snapshots the frontier.
    ///
    /// The snapshot is written to a temp file and renamed into place, so
    /// the on-disk frontier is always a complete, parseable array even if
    /// the process dies mid-write.
    pub fn save_frontier(&self, frontier: &Frontier) -> StoreResult<()> {
        self.write_targets(frontier.targets())
    }

    fn write_targets(&self, targets: &[CrawlTarget]) -> StoreResult<()> {
        let content = serde_json::to_string(targets)?;
        let path = self.frontier_path();
        let tmp_path = path.with_extension("json.tmp");

        fs::write(&tmp_path, content)?;
        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    // ===== Seeds =====

    /// Derives the seed target set from a configuration.
    ///
    /// The origin root is always seeded; each non-negated scope rule
    /// contributes its folder (with any `*` marker stripped) so restricted
    /// crawls have an in-scope entry point even when the root links do not
    /// reach it.
    pub fn seed_targets(config: &ProjectConfig) -> Vec<CrawlTarget> {
        let origin = config.origin();
        let mut seeds = vec![CrawlTarget::seed(config.origin_root())];

        for rule in &config.scope_rules {
            let trimmed = rule.trim();
            if trimmed.starts_with('!') {
                continue;
            }

            let folder = trimmed.trim_end_matches('*').trim_end_matches('/');
            if folder.is_empty() || folder == "/" {
                continue;
            }

            let url = format!("{}{}", origin, folder);
            if !seeds.iter().any(|s| s.url == url) {
                seeds.push(CrawlTarget::seed(url));
            }
        }

        seeds
    }

    /// Appends any seed derived from the current scope rules that the
    /// persisted frontier does not contain yet.
    ///
    /// This is how configuration edits between runs are reconciled: new
    /// rules gain their entry points, existing progress is untouched.
    pub fn reconcile_seeds(config: &ProjectConfig, frontier: &mut Frontier) {
        for seed in Self::seed_targets(config) {
            if !frontier.contains(&seed.url) {
                frontier.insert(seed);
            }
        }
    }

    /// Replaces the frontier with the seed set and truncates every
    /// reference log and the crawl timer.
    pub fn reset(&self, config: &ProjectConfig) -> StoreResult<()> {
        self.write_targets(&Self::seed_targets(config))?;

        for category in ReferenceCategory::all() {
            fs::write(self.reference_path(category), "")?;
        }
        fs::write(self.timer_path(), "[]")?;

        Ok(())
    }

    // ===== Reference logs =====

    /// Appends one `(url, reference)` pair to a category log.
    pub fn append_reference(
        &self,
        category: ReferenceCategory,
        entry: &ReferenceEntry,
    ) -> StoreResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.reference_path(category))?;

        let line = serde_json::to_string(entry)?;
        writeln!(file, "{}", line)?;
        Ok(())
    }

    /// Reads a category log, folded into one record per target URL.
    pub fn read_references(&self, category: ReferenceCategory) -> StoreResult<Vec<ReferenceRecord>> {
        let path = self.reference_path(category);
        if !path.is_file() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(path)?;
        let mut entries = Vec::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            entries.push(serde_json::from_str::<ReferenceEntry>(line)?);
        }

        Ok(fold_references(entries))
    }

    // ===== Crawl timer =====

    /// Appends a session record to the crawl timer file.
    pub fn append_timer(&self, entry: TimerEntry) -> StoreResult<()> {
        let mut entries = self.read_timer()?;
        entries.push(entry);
        let content = serde_json::to_string_pretty(&entries)?;
        fs::write(self.timer_path(), content)?;
        Ok(())
    }

    /// Reads all recorded crawl sessions.
    pub fn read_timer(&self) -> StoreResult<Vec<TimerEntry>> {
        let path = self.timer_path();
        if !path.is_file() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        Ok(serde_json::from_str(&content)?)
    }
}
