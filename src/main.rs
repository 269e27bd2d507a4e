//! Linkscout command-line entry point

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use linkscout::config::{validate, CrawlSpeed, ProjectConfig, SizeProfile};
use linkscout::output::{export_issues, CrawlStats, IssueFilter};
use linkscout::store::ReferenceCategory;
use linkscout::{get_frontier, get_references, reset_project, start_crawl, ProjectStore};
use std::path::PathBuf;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

/// Linkscout: a resumable broken-link crawler
///
/// Linkscout walks every page reachable from a website origin, records the
/// outcome of each fetch, and reports broken links, misdirected redirects,
/// and missing in-page anchors together with the pages that reference them.
#[derive(Parser, Debug)]
#[command(name = "linkscout")]
#[command(version)]
#[command(about = "A resumable broken-link crawler", long_about = None)]
struct Cli {
    /// Directory holding all crawl projects
    #[arg(long, global = true, default_value = "./projects")]
    projects_dir: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start or resume crawling a website
    Crawl {
        /// The website origin, e.g. https://example.com
        base_url: String,

        /// Folder-restriction rule; repeat for multiple rules
        /// (e.g. --scope /blog --scope '!/blog/drafts')
        #[arg(long = "scope", value_name = "RULE")]
        scope_rules: Vec<String>,

        /// Limit of pages to crawl (0 means unlimited)
        #[arg(long, default_value_t = 0)]
        page_limit: usize,

        /// Crawling speed policy
        #[arg(long, value_enum, default_value_t = SpeedArg::Fast)]
        speed: SpeedArg,

        /// Predefined profile overriding --page-limit and --speed
        #[arg(long, value_enum)]
        profile: Option<ProfileArg>,
    },

    /// Erase a project's crawl data and restore its seed frontier
    Reset {
        /// The project's base URL
        base_url: String,
    },

    /// Show crawl statistics for a project
    Stats {
        /// The project's base URL
        base_url: String,
    },

    /// Print a folded reference log
    References {
        /// The project's base URL
        base_url: String,

        /// Which log to read
        #[arg(long, value_enum)]
        category: CategoryArg,
    },

    /// Export an issue report as CSV
    Export {
        /// The project's base URL
        base_url: String,

        /// Which issues to export
        #[arg(long, value_enum)]
        filter: FilterArg,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SpeedArg {
    Fast,
    Medium,
    Slow,
}

impl From<SpeedArg> for CrawlSpeed {
    fn from(arg: SpeedArg) -> Self {
        match arg {
            SpeedArg::Fast => CrawlSpeed::Fast,
            SpeedArg::Medium => CrawlSpeed::Medium,
            SpeedArg::Slow => CrawlSpeed::Slow,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ProfileArg {
    Small,
    Medium,
    Large,
}

impl From<ProfileArg> for SizeProfile {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Small => SizeProfile::Small,
            ProfileArg::Medium => SizeProfile::Medium,
            ProfileArg::Large => SizeProfile::Large,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CategoryArg {
    InternalLinks,
    InternalDocuments,
    ExternalLinks,
    ExternalDocuments,
    Redirects,
}

impl From<CategoryArg> for ReferenceCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::InternalLinks => ReferenceCategory::InternalLinks,
            CategoryArg::InternalDocuments => ReferenceCategory::InternalDocuments,
            CategoryArg::ExternalLinks => ReferenceCategory::ExternalLinks,
            CategoryArg::ExternalDocuments => ReferenceCategory::ExternalDocuments,
            CategoryArg::Redirects => ReferenceCategory::Redirects,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FilterArg {
    BrokenLinks,
    BrokenDocuments,
    MissingAnchors,
}

impl From<FilterArg> for IssueFilter {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::BrokenLinks => IssueFilter::BrokenLinks,
            FilterArg::BrokenDocuments => IssueFilter::BrokenDocuments,
            FilterArg::MissingAnchors => IssueFilter::MissingAnchors,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    match cli.command {
        Command::Crawl {
            base_url,
            scope_rules,
            page_limit,
            speed,
            profile,
        } => {
            handle_crawl(
                &cli.projects_dir,
                base_url,
                scope_rules,
                page_limit,
                speed,
                profile,
            )
            .await
        }
        Command::Reset { base_url } => handle_reset(&cli.projects_dir, &base_url),
        Command::Stats { base_url } => handle_stats(&cli.projects_dir, &base_url),
        Command::References { base_url, category } => {
            handle_references(&cli.projects_dir, &base_url, category.into())
        }
        Command::Export { base_url, filter } => {
            handle_export(&cli.projects_dir, &base_url, filter.into())
        }
    }
}

/// Sets up the tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("linkscout=info,warn"),
            1 => EnvFilter::new("linkscout=debug,info"),
            2 => EnvFilter::new("linkscout=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Starts or resumes a crawl, creating the project on first use.
async fn handle_crawl(
    projects_dir: &PathBuf,
    base_url: String,
    scope_rules: Vec<String>,
    page_limit: usize,
    speed: SpeedArg,
    profile: Option<ProfileArg>,
) -> anyhow::Result<()> {
    if !ProjectStore::exists(projects_dir, &base_url) {
        let config = match profile {
            Some(profile) => {
                ProjectConfig::with_profile(base_url.clone(), scope_rules, profile.into())
            }
            None => ProjectConfig::new(base_url.clone(), scope_rules, page_limit, speed.into()),
        };
        validate(&config).context("invalid project configuration")?;

        let store = ProjectStore::create(projects_dir, &config)
            .context("failed to create project")?;
        tracing::info!("Created project '{}' at {}", store.name(), store.dir().display());
    } else {
        tracing::info!("Resuming existing project for {}", base_url);
    }

    // Ctrl-C flips the shutdown signal; the driver snapshots and exits.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, finishing current fetch");
            let _ = shutdown_tx.send(true);
        }
    });

    let outcome = start_crawl(projects_dir, &base_url, shutdown_rx).await?;
    tracing::info!("Crawl finished: {:?}", outcome);

    handle_stats(projects_dir, &base_url)
}

/// Resets a project's frontier to its seed set and truncates its logs.
fn handle_reset(projects_dir: &PathBuf, base_url: &str) -> anyhow::Result<()> {
    reset_project(projects_dir, base_url).context("failed to reset project")?;
    println!("Project for {} was reset to its seed frontier", base_url);
    Ok(())
}

/// Prints crawl statistics derived from the persisted frontier.
fn handle_stats(projects_dir: &PathBuf, base_url: &str) -> anyhow::Result<()> {
    let targets = get_frontier(projects_dir, base_url).context("failed to load frontier")?;
    let stats = CrawlStats::from_targets(&targets);

    println!("Project: {}", base_url);
    println!("  Links found:      {}", stats.found);
    println!("  Links tested:     {}", stats.tested);
    println!("  Links to test:    {}", stats.pending);
    println!("  Links with error: {}", stats.erroring);
    Ok(())
}

/// Prints one folded reference log.
fn handle_references(
    projects_dir: &PathBuf,
    base_url: &str,
    category: ReferenceCategory,
) -> anyhow::Result<()> {
    let records =
        get_references(projects_dir, base_url, category).context("failed to read references")?;

    println!("{} record(s) in {}", records.len(), category);
    for record in records {
        println!("{}", record.url);
        for reference in record.references {
            println!("  <- {}", reference);
        }
    }
    Ok(())
}

/// Writes an issue report CSV into the project's exports directory.
fn handle_export(
    projects_dir: &PathBuf,
    base_url: &str,
    filter: IssueFilter,
) -> anyhow::Result<()> {
    let store =
        ProjectStore::open(projects_dir, base_url).context("failed to open project")?;
    let targets = store.load_frontier_targets().context("failed to load frontier")?;

    let path = export_issues(&store, &targets, filter).context("failed to write export")?;
    println!("Export written to {}", path.display());
    Ok(())
}
