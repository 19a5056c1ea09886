//! Site-Mirror main entry point
//!
//! Command-line interface for mirroring a website into a local directory.

use anyhow::Context;
use clap::Parser;
use site_mirror::config::{load_config, validate, CrawlConfig};
use site_mirror::crawler::Coordinator;
use std::path::PathBuf;
use std::sync::atomic::Ordering;

/// Mirror a website for offline browsing
///
/// Downloads pages and assets starting from a seed URL, rewrites embedded
/// links to point at the local copies, and writes a report of what was
/// saved and what failed.
#[derive(Parser, Debug)]
#[command(name = "site-mirror")]
#[command(version = "1.0.0")]
#[command(about = "Mirror a website for offline browsing", long_about = None)]
struct Cli {
    /// URL of the website to mirror
    #[arg(
        value_name = "URL",
        required_unless_present = "config",
        conflicts_with = "config"
    )]
    url: Option<String>,

    /// Output directory for the mirrored site
    #[arg(short, long, default_value = "mirrored_site")]
    output: PathBuf,

    /// Maximum link depth to follow from the seed
    #[arg(short, long, default_value_t = 3)]
    depth: u32,

    /// Number of concurrent download workers
    #[arg(short, long, default_value_t = 5)]
    workers: usize,

    /// Politeness delay between requests, per worker, in seconds
    #[arg(long, default_value_t = 1.0)]
    delay: f64,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Ignore robots.txt rules
    #[arg(long)]
    no_robots: bool,

    /// User-Agent header value
    #[arg(long, default_value = "SiteMirror/1.0")]
    user_agent: String,

    /// Hard ceiling on processed pages
    #[arg(long, default_value_t = 1000)]
    max_pages: usize,

    /// File extension to exclude from download (repeatable, e.g. --exclude .pdf)
    #[arg(long = "exclude", value_name = "EXT")]
    excluded: Vec<String>,

    /// Load configuration from a TOML file instead of flags
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate configuration and show what would be mirrored without fetching
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    fn into_crawl_config(self) -> anyhow::Result<CrawlConfig> {
        if let Some(path) = &self.config {
            return load_config(path)
                .with_context(|| format!("failed to load {}", path.display()));
        }

        let mut config = CrawlConfig::new(self.url.unwrap_or_default(), self.output);
        config.max_depth = self.depth;
        config.max_workers = self.workers;
        config.delay_seconds = self.delay;
        config.timeout_seconds = self.timeout;
        config.user_agent = self.user_agent;
        config.follow_robots_txt = !self.no_robots;
        config.max_pages = self.max_pages;
        config.excluded_extensions = self.excluded.into_iter().collect();

        validate(&config).context("invalid configuration")?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    site_mirror::init_logging(cli.verbose, cli.quiet);

    let dry_run = cli.dry_run;
    let config = cli.into_crawl_config()?;

    if dry_run {
        print_dry_run(&config);
        return Ok(());
    }

    let coordinator = Coordinator::new(config).await?;

    // Ctrl-C stops new batches; in-flight downloads drain and the report
    // is still written.
    let cancel = coordinator.cancel_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, finishing in-flight downloads");
            cancel.store(true, Ordering::SeqCst);
        }
    });

    let report = coordinator.run().await?;

    println!(
        "Mirror complete: {} saved, {} failed. See clone_report.txt for details.",
        report.saved.len(),
        report.failed.len()
    );

    Ok(())
}

/// Handles --dry-run: validates the configuration and shows what a crawl
/// would do without fetching anything
fn print_dry_run(config: &CrawlConfig) {
    println!("=== Site-Mirror Dry Run ===\n");

    println!("Target:     {}", config.base_url);
    println!("Output dir: {}", config.output_dir.display());
    println!("Max depth:  {}", config.max_depth);
    println!("Workers:    {}", config.max_workers);
    println!("Delay:      {}s per fetch", config.delay_seconds);
    println!("Timeout:    {}s per request", config.timeout_seconds);
    println!("User agent: {}", config.user_agent);
    println!("Robots.txt: {}", if config.follow_robots_txt { "honored" } else { "ignored" });
    println!("Page cap:   {}", config.max_pages);

    if !config.excluded_extensions.is_empty() {
        let mut excluded: Vec<&String> = config.excluded_extensions.iter().collect();
        excluded.sort();
        println!(
            "Excluded:   {}",
            excluded
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    println!("\n✓ Configuration is valid");
}
