//! Site-Mirror: an offline website mirroring tool
//!
//! This crate downloads a website starting from a seed URL, rewrites embedded
//! links so the copy is browsable offline, and reports what was saved and
//! what failed. It respects robots.txt and applies a per-worker politeness
//! delay between requests.

pub mod config;
pub mod crawler;
pub mod output;
pub mod robots;
pub mod url;

use std::sync::Once;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Main error type for Site-Mirror operations
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Base URL {url} is unreachable: {reason}")]
    Unreachable { url: String, reason: String },

    #[error("Path mapping error: {0}")]
    Path(#[from] PathError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors raised while mapping URLs to local filesystem paths
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("URL {url} maps outside the output root")]
    Traversal { url: String },

    #[error("URL {url} has no mappable path")]
    Unmappable { url: String },
}

/// Result type alias for Site-Mirror operations
pub type Result<T> = std::result::Result<T, MirrorError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

static LOG_INIT: Once = Once::new();

/// Initializes the tracing subscriber based on verbosity level.
///
/// Safe to call any number of times from any number of crawl instances: the
/// subscriber is installed exactly once per process, subsequent calls are
/// no-ops.
pub fn init_logging(verbose: u8, quiet: bool) {
    LOG_INIT.call_once(|| {
        let filter = if quiet {
            EnvFilter::new("error")
        } else {
            match verbose {
                0 => EnvFilter::new("site_mirror=info,warn"),
                1 => EnvFilter::new("site_mirror=debug,info"),
                2 => EnvFilter::new("site_mirror=trace,debug"),
                _ => EnvFilter::new("trace"),
            }
        };

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .init();
    });
}

// Re-export commonly used types
pub use config::CrawlConfig;
pub use crawler::{mirror, CrawlTask, Frontier};
pub use output::MirrorReport;
pub use url::PathMapper;
