use serde::Deserialize;
use std::collections::HashSet;
use std::path::PathBuf;

/// Crawl configuration, immutable once the crawl starts.
///
/// Built either from command-line flags or from a TOML file (kebab-case
/// keys). Missing optional fields fall back to the defaults below.
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
    /// Seed URL; also defines the crawl scope (scheme + host + port)
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Root directory the mirrored tree is written under
    #[serde(rename = "output-dir")]
    pub output_dir: PathBuf,

    /// Maximum link depth from the seed
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: u32,

    /// Number of concurrent download workers
    #[serde(rename = "max-workers", default = "default_max_workers")]
    pub max_workers: usize,

    /// Politeness delay in seconds, applied per completed fetch per worker
    #[serde(rename = "delay-seconds", default = "default_delay")]
    pub delay_seconds: f64,

    /// Per-request timeout in seconds
    #[serde(rename = "timeout-seconds", default = "default_timeout")]
    pub timeout_seconds: u64,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Whether to fetch and honor robots.txt
    #[serde(rename = "follow-robots-txt", default = "default_true")]
    pub follow_robots_txt: bool,

    /// Hard ceiling on processed pages, guarding against crawl blow-up
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: usize,

    /// File extensions eligible for download (lowercase, leading dot)
    #[serde(
        rename = "allowed-extensions",
        default = "default_allowed_extensions"
    )]
    pub allowed_extensions: HashSet<String>,

    /// File extensions never downloaded; takes precedence over the allow list
    #[serde(rename = "excluded-extensions", default)]
    pub excluded_extensions: HashSet<String>,
}

impl CrawlConfig {
    /// Creates a configuration with defaults for everything but the seed URL
    /// and output directory.
    pub fn new(base_url: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_url: base_url.into(),
            output_dir: output_dir.into(),
            max_depth: default_max_depth(),
            max_workers: default_max_workers(),
            delay_seconds: default_delay(),
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
            follow_robots_txt: true,
            max_pages: default_max_pages(),
            allowed_extensions: default_allowed_extensions(),
            excluded_extensions: HashSet::new(),
        }
    }
}

fn default_max_depth() -> u32 {
    3
}

fn default_max_workers() -> usize {
    5
}

fn default_delay() -> f64 {
    1.0
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    "SiteMirror/1.0".to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_pages() -> usize {
    1000
}

/// The extension set downloaded when no allow list is configured: markup,
/// styles, scripts, common image/font/document formats.
pub fn default_allowed_extensions() -> HashSet<String> {
    [
        ".html", ".htm", ".css", ".js", ".json", ".xml", ".png", ".jpg",
        ".jpeg", ".gif", ".bmp", ".svg", ".ico", ".woff", ".woff2", ".ttf",
        ".eot", ".pdf", ".doc", ".docx", ".txt",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_applies_defaults() {
        let config = CrawlConfig::new("https://example.com/", "./mirror");
        assert_eq!(config.max_depth, 3);
        assert_eq!(config.max_workers, 5);
        assert_eq!(config.delay_seconds, 1.0);
        assert_eq!(config.timeout_seconds, 30);
        assert!(config.follow_robots_txt);
        assert_eq!(config.max_pages, 1000);
        assert!(config.excluded_extensions.is_empty());
    }

    #[test]
    fn test_default_allowed_extensions_cover_web_assets() {
        let allowed = default_allowed_extensions();
        for ext in [".html", ".css", ".js", ".png", ".woff2"] {
            assert!(allowed.contains(ext), "missing {}", ext);
        }
    }
}
