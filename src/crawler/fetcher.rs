use crate::config::CrawlConfig;
use crate::crawler::{ContentRewriter, CrawlTask, Frontier};
use crate::output::FetchLog;
use crate::url::PathMapper;
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Result of one fetch-and-store attempt
#[derive(Debug)]
pub enum FetchOutcome {
    /// Body persisted and the URL marked saved
    Saved { local_path: PathBuf },

    /// Terminal failure; the URL is marked failed
    Failed { error: String },

    /// Another worker already saved this URL
    AlreadySaved,
}

/// Builds the shared HTTP client used for every request
pub fn build_http_client(config: &CrawlConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_seconds))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Downloads one task's URL and persists it under the output root.
///
/// HTML bodies are handed to the rewriter first (which enqueues newly
/// discovered links) and the rewritten text is what gets written; standalone
/// stylesheets go through the CSS rewrite; everything else is written
/// byte-for-byte as received. Write failures are treated exactly like fetch
/// failures.
pub struct Fetcher {
    client: Client,
    mapper: PathMapper,
    rewriter: Arc<ContentRewriter>,
    frontier: Arc<Frontier>,
    log: Arc<FetchLog>,
}

impl Fetcher {
    pub fn new(
        client: Client,
        mapper: PathMapper,
        rewriter: Arc<ContentRewriter>,
        frontier: Arc<Frontier>,
        log: Arc<FetchLog>,
    ) -> Self {
        Self {
            client,
            mapper,
            rewriter,
            frontier,
            log,
        }
    }

    pub async fn fetch_and_store(&self, task: &CrawlTask) -> FetchOutcome {
        let url = &task.url;

        // Admission tolerates a small duplicate-enqueue window; this check
        // keeps the duplicate harmless.
        if self.frontier.is_saved(url.as_str()) {
            return FetchOutcome::AlreadySaved;
        }

        match &task.referrer {
            Some(referrer) => {
                tracing::debug!("fetching {} (depth {}, via {})", url, task.depth, referrer)
            }
            None => tracing::debug!("fetching {} (depth {})", url, task.depth),
        }

        let response = match self.client.get(url.clone()).send().await {
            Ok(r) => r,
            Err(e) => return self.fail(url.as_str(), &classify_error(&e)),
        };

        let status = response.status();
        if !status.is_success() {
            return self.fail(url.as_str(), &format!("HTTP {}", status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_ascii_lowercase();

        let local_path = match self.mapper.local_path(url) {
            Ok(p) => p,
            Err(e) => return self.fail(url.as_str(), &e.to_string()),
        };

        // HTML and CSS must be fully materialized for link processing;
        // everything else is saved as received.
        let body: Vec<u8> = if content_type.contains("text/html") {
            match response.text().await {
                Ok(text) => self
                    .rewriter
                    .process_html(&text, url, task.depth)
                    .into_bytes(),
                Err(e) => return self.fail(url.as_str(), &classify_error(&e)),
            }
        } else if is_stylesheet(&content_type, url) {
            match response.text().await {
                Ok(text) => self
                    .rewriter
                    .process_css(&text, url, task.depth)
                    .into_bytes(),
                Err(e) => return self.fail(url.as_str(), &classify_error(&e)),
            }
        } else {
            match response.bytes().await {
                Ok(bytes) => bytes.to_vec(),
                Err(e) => return self.fail(url.as_str(), &classify_error(&e)),
            }
        };

        if let Err(e) = self.persist(&local_path, &body).await {
            return self.fail(url.as_str(), &format!("write failed: {}", e));
        }

        self.frontier.mark_saved(url.as_str());
        self.log.record_saved(url.as_str(), &local_path);
        tracing::info!("saved {} -> {}", url, local_path.display());

        FetchOutcome::Saved { local_path }
    }

    async fn persist(&self, path: &Path, body: &[u8]) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, body).await
    }

    fn fail(&self, url: &str, error: &str) -> FetchOutcome {
        self.frontier.mark_failed(url);
        self.log.record_failed(url, error);
        tracing::warn!("failed {}: {}", url, error);
        FetchOutcome::Failed {
            error: error.to_string(),
        }
    }
}

/// Stylesheets are detected by content type, falling back to the `.css`
/// extension for servers that send a generic type.
fn is_stylesheet(content_type: &str, url: &Url) -> bool {
    content_type.contains("text/css") || url.path().to_ascii_lowercase().ends_with(".css")
}

fn classify_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "request timeout".to_string()
    } else if error.is_connect() {
        "connection failed".to_string()
    } else {
        error.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        let config = CrawlConfig::new("https://example.com/", "/tmp/mirror-test");
        assert!(build_http_client(&config).is_ok());
    }

    #[test]
    fn test_is_stylesheet_by_content_type() {
        let url = Url::parse("https://example.com/asset").unwrap();
        assert!(is_stylesheet("text/css; charset=utf-8", &url));
        assert!(!is_stylesheet("text/html", &url));
    }

    #[test]
    fn test_is_stylesheet_by_extension_fallback() {
        let url = Url::parse("https://example.com/theme.CSS").unwrap();
        assert!(is_stylesheet("application/octet-stream", &url));
    }
}
