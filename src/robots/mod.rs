//! Robots.txt handling
//!
//! The gate is fetched once at startup and answers allow/deny queries for
//! the rest of the run. Robots rules are advisory: any failure to fetch or
//! parse them degrades to allowing everything rather than failing the crawl.

use reqwest::Client;
use robotstxt::DefaultMatcher;
use url::Url;

/// Answers allow/deny queries against the site's robots.txt rules
#[derive(Debug, Clone)]
pub struct RobotsGate {
    /// Raw robots.txt content; None means everything is allowed
    content: Option<String>,
}

impl RobotsGate {
    /// A gate that permits every URL
    pub fn allow_all() -> Self {
        Self { content: None }
    }

    /// Builds a gate from raw robots.txt content
    pub fn from_content(content: &str) -> Self {
        if content.trim().is_empty() {
            return Self::allow_all();
        }
        Self {
            content: Some(content.to_string()),
        }
    }

    /// Fetches `{base}/robots.txt` once.
    ///
    /// Returns an allow-all gate when compliance is disabled, the response
    /// is not HTTP 200, or the request fails in any way.
    pub async fn fetch(client: &Client, base: &Url, enabled: bool) -> Self {
        if !enabled {
            tracing::debug!("robots.txt compliance disabled");
            return Self::allow_all();
        }

        let robots_url = match base.join("/robots.txt") {
            Ok(u) => u,
            Err(e) => {
                tracing::warn!("could not build robots.txt URL: {}", e);
                return Self::allow_all();
            }
        };

        match client.get(robots_url.clone()).send().await {
            Ok(response) if response.status() == reqwest::StatusCode::OK => {
                match response.text().await {
                    Ok(body) => {
                        tracing::info!("loaded robots.txt rules from {}", robots_url);
                        Self::from_content(&body)
                    }
                    Err(e) => {
                        tracing::warn!("could not read robots.txt body: {}", e);
                        Self::allow_all()
                    }
                }
            }
            Ok(response) => {
                tracing::warn!(
                    "robots.txt returned HTTP {}, allowing everything",
                    response.status().as_u16()
                );
                Self::allow_all()
            }
            Err(e) => {
                tracing::warn!("could not load robots.txt: {}", e);
                Self::allow_all()
            }
        }
    }

    /// Checks whether a URL is allowed for the given user agent.
    ///
    /// Pure read against the parsed rules; unconditionally true when
    /// compliance is disabled or no rules are available.
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        match &self.content {
            None => true,
            Some(content) => {
                let mut matcher = DefaultMatcher::default();
                matcher.one_agent_allowed_by_robots(content, user_agent, url)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allow_all() {
        let gate = RobotsGate::allow_all();
        assert!(gate.is_allowed("https://example.com/any/path", "TestBot"));
        assert!(gate.is_allowed("https://example.com/admin", "TestBot"));
    }

    #[test]
    fn test_disallow_all() {
        let gate = RobotsGate::from_content("User-agent: *\nDisallow: /");
        assert!(!gate.is_allowed("https://example.com/", "TestBot"));
        assert!(!gate.is_allowed("https://example.com/page", "TestBot"));
    }

    #[test]
    fn test_disallow_specific_path() {
        let gate = RobotsGate::from_content("User-agent: *\nDisallow: /admin");
        assert!(gate.is_allowed("https://example.com/", "TestBot"));
        assert!(gate.is_allowed("https://example.com/page", "TestBot"));
        assert!(!gate.is_allowed("https://example.com/admin", "TestBot"));
        assert!(!gate.is_allowed("https://example.com/admin/users", "TestBot"));
    }

    #[test]
    fn test_allow_overrides_disallow() {
        let gate =
            RobotsGate::from_content("User-agent: *\nDisallow: /private\nAllow: /private/public");
        assert!(!gate.is_allowed("https://example.com/private", "TestBot"));
        assert!(gate.is_allowed("https://example.com/private/public", "TestBot"));
    }

    #[test]
    fn test_specific_user_agent() {
        let gate =
            RobotsGate::from_content("User-agent: BadBot\nDisallow: /\n\nUser-agent: *\nAllow: /");
        assert!(gate.is_allowed("https://example.com/page", "GoodBot"));
        assert!(!gate.is_allowed("https://example.com/page", "BadBot"));
    }

    #[test]
    fn test_empty_content_allows_everything() {
        let gate = RobotsGate::from_content("");
        assert!(gate.is_allowed("https://example.com/any", "TestBot"));
    }
}
