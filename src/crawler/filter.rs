use crate::config::CrawlConfig;
use crate::crawler::Frontier;
use crate::robots::RobotsGate;
use crate::url::{extract_extension, same_origin};
use std::collections::HashSet;
use std::sync::Arc;
use url::Url;

/// Decides whether a discovered URL is eligible for download.
///
/// Admission is the sole gate for enqueueing. The already-resolved check
/// reads the frontier's sets under their lock; the residual window between
/// admission and push can let two workers enqueue the same URL, which is
/// harmless because `mark_saved`/`mark_failed` are idempotent and workers
/// re-check the saved set before fetching.
pub struct FilterPolicy {
    base: Url,
    max_depth: u32,
    allowed_extensions: HashSet<String>,
    excluded_extensions: HashSet<String>,
    user_agent: String,
    robots: RobotsGate,
    frontier: Arc<Frontier>,
}

impl FilterPolicy {
    pub fn new(
        config: &CrawlConfig,
        base: Url,
        robots: RobotsGate,
        frontier: Arc<Frontier>,
    ) -> Self {
        Self {
            base,
            max_depth: config.max_depth,
            allowed_extensions: config.allowed_extensions.clone(),
            excluded_extensions: config.excluded_extensions.clone(),
            user_agent: config.user_agent.clone(),
            robots,
            frontier,
        }
    }

    /// Checks, in order: depth limit, exact-origin scope, extension
    /// allow-list, extension deny-list (deny wins over allow), robots
    /// rules, and whether the URL already reached a terminal state.
    pub fn admit(&self, url: &Url, depth: u32) -> bool {
        if depth > self.max_depth {
            tracing::trace!("rejecting {} (depth {} > {})", url, depth, self.max_depth);
            return false;
        }

        if !same_origin(url, &self.base) {
            tracing::trace!("rejecting {} (outside {})", url, self.base);
            return false;
        }

        if let Some(ext) = extract_extension(url) {
            if !self.allowed_extensions.contains(&ext) {
                return false;
            }
            if self.excluded_extensions.contains(&ext) {
                return false;
            }
        }

        if !self.robots.is_allowed(url.as_str(), &self.user_agent) {
            tracing::debug!("rejecting {} (disallowed by robots.txt)", url);
            return false;
        }

        if self.frontier.is_resolved(url.as_str()) {
            return false;
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_policy(config: CrawlConfig, robots: RobotsGate) -> (FilterPolicy, Arc<Frontier>) {
        let frontier = Arc::new(Frontier::new());
        let base = Url::parse(&config.base_url).unwrap();
        (
            FilterPolicy::new(&config, base, robots, frontier.clone()),
            frontier,
        )
    }

    fn default_policy() -> (FilterPolicy, Arc<Frontier>) {
        let config = CrawlConfig::new("https://example.com/", "/tmp/mirror-test");
        make_policy(config, RobotsGate::allow_all())
    }

    fn parse(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_admits_in_scope_url() {
        let (policy, _) = default_policy();
        assert!(policy.admit(&parse("https://example.com/page.html"), 1));
    }

    #[test]
    fn test_rejects_beyond_max_depth() {
        let (policy, _) = default_policy();
        assert!(policy.admit(&parse("https://example.com/a.html"), 3));
        assert!(!policy.admit(&parse("https://example.com/a.html"), 4));
    }

    #[test]
    fn test_depth_zero_config_admits_only_seed_depth() {
        let mut config = CrawlConfig::new("https://example.com/", "/tmp/mirror-test");
        config.max_depth = 0;
        let (policy, _) = make_policy(config, RobotsGate::allow_all());
        assert!(policy.admit(&parse("https://example.com/"), 0));
        assert!(!policy.admit(&parse("https://example.com/a.html"), 1));
    }

    #[test]
    fn test_rejects_other_host() {
        let (policy, _) = default_policy();
        assert!(!policy.admit(&parse("https://other.com/page.html"), 1));
    }

    #[test]
    fn test_rejects_subdomain_of_base_host() {
        let (policy, _) = default_policy();
        assert!(!policy.admit(&parse("https://sub.example.com/page.html"), 1));
    }

    #[test]
    fn test_rejects_extension_not_in_allow_list() {
        let (policy, _) = default_policy();
        assert!(!policy.admit(&parse("https://example.com/dump.sql"), 1));
    }

    #[test]
    fn test_admits_extensionless_path() {
        let (policy, _) = default_policy();
        assert!(policy.admit(&parse("https://example.com/about"), 1));
    }

    #[test]
    fn test_excluded_wins_over_allowed() {
        let mut config = CrawlConfig::new("https://example.com/", "/tmp/mirror-test");
        // .pdf is in the default allow list; excluding it must still reject
        config.excluded_extensions.insert(".pdf".to_string());
        let (policy, _) = make_policy(config, RobotsGate::allow_all());
        assert!(!policy.admit(&parse("https://example.com/doc.pdf"), 1));
    }

    #[test]
    fn test_rejects_robots_disallowed() {
        let config = CrawlConfig::new("https://example.com/", "/tmp/mirror-test");
        let robots = RobotsGate::from_content("User-agent: *\nDisallow: /admin");
        let (policy, _) = make_policy(config, robots);
        assert!(!policy.admit(&parse("https://example.com/admin/panel.html"), 1));
        assert!(policy.admit(&parse("https://example.com/public.html"), 1));
    }

    #[test]
    fn test_rejects_already_saved() {
        let (policy, frontier) = default_policy();
        let url = parse("https://example.com/page.html");
        assert!(policy.admit(&url, 1));
        frontier.mark_saved(url.as_str());
        assert!(!policy.admit(&url, 1));
    }

    #[test]
    fn test_rejects_already_failed() {
        let (policy, frontier) = default_policy();
        let url = parse("https://example.com/page.html");
        frontier.mark_failed(url.as_str());
        assert!(!policy.admit(&url, 1));
    }
}
