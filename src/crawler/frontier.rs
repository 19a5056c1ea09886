use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;
use url::Url;

/// A unit of crawl work: one URL at one depth, consumed exactly once
#[derive(Debug, Clone)]
pub struct CrawlTask {
    /// The absolute URL to download
    pub url: Url,

    /// Link depth from the seed (the seed itself is depth 0)
    pub depth: u32,

    /// The page this URL was discovered on, if any
    pub referrer: Option<Url>,
}

#[derive(Debug, Default)]
struct FrontierState {
    queued: VecDeque<CrawlTask>,
    saved: HashSet<String>,
    failed: HashSet<String>,
}

/// Thread-safe FIFO work queue plus the terminal-outcome sets.
///
/// The single source of truth for dedup and progress: a URL appears in at
/// most one of `saved`/`failed`, and once in either it never re-enters the
/// queue (enforced by the admission check upstream). The lock is held only
/// across individual mutations, never across network or file I/O.
#[derive(Debug, Default)]
pub struct Frontier {
    state: Mutex<FrontierState>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends unconditionally; admission has already been decided.
    pub fn push(&self, task: CrawlTask) {
        self.state.lock().unwrap().queued.push_back(task);
    }

    /// Removes and returns up to `n` tasks in FIFO order. Non-blocking;
    /// returns an empty vector when the queue is empty.
    pub fn pop_batch(&self, n: usize) -> Vec<CrawlTask> {
        let mut state = self.state.lock().unwrap();
        let count = n.min(state.queued.len());
        state.queued.drain(..count).collect()
    }

    /// Records a URL as successfully saved. Idempotent; a URL that already
    /// failed stays failed.
    pub fn mark_saved(&self, url: &str) {
        let mut state = self.state.lock().unwrap();
        if !state.failed.contains(url) {
            state.saved.insert(url.to_string());
        }
    }

    /// Records a URL as terminally failed. Idempotent; a URL that was
    /// already saved stays saved.
    pub fn mark_failed(&self, url: &str) {
        let mut state = self.state.lock().unwrap();
        if !state.saved.contains(url) {
            state.failed.insert(url.to_string());
        }
    }

    /// Whether the URL was successfully saved
    pub fn is_saved(&self, url: &str) -> bool {
        self.state.lock().unwrap().saved.contains(url)
    }

    /// Whether the URL has reached a terminal state (saved or failed)
    pub fn is_resolved(&self, url: &str) -> bool {
        let state = self.state.lock().unwrap();
        state.saved.contains(url) || state.failed.contains(url)
    }

    /// Number of tasks waiting in the queue
    pub fn queue_len(&self) -> usize {
        self.state.lock().unwrap().queued.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().unwrap().queued.is_empty()
    }

    /// Sorted snapshot of the saved and failed URL lists, for the report
    pub fn snapshot(&self) -> (Vec<String>, Vec<String>) {
        let state = self.state.lock().unwrap();
        let mut saved: Vec<String> = state.saved.iter().cloned().collect();
        let mut failed: Vec<String> = state.failed.iter().cloned().collect();
        saved.sort();
        failed.sort();
        (saved, failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(url: &str) -> CrawlTask {
        CrawlTask {
            url: Url::parse(url).unwrap(),
            depth: 0,
            referrer: None,
        }
    }

    #[test]
    fn test_push_and_pop_fifo_order() {
        let frontier = Frontier::new();
        frontier.push(task("https://example.com/a"));
        frontier.push(task("https://example.com/b"));
        frontier.push(task("https://example.com/c"));

        let batch = frontier.pop_batch(2);
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].url.as_str(), "https://example.com/a");
        assert_eq!(batch[1].url.as_str(), "https://example.com/b");
        assert_eq!(frontier.queue_len(), 1);
    }

    #[test]
    fn test_pop_batch_returns_fewer_when_short() {
        let frontier = Frontier::new();
        frontier.push(task("https://example.com/a"));

        let batch = frontier.pop_batch(10);
        assert_eq!(batch.len(), 1);
        assert!(frontier.is_empty());
    }

    #[test]
    fn test_pop_batch_empty_queue() {
        let frontier = Frontier::new();
        assert!(frontier.pop_batch(5).is_empty());
    }

    #[test]
    fn test_mark_saved_is_idempotent() {
        let frontier = Frontier::new();
        frontier.mark_saved("https://example.com/a");
        frontier.mark_saved("https://example.com/a");

        let (saved, failed) = frontier.snapshot();
        assert_eq!(saved.len(), 1);
        assert!(failed.is_empty());
    }

    #[test]
    fn test_saved_and_failed_are_mutually_exclusive() {
        let frontier = Frontier::new();
        frontier.mark_saved("https://example.com/a");
        frontier.mark_failed("https://example.com/a");

        let (saved, failed) = frontier.snapshot();
        assert_eq!(saved, vec!["https://example.com/a".to_string()]);
        assert!(failed.is_empty());
    }

    #[test]
    fn test_failed_first_wins() {
        let frontier = Frontier::new();
        frontier.mark_failed("https://example.com/a");
        frontier.mark_saved("https://example.com/a");

        let (saved, failed) = frontier.snapshot();
        assert!(saved.is_empty());
        assert_eq!(failed, vec!["https://example.com/a".to_string()]);
    }

    #[test]
    fn test_is_resolved_covers_both_sets() {
        let frontier = Frontier::new();
        frontier.mark_saved("https://example.com/a");
        frontier.mark_failed("https://example.com/b");

        assert!(frontier.is_resolved("https://example.com/a"));
        assert!(frontier.is_resolved("https://example.com/b"));
        assert!(!frontier.is_resolved("https://example.com/c"));
    }

    #[test]
    fn test_snapshot_is_sorted() {
        let frontier = Frontier::new();
        frontier.mark_saved("https://example.com/c");
        frontier.mark_saved("https://example.com/a");
        frontier.mark_saved("https://example.com/b");

        let (saved, _) = frontier.snapshot();
        assert_eq!(
            saved,
            vec![
                "https://example.com/a".to_string(),
                "https://example.com/b".to_string(),
                "https://example.com/c".to_string(),
            ]
        );
    }
}
