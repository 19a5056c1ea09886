//! Crawl orchestration
//!
//! The coordinator owns the bounded worker pool and the crawl loop: it
//! drains the frontier in batches, dispatches fetch+process tasks, enforces
//! the processed-page cap, and emits the final report. Batches are
//! snapshotted, dispatched, and awaited to completion before the next batch
//! is drawn — workers never pull directly from the queue.

use crate::config::{validate, CrawlConfig};
use crate::crawler::fetcher::{build_http_client, FetchOutcome, Fetcher};
use crate::crawler::filter::FilterPolicy;
use crate::crawler::rewriter::ContentRewriter;
use crate::crawler::{CrawlTask, Frontier};
use crate::output::{FetchLog, MirrorReport};
use crate::robots::RobotsGate;
use crate::url::PathMapper;
use crate::MirrorError;
use reqwest::Client;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

/// Main crawl orchestrator
pub struct Coordinator {
    config: Arc<CrawlConfig>,
    base: Url,
    frontier: Arc<Frontier>,
    fetcher: Arc<Fetcher>,
    cancelled: Arc<AtomicBool>,
}

impl Coordinator {
    /// Validates the configuration and prepares every collaborator.
    ///
    /// Everything that can fail here is a setup error and fatal: invalid
    /// configuration, an output directory that cannot be created, an
    /// unreachable base URL. The robots fetch is the one exception — its
    /// failure degrades to allow-all.
    pub async fn new(config: CrawlConfig) -> Result<Self, MirrorError> {
        validate(&config)?;
        let base = Url::parse(&config.base_url)?;

        tokio::fs::create_dir_all(&config.output_dir).await?;

        let client = build_http_client(&config)?;
        probe_base_url(&client, &base).await?;

        let robots = RobotsGate::fetch(&client, &base, config.follow_robots_txt).await;

        let frontier = Arc::new(Frontier::new());
        let mapper = PathMapper::new(&config.output_dir);
        let filter = Arc::new(FilterPolicy::new(
            &config,
            base.clone(),
            robots,
            frontier.clone(),
        ));
        let rewriter = Arc::new(ContentRewriter::new(
            filter,
            frontier.clone(),
            mapper.clone(),
        ));
        let log = Arc::new(FetchLog::create(&config.output_dir)?);
        let fetcher = Arc::new(Fetcher::new(
            client,
            mapper,
            rewriter,
            frontier.clone(),
            log,
        ));

        Ok(Self {
            config: Arc::new(config),
            base,
            frontier,
            fetcher,
            cancelled: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Shared flag that stops new batch submission when set.
    ///
    /// In-flight workers drain normally and the report is still produced
    /// from whatever state the frontier holds at that point.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        self.cancelled.clone()
    }

    /// Runs the crawl to completion and writes the report.
    pub async fn run(&self) -> Result<MirrorReport, MirrorError> {
        tracing::info!(
            "mirroring {} into {}",
            self.base,
            self.config.output_dir.display()
        );

        self.frontier.push(CrawlTask {
            url: self.base.clone(),
            depth: 0,
            referrer: None,
        });

        let workers = self.config.max_workers;
        let semaphore = Arc::new(Semaphore::new(workers));
        let delay = Duration::from_secs_f64(self.config.delay_seconds);
        let mut processed = 0usize;
        let start = Instant::now();

        while !self.frontier.is_empty() && processed < self.config.max_pages {
            if self.cancelled.load(Ordering::SeqCst) {
                tracing::info!("cancellation requested, draining in-flight work");
                break;
            }

            // Batch sized to keep the pool saturated without unbounded growth
            let batch = self.frontier.pop_batch(workers * 2);
            if batch.is_empty() {
                break;
            }

            let mut tasks = JoinSet::new();
            for task in batch {
                let permit = match semaphore.clone().acquire_owned().await {
                    Ok(p) => p,
                    Err(_) => break,
                };
                let fetcher = self.fetcher.clone();
                tasks.spawn(async move {
                    let outcome = fetcher.fetch_and_store(&task).await;
                    // The politeness delay keeps this worker's pool slot
                    // occupied, so the effective request rate scales with
                    // the worker count, not the batch size.
                    if matches!(outcome, FetchOutcome::Saved { .. }) && !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    drop(permit);
                    outcome
                });
            }

            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok(FetchOutcome::Saved { .. }) | Ok(FetchOutcome::AlreadySaved) => {
                        processed += 1
                    }
                    Ok(FetchOutcome::Failed { .. }) => {}
                    Err(e) => tracing::error!("worker task failed: {}", e),
                }
            }

            tracing::info!(
                "progress: {} pages processed, {} queued, {:.1}s elapsed",
                processed,
                self.frontier.queue_len(),
                start.elapsed().as_secs_f64()
            );
        }

        if processed >= self.config.max_pages {
            tracing::warn!(
                "processed-page cap of {} reached, stopping crawl",
                self.config.max_pages
            );
        }

        let report = MirrorReport::from_frontier(self.base.as_str(), &self.frontier);
        let report_path = report.write(&self.config.output_dir)?;
        tracing::info!(
            "mirror complete: {} saved, {} failed, report at {}",
            report.saved.len(),
            report.failed.len(),
            report_path.display()
        );

        Ok(report)
    }
}

/// One GET against the seed URL. An unreachable base is a setup error, not
/// a per-URL failure.
async fn probe_base_url(client: &Client, base: &Url) -> Result<(), MirrorError> {
    match client.get(base.clone()).send().await {
        Ok(response) if response.status().is_success() => Ok(()),
        Ok(response) => Err(MirrorError::Unreachable {
            url: base.to_string(),
            reason: format!("HTTP {}", response.status().as_u16()),
        }),
        Err(e) => Err(MirrorError::Unreachable {
            url: base.to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Convenience entry point: set up a coordinator and run it
pub async fn mirror(config: CrawlConfig) -> Result<MirrorReport, MirrorError> {
    Coordinator::new(config).await?.run().await
}
