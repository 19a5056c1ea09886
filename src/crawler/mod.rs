//! Crawler module for page fetching, link rewriting, and orchestration
//!
//! This module contains the core mirroring logic:
//! - The frontier work queue and terminal-state tracking
//! - Admission filtering (scope, depth, extensions, robots, dedup)
//! - HTML/CSS link discovery and rewriting
//! - HTTP fetching and persistence
//! - The batch-oriented crawl loop

mod coordinator;
mod fetcher;
mod filter;
mod frontier;
mod rewriter;

pub use coordinator::{mirror, Coordinator};
pub use fetcher::{build_http_client, FetchOutcome, Fetcher};
pub use filter::FilterPolicy;
pub use frontier::{CrawlTask, Frontier};
pub use rewriter::ContentRewriter;
