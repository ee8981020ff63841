//! Crawler module for page fetching and traversal
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching
//! - HTML link discovery
//! - Dispatch scheduling and drain detection
//! - Overall traversal coordination

mod coordinator;
mod fetcher;
mod parser;
mod scheduler;

pub use coordinator::{run_crawl, Coordinator, CrawlReport};
pub use fetcher::{build_http_client, fetch_url, FetchResult, Fetcher, HttpFetcher, DEFAULT_USER_AGENT};
pub use parser::discover_links;
pub use scheduler::{Dispatcher, FetchJob, Scheduler};

use crate::config::CrawlConfig;
use crate::Result;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client
/// 2. Fetch the root and follow links within the depth and domain bounds
/// 3. Extract matches from every fetched page
/// 4. Return the materialized page records
///
/// # Arguments
///
/// * `config` - The validated crawl configuration
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl completed, possibly cut short by the run timeout
/// * `Err(MaxtractError)` - The crawl could not start
pub async fn crawl(config: CrawlConfig) -> Result<CrawlReport> {
    run_crawl(config).await
}
