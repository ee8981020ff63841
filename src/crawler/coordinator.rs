//! Crawler coordinator - main traversal orchestration logic
//!
//! This module wires the fetcher's two event kinds to the shared crawl state:
//! - "page fetched": run the extractor and create the page's record
//! - "link discovered": resolve the href, record the child edge, apply depth and domain
//!   policy, then claim and dispatch the child if nobody has yet
//!
//! The visited registry claim is the only deduplication guard. A fetch is dispatched if
//! and only if `try_claim` returned true for that address.

use crate::config::CrawlConfig;
use crate::crawler::fetcher::{FetchResult, Fetcher, HttpFetcher};
use crate::crawler::scheduler::{Dispatcher, FetchJob, Scheduler};
use crate::extract::Extractor;
use crate::output::{log_statistics, materialize, CrawlEvent, CrawlStatistics, CrawlStats};
use crate::state::{PageRecord, PageRecordStore, VisitedRegistry};
use crate::url::{resolve, DomainScope};
use crate::Result;
use std::sync::Arc;
use url::Url;

/// Outcome of a finished traversal
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Every created page record, ordered by address
    pub records: Vec<PageRecord>,

    /// Counters collected while crawling
    pub stats: CrawlStatistics,

    /// True when the run hit its time budget and in-flight fetches were abandoned
    pub timed_out: bool,
}

/// Shared state and policy for one traversal
///
/// One instance is shared by every fetch task behind an `Arc`.
struct Traversal<F> {
    fetcher: F,
    extractor: Extractor,
    scope: DomainScope,
    max_depth: u32,
    registry: VisitedRegistry,
    store: PageRecordStore,
    stats: CrawlStats,
    dispatcher: Dispatcher,
}

impl<F: Fetcher> Traversal<F> {
    /// Fetches one claimed address and handles the resulting events
    async fn process(&self, job: FetchJob) {
        tracing::debug!(url = %job.url, depth = job.depth, "Fetching");

        match self.fetcher.fetch(&job.url).await {
            FetchResult::Success { body, links, .. } => {
                self.stats.record(CrawlEvent::PageFetched);
                self.on_page_fetched(&job.url, &body);

                for href in &links {
                    self.on_link_discovered(&job, href);
                }
            }
            FetchResult::ContentMismatch { content_type } => {
                tracing::warn!("Skipping {}: not HTML ({})", job.url, content_type);
                self.stats.record(CrawlEvent::FetchFailed);
            }
            FetchResult::HttpError { status_code } => {
                tracing::warn!("HTTP {} for {}", status_code, job.url);
                self.stats.record(CrawlEvent::FetchFailed);
            }
            FetchResult::NetworkError { error } => {
                tracing::warn!("Failed to fetch {}: {}", job.url, error);
                self.stats.record(CrawlEvent::FetchFailed);
            }
        }
    }

    /// Extracts matches from the page body and creates the page's record
    fn on_page_fetched(&self, url: &Url, body: &str) {
        let data = self.extractor.extract(body);
        tracing::info!("Fetched {} ({} matches)", url, data.len());

        if let Err(e) = self.store.create_record(url.clone(), data) {
            tracing::error!("Registry anomaly: {}", e);
            self.stats.record(CrawlEvent::RegistryAnomaly);
        }
    }

    /// Handles one raw href found on the parent page
    ///
    /// A child's depth is taken from whichever parent claims it first. Under concurrency a
    /// longer path can win that race, so a page within `max_depth` of the root by its
    /// shortest path may go unfetched on some runs. No page beyond `max_depth` is ever
    /// fetched.
    fn on_link_discovered(&self, parent: &FetchJob, href: &str) {
        self.stats.record(CrawlEvent::LinkDiscovered);

        let child = match resolve(&parent.url, href) {
            Ok(child) => child,
            Err(e) => {
                tracing::debug!("Skipping link {:?} on {}: {}", href, parent.url, e);
                self.stats.record(CrawlEvent::LinkUnresolvable);
                return;
            }
        };

        // The edge is recorded even when the target is never fetched
        if let Err(e) = self.store.add_child(&parent.url, child.clone()) {
            tracing::error!("Registry anomaly: {}", e);
            self.stats.record(CrawlEvent::RegistryAnomaly);
        }

        if !self.scope.allows(&child) {
            tracing::trace!("Out of scope: {}", child);
            self.stats.record(CrawlEvent::LinkOutOfScope);
            return;
        }

        let depth = parent.depth + 1;
        if depth > self.max_depth {
            tracing::trace!("Depth limit reached for {}", child);
            self.stats.record(CrawlEvent::LinkDepthBounded);
            return;
        }

        if !self.registry.try_claim(&child) {
            self.stats.record(CrawlEvent::LinkAlreadyClaimed);
            return;
        }

        tracing::trace!("Dispatching {} at depth {}", child, depth);
        if !self.dispatcher.dispatch(FetchJob { url: child, depth }) {
            tracing::warn!("Scheduler closed, dropping dispatched link");
        }
    }
}

/// Main crawler coordinator structure
///
/// Generic over the page source so the traversal can be driven without a network.
pub struct Coordinator<F: Fetcher = HttpFetcher> {
    config: CrawlConfig,
    fetcher: F,
}

impl Coordinator<HttpFetcher> {
    /// Creates a coordinator that fetches over HTTP
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(MaxtractError::Http)` - The HTTP client could not be built
    pub fn new(config: CrawlConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(&config.user_agent, config.request_timeout)?;
        Ok(Self::with_fetcher(config, fetcher))
    }
}

impl<F: Fetcher> Coordinator<F> {
    /// Creates a coordinator around any [`Fetcher`]
    pub fn with_fetcher(config: CrawlConfig, fetcher: F) -> Self {
        Self { config, fetcher }
    }

    /// Runs the traversal to completion
    ///
    /// 1. Claims the root and dispatches it at depth 0
    /// 2. Drains the scheduler, bounded by the run timeout if one is set
    /// 3. Materializes the record store
    ///
    /// A timeout is not an error: in-flight fetches are aborted and whatever was
    /// recorded so far is returned with `timed_out` set.
    pub async fn run(self) -> Result<CrawlReport> {
        let CrawlConfig {
            root,
            extractor,
            max_depth,
            scope,
            concurrency,
            run_timeout,
            ..
        } = self.config;

        tracing::info!(
            "Crawling {} (depth {}, concurrency {}, pattern {})",
            root,
            max_depth,
            concurrency,
            extractor.as_str()
        );

        let mut scheduler = Scheduler::new(concurrency);
        let traversal = Arc::new(Traversal {
            fetcher: self.fetcher,
            extractor,
            scope,
            max_depth,
            registry: VisitedRegistry::new(),
            store: PageRecordStore::new(),
            stats: CrawlStats::new(),
            dispatcher: scheduler.dispatcher(),
        });

        traversal.registry.try_claim(&root);
        scheduler.dispatcher().dispatch(FetchJob {
            url: root,
            depth: 0,
        });

        let handler = {
            let traversal = Arc::clone(&traversal);
            move |job: FetchJob| {
                let traversal = Arc::clone(&traversal);
                async move { traversal.process(job).await }
            }
        };

        let timed_out = match run_timeout {
            Some(limit) => {
                let outcome = tokio::time::timeout(limit, scheduler.drain(handler)).await;
                if outcome.is_err() {
                    tracing::warn!(
                        "Crawl exceeded {}s, abandoning {} in-flight fetches",
                        limit.as_secs(),
                        scheduler.in_flight()
                    );
                    scheduler.shutdown().await;
                    true
                } else {
                    false
                }
            }
            None => {
                scheduler.drain(handler).await;
                false
            }
        };

        let records = materialize(&traversal.store);
        let stats = traversal.stats.snapshot();
        log_statistics(&stats);

        Ok(CrawlReport {
            records,
            stats,
            timed_out,
        })
    }
}

/// Runs a complete crawl over HTTP
pub async fn run_crawl(config: CrawlConfig) -> Result<CrawlReport> {
    Coordinator::new(config)?.run().await
}
