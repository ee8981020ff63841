//! Crawl statistics
//!
//! Counters are bumped from inside concurrent fetch tasks, so they are plain atomics.
//! A [`CrawlStatistics`] snapshot is taken once the traversal has finished.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters for one traversal
#[derive(Debug)]
pub struct CrawlStats {
    started_at: DateTime<Utc>,
    pages_fetched: AtomicU64,
    fetch_failures: AtomicU64,
    links_discovered: AtomicU64,
    links_unresolvable: AtomicU64,
    links_out_of_scope: AtomicU64,
    links_depth_bounded: AtomicU64,
    links_already_claimed: AtomicU64,
    registry_anomalies: AtomicU64,
}

/// Kinds of events counted during a traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlEvent {
    PageFetched,
    FetchFailed,
    LinkDiscovered,
    LinkUnresolvable,
    LinkOutOfScope,
    LinkDepthBounded,
    LinkAlreadyClaimed,
    RegistryAnomaly,
}

/// Point-in-time copy of the counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrawlStatistics {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub pages_fetched: u64,
    pub fetch_failures: u64,
    pub links_discovered: u64,
    pub links_unresolvable: u64,
    pub links_out_of_scope: u64,
    pub links_depth_bounded: u64,
    pub links_already_claimed: u64,
    pub registry_anomalies: u64,
}

impl Default for CrawlStats {
    fn default() -> Self {
        Self::new()
    }
}

impl CrawlStats {
    /// Starts a new set of counters, stamped with the current time
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            pages_fetched: AtomicU64::new(0),
            fetch_failures: AtomicU64::new(0),
            links_discovered: AtomicU64::new(0),
            links_unresolvable: AtomicU64::new(0),
            links_out_of_scope: AtomicU64::new(0),
            links_depth_bounded: AtomicU64::new(0),
            links_already_claimed: AtomicU64::new(0),
            registry_anomalies: AtomicU64::new(0),
        }
    }

    /// Counts one event
    pub fn record(&self, event: CrawlEvent) {
        let counter = match event {
            CrawlEvent::PageFetched => &self.pages_fetched,
            CrawlEvent::FetchFailed => &self.fetch_failures,
            CrawlEvent::LinkDiscovered => &self.links_discovered,
            CrawlEvent::LinkUnresolvable => &self.links_unresolvable,
            CrawlEvent::LinkOutOfScope => &self.links_out_of_scope,
            CrawlEvent::LinkDepthBounded => &self.links_depth_bounded,
            CrawlEvent::LinkAlreadyClaimed => &self.links_already_claimed,
            CrawlEvent::RegistryAnomaly => &self.registry_anomalies,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Takes a snapshot, stamping the finish time
    pub fn snapshot(&self) -> CrawlStatistics {
        CrawlStatistics {
            started_at: self.started_at,
            finished_at: Utc::now(),
            pages_fetched: self.pages_fetched.load(Ordering::Relaxed),
            fetch_failures: self.fetch_failures.load(Ordering::Relaxed),
            links_discovered: self.links_discovered.load(Ordering::Relaxed),
            links_unresolvable: self.links_unresolvable.load(Ordering::Relaxed),
            links_out_of_scope: self.links_out_of_scope.load(Ordering::Relaxed),
            links_depth_bounded: self.links_depth_bounded.load(Ordering::Relaxed),
            links_already_claimed: self.links_already_claimed.load(Ordering::Relaxed),
            registry_anomalies: self.registry_anomalies.load(Ordering::Relaxed),
        }
    }
}

impl CrawlStatistics {
    /// Wall-clock duration of the traversal in milliseconds
    pub fn duration_millis(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}

/// Logs the statistics at `info` level
pub fn log_statistics(stats: &CrawlStatistics) {
    tracing::info!(
        pages_fetched = stats.pages_fetched,
        fetch_failures = stats.fetch_failures,
        duration_ms = stats.duration_millis(),
        "Crawl finished"
    );
    tracing::info!(
        discovered = stats.links_discovered,
        unresolvable = stats.links_unresolvable,
        out_of_scope = stats.links_out_of_scope,
        depth_bounded = stats.links_depth_bounded,
        already_claimed = stats.links_already_claimed,
        "Link summary"
    );

    if stats.registry_anomalies > 0 {
        tracing::error!(
            "{} page records were created more than once",
            stats.registry_anomalies
        );
    }
}
