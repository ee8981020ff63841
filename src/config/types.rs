use crate::extract::{Extractor, Pattern};
use crate::url::DomainScope;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Default depth bound (root only)
pub const DEFAULT_MAX_DEPTH: i64 = 0;

/// Default number of concurrent fetches
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Default per-request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// How results are written to stdout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputMode {
    /// One extracted match per line
    #[default]
    DataOnly,

    /// Each page address followed by its matches
    Full,

    /// Compact JSON array of page records
    Json,

    /// Indented JSON array of page records
    PrettyJson,
}

/// Contents of an optional TOML configuration file
///
/// Every key is optional; anything left out falls back to the command line or the
/// built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub crawler: CrawlerSection,

    #[serde(default)]
    pub scope: ScopeSection,

    #[serde(default)]
    pub output: OutputSection,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct CrawlerSection {
    /// Root address to start from
    pub url: Option<String>,

    /// Pattern specifiers (`phone`, `email` or a regex)
    #[serde(default)]
    pub patterns: Vec<String>,

    /// Maximum hop distance from the root
    pub max_depth: Option<i64>,

    /// Maximum number of concurrent page fetches
    pub concurrency: Option<usize>,

    /// Whole-run time budget in seconds
    pub timeout: Option<u64>,

    /// Per-request timeout in seconds
    pub request_timeout: Option<u64>,

    pub user_agent: Option<String>,
}

/// Domain scope configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ScopeSection {
    /// Allowed host patterns (e.g., "example.com" or "*.example.com")
    #[serde(default)]
    pub domains: Vec<String>,

    pub allow_all_domains: Option<bool>,
}

/// Output configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct OutputSection {
    pub mode: Option<OutputMode>,
    pub unique: Option<bool>,
}

/// Unvalidated crawl options gathered from the command line and config file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlOptions {
    pub url: Option<String>,
    pub patterns: Vec<String>,
    pub max_depth: Option<i64>,
    pub domains: Vec<String>,
    pub allow_all_domains: Option<bool>,
    pub output: Option<OutputMode>,
    pub unique: Option<bool>,
    pub concurrency: Option<usize>,
    pub timeout: Option<u64>,
    pub request_timeout: Option<u64>,
    pub user_agent: Option<String>,
}

impl CrawlOptions {
    /// Fills every option not already set from the config file
    ///
    /// List options are taken from the file only when none were given directly.
    pub fn merge_file(mut self, file: FileConfig) -> Self {
        let FileConfig {
            crawler,
            scope,
            output,
        } = file;

        self.url = self.url.or(crawler.url);
        if self.patterns.is_empty() {
            self.patterns = crawler.patterns;
        }
        self.max_depth = self.max_depth.or(crawler.max_depth);
        self.concurrency = self.concurrency.or(crawler.concurrency);
        self.timeout = self.timeout.or(crawler.timeout);
        self.request_timeout = self.request_timeout.or(crawler.request_timeout);
        self.user_agent = self.user_agent.or(crawler.user_agent);

        if self.domains.is_empty() {
            self.domains = scope.domains;
        }
        self.allow_all_domains = self.allow_all_domains.or(scope.allow_all_domains);

        self.output = self.output.or(output.mode);
        self.unique = self.unique.or(output.unique);

        self
    }
}

/// Fully resolved, validated crawl configuration
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Canonical root address
    pub root: Url,

    /// Compiled extractor for all patterns
    pub extractor: Extractor,

    /// Patterns as given, for reporting
    pub patterns: Vec<Pattern>,

    /// Maximum hop distance from the root; 0 fetches the root only
    pub max_depth: u32,

    pub scope: DomainScope,
    pub output: OutputMode,

    /// De-duplicate data-only output
    pub unique: bool,

    /// Maximum number of concurrent fetches
    pub concurrency: usize,

    pub request_timeout: Duration,

    /// Whole-run time budget, if any
    pub run_timeout: Option<Duration>,

    pub user_agent: String,
}
