//! Maxtract main entry point
//!
//! This is the command-line interface for the Maxtract crawl-and-extract tool.

use clap::Parser;
use maxtract::config::{load_config, validate, CrawlOptions, OutputMode};
use maxtract::crawler::crawl;
use maxtract::output::render;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Maxtract: crawl a website and extract data from it
///
/// Starting at URL, Maxtract follows links up to the given depth and prints every
/// match of the given patterns found on the fetched pages. The built-in pattern
/// names `phone` and `email` may be used in place of a regular expression.
#[derive(Parser, Debug)]
#[command(name = "maxtract")]
#[command(version)]
#[command(about = "Crawl a website and extract matching data", long_about = None)]
struct Cli {
    /// Root URL to start crawling from
    #[arg(value_name = "URL")]
    url: Option<String>,

    /// Pattern to extract: phone, email or a regular expression (repeatable)
    #[arg(short, long = "pattern", value_name = "PATTERN")]
    patterns: Vec<String>,

    /// Maximum link depth from the root (0 fetches the root only)
    #[arg(short = 'd', long, value_name = "N", allow_negative_numbers = true)]
    max_depth: Option<i64>,

    /// Allowed host, e.g. "example.com" or "*.example.com" (repeatable)
    #[arg(short = 'D', long = "domain", value_name = "HOST")]
    domains: Vec<String>,

    /// Follow links to any host
    #[arg(long)]
    allow_all_domains: bool,

    /// Print only the extracted data, one match per line (default)
    #[arg(short = 'o', long, conflicts_with_all = ["full", "json", "pretty_json"])]
    data_only: bool,

    /// Print each page URL followed by its matches
    #[arg(short, long, conflicts_with_all = ["data_only", "json", "pretty_json"])]
    full: bool,

    /// Print records as compact JSON
    #[arg(short, long, conflicts_with_all = ["data_only", "full", "pretty_json"])]
    json: bool,

    /// Print records as indented JSON
    #[arg(short = 'J', long, conflicts_with_all = ["data_only", "full", "json"])]
    pretty_json: bool,

    /// Print each distinct match once (data-only output)
    #[arg(short, long)]
    unique: bool,

    /// Maximum number of concurrent fetches (1-100)
    #[arg(short, long, value_name = "N")]
    concurrency: Option<usize>,

    /// Stop the crawl after this many seconds and print what was collected
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    request_timeout: Option<u64>,

    /// User-Agent header to send
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Path to a TOML configuration file supplying defaults
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress everything but errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    /// Output mode selected by flags, if any
    fn output_mode(&self) -> Option<OutputMode> {
        if self.full {
            Some(OutputMode::Full)
        } else if self.json {
            Some(OutputMode::Json)
        } else if self.pretty_json {
            Some(OutputMode::PrettyJson)
        } else if self.data_only {
            Some(OutputMode::DataOnly)
        } else {
            None
        }
    }

    /// Converts the parsed arguments into crawl options
    ///
    /// Flags that were not given stay unset so a config file can supply them.
    fn into_options(self) -> CrawlOptions {
        let output = self.output_mode();

        CrawlOptions {
            url: self.url,
            patterns: self.patterns,
            max_depth: self.max_depth,
            domains: self.domains,
            allow_all_domains: self.allow_all_domains.then_some(true),
            output,
            unique: self.unique.then_some(true),
            concurrency: self.concurrency,
            timeout: self.timeout,
            request_timeout: self.request_timeout,
            user_agent: self.user_agent,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config_path = cli.config.clone();
    let mut options = cli.into_options();

    if let Some(path) = config_path {
        tracing::info!("Loading configuration from: {}", path.display());
        match load_config(&path) {
            Ok(file) => options = options.merge_file(file),
            Err(e) => {
                tracing::error!("Failed to load configuration: {}", e);
                return Err(e.into());
            }
        }
    }

    let config = match validate(options) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            return Err(e.into());
        }
    };

    let mode = config.output;
    let unique = config.unique;

    let report = crawl(config).await?;
    if report.timed_out {
        tracing::warn!("Crawl timed out; output is partial");
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    render(&report.records, mode, unique, &mut out)?;
    out.flush()?;

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so they never mix with extracted data. `RUST_LOG`, when set,
/// takes precedence over the flags.
fn setup_logging(verbose: u8, quiet: bool) {
    let default_filter = if quiet {
        "error"
    } else {
        match verbose {
            0 => "maxtract=warn",
            1 => "maxtract=info,warn",
            2 => "maxtract=debug,info",
            _ => "trace",
        }
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
