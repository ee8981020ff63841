//! Configuration module for Maxtract
//!
//! Options come from the command line and, optionally, a TOML file. They are merged
//! into [`CrawlOptions`] and validated into a [`CrawlConfig`] before anything is fetched.
//!
//! # Example
//!
//! ```
//! use maxtract::config::{validate, CrawlOptions};
//!
//! let options = CrawlOptions {
//!     url: Some("https://example.com".to_string()),
//!     patterns: vec!["email".to_string()],
//!     max_depth: Some(2),
//!     ..Default::default()
//! };
//! let config = validate(options).unwrap();
//! assert_eq!(config.max_depth, 2);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CrawlConfig, CrawlOptions, CrawlerSection, FileConfig, OutputMode, OutputSection,
    ScopeSection, DEFAULT_CONCURRENCY, DEFAULT_MAX_DEPTH, DEFAULT_REQUEST_TIMEOUT_SECS,
};

pub use parser::load_config;
pub use validation::validate;
