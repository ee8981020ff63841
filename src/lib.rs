//! Maxtract: crawl a website and extract matching data
//!
//! This crate walks a site from a root address, follows hyperlinks up to a bounded depth
//! and collects every substring matching a pattern from each fetched page. The result is a
//! set of page records holding each page's address, outbound links and extracted matches.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Maxtract operations
#[derive(Debug, Error)]
pub enum MaxtractError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors
///
/// All of these are raised before a crawl starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid root URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid regex pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Max depth must be >= 0, got {0}")]
    InvalidDepth(i64),

    #[error("Invalid domain: {0}")]
    InvalidDomain(String),
}

/// URL-specific errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,

    #[error("Empty link")]
    Empty,
}

/// Result type alias for Maxtract operations
pub type Result<T> = std::result::Result<T, MaxtractError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::{CrawlConfig, OutputMode};
pub use crawler::{crawl, Coordinator, CrawlReport};
pub use extract::{Extractor, Pattern};
pub use state::PageRecord;
pub use crate::url::{resolve, DomainScope};
