//! HTTP fetcher implementation
//!
//! The fetcher is the traversal's only contact with the network. It turns one address
//! into a [`FetchResult`]: the page body plus every raw `href` found in it, or the reason
//! the fetch failed. Connection pooling, redirects and timeouts all belong to the
//! `reqwest` client configured here.

use crate::crawler::parser::discover_links;
use reqwest::{redirect::Policy, Client};
use std::future::Future;
use std::time::Duration;
use url::Url;

/// Default user agent sent with every request
pub const DEFAULT_USER_AGENT: &str = concat!("maxtract/", env!("CARGO_PKG_VERSION"));

/// Result of a fetch operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// HTTP status code
        status_code: u16,
        /// Page body, lossily decoded as UTF-8
        body: String,
        /// Raw `href` values of every anchor on the page, in document order
        links: Vec<String>,
    },

    /// Page is not HTML (Content-Type mismatch)
    ContentMismatch {
        /// The actual Content-Type received
        content_type: String,
    },

    /// Non-success HTTP status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

/// Source of fetched pages
///
/// Implementations must be cheap to share across tasks; the traversal holds one behind an
/// `Arc` and calls it from many tasks at once.
pub trait Fetcher: Send + Sync + 'static {
    /// Fetches one address
    fn fetch(&self, url: &Url) -> impl Future<Output = FetchResult> + Send;
}

/// Fetcher backed by a `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Builds a fetcher with the given user agent and per-request timeout
    pub fn new(user_agent: &str, request_timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(user_agent, request_timeout)?,
        })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &Url) -> impl Future<Output = FetchResult> + Send {
        fetch_url(&self.client, url)
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The `User-Agent` header value
/// * `request_timeout` - Total time allowed for a single request
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(user_agent: &str, request_timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(request_timeout)
        .connect_timeout(request_timeout.min(Duration::from_secs(10)))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and discovers the links on it
///
/// # Outcome Mapping
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx with an HTML (or missing) Content-Type | `Success` |
/// | 2xx with any other Content-Type | `ContentMismatch` |
/// | Any other status after redirects | `HttpError` |
/// | Connection, timeout or body read failure | `NetworkError` |
///
/// Nothing is retried.
pub async fn fetch_url(client: &Client, url: &Url) -> FetchResult {
    let response = match client.get(url.as_str()).send().await {
        Ok(response) => response,
        Err(e) => {
            let error = if e.is_timeout() {
                "Request timeout".to_string()
            } else if e.is_connect() {
                format!("Connection failed: {}", e)
            } else {
                e.to_string()
            };
            return FetchResult::NetworkError { error };
        }
    };

    let status = response.status();
    if !status.is_success() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !content_type.is_empty() && !content_type.contains("html") {
        return FetchResult::ContentMismatch { content_type };
    }

    match response.bytes().await {
        Ok(bytes) => {
            let body = String::from_utf8_lossy(&bytes).into_owned();
            let links = discover_links(&body);
            FetchResult::Success {
                status_code: status.as_u16(),
                body,
                links,
            }
        }
        Err(e) => FetchResult::NetworkError {
            error: e.to_string(),
        },
    }
}
