use serde::Serialize;
use url::Url;

/// The stored result of fetching one address
///
/// Serializes as `{ "url": ..., "children": [...], "data": [...] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRecord {
    /// Canonical address of the page
    pub url: Url,

    /// Canonical addresses of every link found on the page, one entry per `href` occurrence
    pub children: Vec<Url>,

    /// Extracted matches in order of appearance, duplicates kept
    pub data: Vec<String>,
}

impl PageRecord {
    /// Creates a record with no children yet
    pub fn new(url: Url, data: Vec<String>) -> Self {
        Self {
            url,
            children: Vec::new(),
            data,
        }
    }
}
