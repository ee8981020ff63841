use crate::{UrlError, UrlResult};
use url::{ParseError, Url};

/// Resolves a discovered link against the page it was found on
///
/// # Resolution Rules
///
/// 1. Trim surrounding whitespace; an empty link is rejected
/// 2. An absolute link is canonicalized as-is
/// 3. A network-path link (exactly `//host/path`) inherits only the parent's scheme
/// 4. A link with an empty path (`?q=1`, `#top`) refers to the parent document itself
/// 5. Any other relative link is rooted at the parent's origin, never at the parent's
///    directory: `a/b` and `/a/b` both resolve to `<scheme>://<host>/a/b`. Backslashes in
///    the path count as `/`, so `\a` and `/\a` stay on the parent's host too
///
/// The result is always passed through [`canonicalize`].
///
/// # Arguments
///
/// * `parent` - Canonical address of the page the link was found on
/// * `raw` - The raw `href` attribute value
///
/// # Returns
///
/// * `Ok(Url)` - The canonical address of the link target
/// * `Err(UrlError)` - The link cannot be turned into a crawlable address
///
/// # Examples
///
/// ```
/// use maxtract::url::resolve;
/// use url::Url;
///
/// let parent = Url::parse("https://example.com/docs/intro").unwrap();
/// assert_eq!(resolve(&parent, "guide").unwrap().as_str(), "https://example.com/guide");
/// assert_eq!(resolve(&parent, "/a#b").unwrap().as_str(), "https://example.com/a");
/// ```
pub fn resolve(parent: &Url, raw: &str) -> UrlResult<Url> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(UrlError::Empty);
    }

    match Url::parse(raw) {
        Ok(url) => canonicalize(url),
        Err(ParseError::RelativeUrlWithoutBase) => resolve_relative(parent, raw),
        Err(e) => Err(UrlError::Parse(e.to_string())),
    }
}

/// Resolves a relative reference against the parent's origin
fn resolve_relative(parent: &Url, raw: &str) -> UrlResult<Url> {
    let path_end = raw.find(|c| c == '?' || c == '#').unwrap_or(raw.len());
    let (path, rest) = raw.split_at(path_end);

    let network_path = raw.starts_with("//") && !raw.starts_with("///");

    let joined = if network_path || path.is_empty() {
        parent.join(raw)
    } else {
        let path = path.replace('\\', "/");
        let rooted = format!("/{}{}", path.trim_start_matches('/'), rest);
        parent.join(&rooted)
    };

    let url = joined.map_err(|e| UrlError::Parse(e.to_string()))?;
    canonicalize(url)
}

/// Brings an absolute URL into canonical form
///
/// Only HTTP(S) addresses with a host are crawlable. The fragment is dropped; scheme,
/// host, port, path and query are kept. Host lowercasing, default-port removal and
/// dot-segment removal are already performed by the `url` parser.
pub fn canonicalize(mut url: Url) -> UrlResult<Url> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    url.set_fragment(None);
    Ok(url)
}

/// Parses the root address given on the command line
pub fn parse_root(input: &str) -> UrlResult<Url> {
    let url = Url::parse(input.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;
    canonicalize(url)
}
