use url::{Host, Url};

/// Which hosts a traversal may dispatch fetches to
///
/// The scope is fixed at configuration time. A discovered link outside the scope is still
/// recorded as a child of the page it was found on, it is simply never fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainScope {
    /// Only the root address's host (the default)
    RootHost(String),

    /// An explicit list of host patterns; the root host is always a member
    AllowList(Vec<String>),

    /// Any host (explicit opt-in)
    Unrestricted,
}

impl DomainScope {
    /// Builds the scope from the command-line style inputs
    ///
    /// An explicit host list wins over `allow_all`. Host patterns are brought into the
    /// ASCII form `Url::host_str` reports and the root host is appended to the list when
    /// not already covered by it.
    pub fn new(root: &Url, domains: &[String], allow_all: bool) -> Self {
        let root_host = root.host_str().unwrap_or_default().to_lowercase();

        if !domains.is_empty() {
            let mut hosts: Vec<String> = domains.iter().map(|d| ascii_pattern(d)).collect();
            if !hosts.iter().any(|pattern| host_matches(pattern, &root_host)) {
                hosts.push(root_host);
            }
            return Self::AllowList(hosts);
        }

        if allow_all {
            Self::Unrestricted
        } else {
            Self::RootHost(root_host)
        }
    }

    /// Returns true if the address may be fetched under this scope
    pub fn allows(&self, url: &Url) -> bool {
        match url.host_str() {
            Some(host) => self.allows_host(host),
            None => false,
        }
    }

    /// Returns true if the host may be fetched under this scope
    pub fn allows_host(&self, host: &str) -> bool {
        let host = host.to_lowercase();
        match self {
            Self::RootHost(root) => *root == host,
            Self::AllowList(patterns) => patterns.iter().any(|p| host_matches(p, &host)),
            Self::Unrestricted => true,
        }
    }
}

/// Lowercases a host pattern and converts internationalized names to punycode
///
/// A `*.` prefix is kept. A pattern the host parser rejects is only lowercased.
fn ascii_pattern(pattern: &str) -> String {
    let pattern = pattern.trim().to_lowercase();
    let (wildcard, base) = match pattern.strip_prefix("*.") {
        Some(base) => ("*.", base),
        None => ("", pattern.as_str()),
    };

    match Host::parse(base) {
        Ok(host) => format!("{}{}", wildcard, host),
        Err(_) => pattern.clone(),
    }
}

/// Checks a lowercase host against a host pattern
///
/// `example.com` matches only itself. `*.example.com` matches `example.com` and any
/// subdomain of it, however deeply nested.
///
/// # Examples
///
/// ```
/// use maxtract::url::host_matches;
///
/// assert!(host_matches("example.com", "example.com"));
/// assert!(host_matches("*.example.com", "blog.example.com"));
/// assert!(!host_matches("*.example.com", "myexample.com"));
/// ```
pub fn host_matches(pattern: &str, host: &str) -> bool {
    match pattern.strip_prefix("*.") {
        Some(base) => {
            host == base
                || host
                    .strip_suffix(base)
                    .map_or(false, |prefix| prefix.ends_with('.'))
        }
        None => host == pattern,
    }
}
