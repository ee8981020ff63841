use crate::config::types::{
    CrawlConfig, CrawlOptions, DEFAULT_CONCURRENCY, DEFAULT_MAX_DEPTH,
    DEFAULT_REQUEST_TIMEOUT_SECS,
};
use crate::crawler::DEFAULT_USER_AGENT;
use crate::extract::{Extractor, Pattern};
use crate::url::{parse_root, DomainScope};
use crate::{ConfigError, ConfigResult};
use std::time::Duration;

/// Validates merged options and resolves them into a [`CrawlConfig`]
///
/// Everything that can be rejected is rejected here, before any network activity.
pub fn validate(options: CrawlOptions) -> ConfigResult<CrawlConfig> {
    let raw_url = options
        .url
        .ok_or_else(|| ConfigError::Validation("A root URL is required".to_string()))?;
    let root = parse_root(&raw_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("'{}': {}", raw_url, e)))?;

    let patterns: Vec<Pattern> = options
        .patterns
        .iter()
        .map(|p| Pattern::from(p.as_str()))
        .collect();
    let extractor = Extractor::new(&patterns)?;

    let max_depth = validate_depth(options.max_depth.unwrap_or(DEFAULT_MAX_DEPTH))?;

    let concurrency = options.concurrency.unwrap_or(DEFAULT_CONCURRENCY);
    if !(1..=100).contains(&concurrency) {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and 100, got {}",
            concurrency
        )));
    }

    let request_timeout = options
        .request_timeout
        .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
    if request_timeout == 0 {
        return Err(ConfigError::Validation(
            "request-timeout must be > 0".to_string(),
        ));
    }

    let run_timeout = match options.timeout {
        Some(0) => {
            return Err(ConfigError::Validation("timeout must be > 0".to_string()));
        }
        Some(secs) => Some(Duration::from_secs(secs)),
        None => None,
    };

    for domain in &options.domains {
        validate_domain_pattern(domain)?;
    }
    let allow_all = options.allow_all_domains.unwrap_or(false);
    if allow_all && !options.domains.is_empty() {
        tracing::warn!("--allow-all-domains is ignored when an explicit domain list is given");
    }
    let scope = DomainScope::new(&root, &options.domains, allow_all);

    let user_agent = match options.user_agent {
        Some(ua) if ua.trim().is_empty() => {
            return Err(ConfigError::Validation(
                "user-agent cannot be empty".to_string(),
            ));
        }
        Some(ua) => ua,
        None => DEFAULT_USER_AGENT.to_string(),
    };

    Ok(CrawlConfig {
        root,
        extractor,
        patterns,
        max_depth,
        scope,
        output: options.output.unwrap_or_default(),
        unique: options.unique.unwrap_or(false),
        concurrency,
        request_timeout: Duration::from_secs(request_timeout),
        run_timeout,
        user_agent,
    })
}

/// Validates the depth bound
fn validate_depth(depth: i64) -> ConfigResult<u32> {
    if depth < 0 {
        return Err(ConfigError::InvalidDepth(depth));
    }

    u32::try_from(depth)
        .map_err(|_| ConfigError::Validation(format!("max-depth {} is too large", depth)))
}

/// Validates a domain pattern (supports wildcards)
fn validate_domain_pattern(pattern: &str) -> ConfigResult<()> {
    let pattern = pattern.trim();
    if pattern.is_empty() {
        return Err(ConfigError::InvalidDomain(
            "Domain pattern cannot be empty".to_string(),
        ));
    }

    // Check if it's a wildcard pattern
    if let Some(domain) = pattern.strip_prefix("*.") {
        validate_domain_string(domain)
    } else {
        validate_domain_string(pattern)
    }
}

/// Validates a host name (without wildcard prefix)
///
/// Single-label hosts such as `localhost` are accepted; ports are not.
fn validate_domain_string(domain: &str) -> ConfigResult<()> {
    if domain.is_empty() {
        return Err(ConfigError::InvalidDomain(
            "Domain cannot be empty".to_string(),
        ));
    }

    if !domain
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::InvalidDomain(format!(
            "'{}' contains invalid characters",
            domain
        )));
    }

    if domain.starts_with('.')
        || domain.ends_with('.')
        || domain.starts_with('-')
        || domain.ends_with('-')
    {
        return Err(ConfigError::InvalidDomain(format!(
            "'{}' cannot start or end with '.' or '-'",
            domain
        )));
    }

    if domain.contains("..") {
        return Err(ConfigError::InvalidDomain(format!(
            "'{}' cannot contain consecutive dots",
            domain
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputMode;

    fn options(url: &str, patterns: &[&str]) -> CrawlOptions {
        CrawlOptions {
            url: Some(url.to_string()),
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = validate(options("https://example.com", &["email"])).unwrap();

        assert_eq!(config.root.as_str(), "https://example.com/");
        assert_eq!(config.max_depth, 0);
        assert_eq!(config.concurrency, DEFAULT_CONCURRENCY);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.run_timeout, None);
        assert_eq!(config.output, OutputMode::DataOnly);
        assert!(!config.unique);
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(
            config.scope,
            DomainScope::RootHost("example.com".to_string())
        );
        assert_eq!(config.patterns, vec![Pattern::Email]);
    }

    #[test]
    fn test_missing_url() {
        let mut opts = options("https://example.com", &["email"]);
        opts.url = None;
        assert!(matches!(validate(opts), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_invalid_root_url() {
        for url in ["not a url", "ftp://example.com/", "/relative"] {
            assert!(
                matches!(validate(options(url, &["email"])), Err(ConfigError::InvalidUrl(_))),
                "{} should be rejected",
                url
            );
        }
    }

    #[test]
    fn test_invalid_pattern_fails_fast() {
        let result = validate(options("https://example.com", &["email", "([a-z"]));
        match result {
            Err(ConfigError::InvalidPattern { pattern, .. }) => assert_eq!(pattern, "([a-z"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_no_patterns() {
        assert!(matches!(
            validate(options("https://example.com", &[])),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_negative_depth() {
        let mut opts = options("https://example.com", &["email"]);
        opts.max_depth = Some(-1);
        assert!(matches!(validate(opts), Err(ConfigError::InvalidDepth(-1))));
    }

    #[test]
    fn test_concurrency_bounds() {
        for (value, ok) in [(0, false), (1, true), (100, true), (101, false)] {
            let mut opts = options("https://example.com", &["email"]);
            opts.concurrency = Some(value);
            assert_eq!(validate(opts).is_ok(), ok, "concurrency {}", value);
        }
    }

    #[test]
    fn test_zero_timeouts_rejected() {
        let mut opts = options("https://example.com", &["email"]);
        opts.timeout = Some(0);
        assert!(validate(opts).is_err());

        let mut opts = options("https://example.com", &["email"]);
        opts.request_timeout = Some(0);
        assert!(validate(opts).is_err());

        let mut opts = options("https://example.com", &["email"]);
        opts.timeout = Some(60);
        assert_eq!(
            validate(opts).unwrap().run_timeout,
            Some(Duration::from_secs(60))
        );
    }

    #[test]
    fn test_domain_list_builds_allow_list() {
        let mut opts = options("https://example.com", &["email"]);
        opts.domains = vec!["*.Example.org".to_string()];
        opts.allow_all_domains = Some(true);

        let config = validate(opts).unwrap();
        assert_eq!(
            config.scope,
            DomainScope::AllowList(vec!["*.example.org".to_string(), "example.com".to_string()])
        );
    }

    #[test]
    fn test_allow_all_domains() {
        let mut opts = options("https://example.com", &["email"]);
        opts.allow_all_domains = Some(true);
        assert_eq!(validate(opts).unwrap().scope, DomainScope::Unrestricted);
    }

    #[test]
    fn test_validate_domain_pattern() {
        assert!(validate_domain_pattern("example.com").is_ok());
        assert!(validate_domain_pattern("*.example.com").is_ok());
        assert!(validate_domain_pattern("sub.example.com").is_ok());
        assert!(validate_domain_pattern("localhost").is_ok());

        assert!(validate_domain_pattern("").is_err());
        assert!(validate_domain_pattern("*.").is_err());
        assert!(validate_domain_pattern(".example.com").is_err());
        assert!(validate_domain_pattern("example.com.").is_err());
        assert!(validate_domain_pattern("example..com").is_err());
        assert!(validate_domain_pattern("example.com:8080").is_err());
    }

    #[test]
    fn test_empty_user_agent_rejected() {
        let mut opts = options("https://example.com", &["email"]);
        opts.user_agent = Some("  ".to_string());
        assert!(validate(opts).is_err());
    }
}
