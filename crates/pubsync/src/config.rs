//! Configuration for the publication sync utility.

use std::time::Duration;

/// API configuration constants.
pub mod api {
    use std::time::Duration;

    /// Works endpoint of the OpenAlex API.
    pub const WORKS_API: &str = "https://api.openalex.org/works";

    /// Request timeout.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Delay between requests. OpenAlex allows 10 req/s; staying slightly
    /// under budget avoids 429s on long batches.
    pub const RATE_LIMIT_DELAY: Duration = Duration::from_millis(110);

    /// Retry budget for transient failures before a lookup counts as failed.
    pub const MAX_RETRIES: u32 = 2;

    /// Maximum keepalive connections.
    pub const MAX_KEEPALIVE: usize = 10;

    /// Keepalive expiry.
    pub const KEEPALIVE_EXPIRY: Duration = Duration::from_secs(30);
}

/// Work field sets for the OpenAlex `select` parameter.
pub mod fields {
    /// Minimal fields for a citation count refresh.
    pub const CITATION: &[&str] = &["id", "doi", "cited_by_count", "updated_date"];

    /// Full fields needed to build a new publication record.
    pub const DISCOVERY: &[&str] = &[
        "id",
        "title",
        "doi",
        "primary_location",
        "authorships",
        "publication_year",
        "publication_date",
        "ids",
        "best_oa_location",
        "cited_by_count",
        "cited_by_api_url",
        "type",
        "type_crossref",
        "updated_date",
    ];
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Email for the OpenAlex polite pool (optional but recommended).
    pub mailto: Option<String>,

    /// Base URL for the works API (overridable for testing with mock servers).
    pub works_api_url: String,

    /// Request timeout.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Delay between requests.
    pub rate_limit_delay: Duration,

    /// Retry budget for transient failures.
    pub max_retries: u32,
}

impl Config {
    /// Create a new configuration with an optional polite-pool email.
    #[must_use]
    pub fn new(mailto: Option<String>) -> Self {
        Self {
            mailto,
            works_api_url: api::WORKS_API.to_string(),
            request_timeout: api::REQUEST_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
            rate_limit_delay: api::RATE_LIMIT_DELAY,
            max_retries: api::MAX_RETRIES,
        }
    }

    /// Create a test configuration pointed at a mock server.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            mailto: None,
            works_api_url: format!("{}/works", base_url),
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            rate_limit_delay: Duration::from_millis(0), // No delay in tests
            max_retries: 0,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Reads `EMAIL` for the polite pool, matching the original site tooling.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(std::env::var("EMAIL").ok())
    }

    /// Check if a polite-pool email is configured.
    #[must_use]
    pub const fn has_mailto(&self) -> bool {
        self.mailto.is_some()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.mailto.is_none());
        assert!(!config.has_mailto());
        assert_eq!(config.works_api_url, api::WORKS_API);
    }

    #[test]
    fn test_config_with_mailto() {
        let config = Config::new(Some("me@example.org".to_string()));
        assert!(config.has_mailto());
        assert_eq!(config.mailto.as_deref(), Some("me@example.org"));
    }

    #[test]
    fn test_config_for_testing_points_at_mock() {
        let config = Config::for_testing("http://127.0.0.1:9999");
        assert_eq!(config.works_api_url, "http://127.0.0.1:9999/works");
        assert_eq!(config.rate_limit_delay, Duration::from_millis(0));
    }

    #[test]
    fn test_fields() {
        assert!(fields::CITATION.contains(&"cited_by_count"));
        assert!(fields::DISCOVERY.contains(&"authorships"));
        assert!(fields::DISCOVERY.contains(&"type"));
    }
}
