//! OpenAlex API client.
//!
//! Provides an async HTTP client with:
//! - Connection pooling via reqwest
//! - Retry middleware with exponential backoff for transient failures
//! - Fixed-delay rate limiting (OpenAlex allows 10 req/s)
//! - Identifier normalization for PMID, PMCID, DOI, and OpenAlex IDs

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};

use crate::config::{Config, api};
use crate::error::{ClientError, ClientResult};
use crate::models::Work;

/// DOI pattern, e.g. `10.1186/s12967-023-04576-8`.
static DOI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^10\.\d{1,9}/[-._;()/:A-Za-z0-9]+$").expect("valid DOI regex"));

/// OpenAlex works API client.
#[derive(Clone)]
pub struct OpenAlexClient {
    /// HTTP client with retry middleware.
    client: ClientWithMiddleware,

    /// Polite-pool email, sent as `mailto`.
    mailto: Option<String>,

    /// Works API base URL.
    works_api_url: String,

    /// Delay before each request.
    rate_limit_delay: Duration,
}

impl OpenAlexClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            "application/json".parse().expect("valid accept header"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(api::MAX_KEEPALIVE)
            .pool_idle_timeout(api::KEEPALIVE_EXPIRY)
            .gzip(true)
            .build()?;

        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(Duration::from_secs(1), Duration::from_secs(10))
            .build_with_max_retries(config.max_retries);

        let client = ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            client,
            mailto: config.mailto,
            works_api_url: config.works_api_url,
            rate_limit_delay: config.rate_limit_delay,
        })
    }

    /// Check if a polite-pool email is configured.
    #[must_use]
    pub fn has_mailto(&self) -> bool {
        self.mailto.is_some()
    }

    /// Fetch a single work by identifier, requesting only the given fields.
    ///
    /// Accepts PMIDs, PMCIDs, DOIs, and OpenAlex IDs, with or without their
    /// URL prefixes.
    ///
    /// # Errors
    ///
    /// Returns error on an unrecognized identifier or API failure.
    pub async fn get_work(&self, id: &str, fields: &[&str]) -> ClientResult<Work> {
        let url = self.work_url(id)?;

        let mut params = vec![("select".to_string(), fields.join(","))];
        if let Some(ref mailto) = self.mailto {
            params.push(("mailto".to_string(), mailto.clone()));
        }

        // Rate limit
        tokio::time::sleep(self.rate_limit_delay).await;

        tracing::debug!(id, url = %url, "fetching work");
        let response = self.client.get(url.as_str()).query(&params).send().await?;

        let response = self.handle_response(response).await?;
        let value: serde_json::Value = response.json().await?;

        serde_json::from_value(value).map_err(ClientError::from)
    }

    /// Build the works endpoint URL for one identifier.
    fn work_url(&self, id: &str) -> ClientResult<String> {
        let id = normalize_id(id);
        let base = &self.works_api_url;

        if DOI_RE.is_match(&id) {
            Ok(format!("{base}/https://doi.org/{id}"))
        } else if !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()) {
            Ok(format!("{base}/pmid:{id}"))
        } else if id.starts_with("PMC") {
            Ok(format!("{base}/pmcid:{id}"))
        } else if id.starts_with('W') {
            Ok(format!("{base}/{id}"))
        } else {
            Err(ClientError::invalid_id(id))
        }
    }

    /// Handle API response status codes.
    async fn handle_response(
        &self,
        response: reqwest::Response,
    ) -> ClientResult<reqwest::Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        match status.as_u16() {
            429 => {
                let retry_after = response
                    .headers()
                    .get("Retry-After")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(60);

                Err(ClientError::rate_limited(retry_after))
            }
            404 => {
                let text = response.text().await.unwrap_or_default();
                Err(ClientError::not_found(text))
            }
            400 => {
                let text = response.text().await.unwrap_or_default();
                Err(ClientError::bad_request(text))
            }
            500..=599 => {
                let text = response.text().await.unwrap_or_default();
                Err(ClientError::server(status.as_u16(), text))
            }
            _ => {
                let text = response.text().await.unwrap_or_default();
                Err(ClientError::UnexpectedStatus { status: status.as_u16(), message: text })
            }
        }
    }
}

/// Strip URL prefixes so bare IDs and canonical URLs resolve the same way.
fn normalize_id(id: &str) -> String {
    let id = id.trim();
    if id.starts_with("https://openalex.org/") || id.starts_with("https://api.openalex.org/") {
        return id.rsplit('/').next().unwrap_or_default().to_string();
    }
    if let Some(doi) = id.strip_prefix("https://doi.org/") {
        return doi.to_string();
    }
    id.to_string()
}

impl std::fmt::Debug for OpenAlexClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAlexClient")
            .field("works_api_url", &self.works_api_url)
            .field("has_mailto", &self.has_mailto())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> OpenAlexClient {
        OpenAlexClient::new(Config::for_testing("http://mock")).unwrap()
    }

    #[test]
    fn test_work_url_pmid() {
        let client = test_client();
        assert_eq!(client.work_url("38857748").unwrap(), "http://mock/works/pmid:38857748");
    }

    #[test]
    fn test_work_url_pmcid() {
        let client = test_client();
        assert_eq!(client.work_url("PMC9046468").unwrap(), "http://mock/works/pmcid:PMC9046468");
    }

    #[test]
    fn test_work_url_doi() {
        let client = test_client();
        assert_eq!(
            client.work_url("10.1186/s12967-023-04576-8").unwrap(),
            "http://mock/works/https://doi.org/10.1186/s12967-023-04576-8"
        );
    }

    #[test]
    fn test_work_url_openalex_id_and_urls() {
        let client = test_client();
        assert_eq!(client.work_url("W1997963236").unwrap(), "http://mock/works/W1997963236");
        assert_eq!(
            client.work_url("https://openalex.org/W1997963236").unwrap(),
            "http://mock/works/W1997963236"
        );
        assert_eq!(
            client.work_url("https://doi.org/10.1234/abc").unwrap(),
            "http://mock/works/https://doi.org/10.1234/abc"
        );
    }

    #[test]
    fn test_work_url_rejects_garbage() {
        let client = test_client();
        assert!(matches!(client.work_url("not-an-id"), Err(ClientError::InvalidId { .. })));
        assert!(matches!(client.work_url(""), Err(ClientError::InvalidId { .. })));
    }

    #[test]
    fn test_debug_output_shape() {
        let client = test_client();
        let debug = format!("{client:?}");
        assert!(debug.contains("works_api_url"));
        assert!(debug.contains("has_mailto"));
    }
}
