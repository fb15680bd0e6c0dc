//! 511.org HTTP client.
//!
//! Fetches raw JSON bodies from the transit endpoints. Authentication is an
//! `api_key` query parameter; every request also names the operator and
//! asks for JSON. Parsing is left to [`super::parse`].

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tracing::debug;

use super::endpoint::Endpoint;
use super::error::FetchError;

/// Default base URL for the 511.org transit API.
pub const DEFAULT_BASE_URL: &str = "http://api.511.org/transit";

/// Operator code for Caltrain.
pub const CALTRAIN_OPERATOR_ID: &str = "CT";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// A source of raw endpoint payloads.
///
/// This is the boundary to the outside world for reads: implementations
/// return the response body as text and nothing else.
pub trait TransitSource {
    /// Fetch the raw JSON body of `endpoint`.
    fn fetch(&self, endpoint: Endpoint) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// Configuration for the 511.org client.
#[derive(Debug, Clone)]
pub struct Open511Config {
    /// API key issued by 511.org
    pub api_key: String,
    /// Base URL for the API (defaults to production)
    pub base_url: String,
    /// Operator whose data is requested
    pub operator_id: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Open511Config {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            operator_id: CALTRAIN_OPERATOR_ID.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the operator code.
    pub fn with_operator_id(mut self, operator_id: impl Into<String>) -> Self {
        self.operator_id = operator_id.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// 511.org transit API client.
///
/// Uses a semaphore to limit concurrent requests.
#[derive(Debug, Clone)]
pub struct Open511Client {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    operator_id: String,
    semaphore: Arc<Semaphore>,
}

impl Open511Client {
    /// Create a new client with the given configuration.
    pub fn new(config: Open511Config) -> Result<Self, FetchError> {
        if config.api_key.is_empty() {
            return Err(FetchError::NotConfigured("empty API key".to_string()));
        }
        if config.max_concurrent == 0 {
            return Err(FetchError::NotConfigured(
                "max_concurrent must be at least 1".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
            operator_id: config.operator_id,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    /// Full URL of an endpoint, without query parameters.
    pub fn url(&self, endpoint: Endpoint) -> String {
        format!("{}/{}", self.base_url, endpoint.path())
    }

    /// Query parameters sent with every request to `endpoint`.
    fn query(&self, endpoint: Endpoint) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("api_key", self.api_key.clone()),
            ("operator_id", self.operator_id.clone()),
            ("format", "json".to_string()),
        ];
        query.extend(endpoint.query(&self.operator_id));
        query
    }
}

impl TransitSource for Open511Client {
    async fn fetch(&self, endpoint: Endpoint) -> Result<String, FetchError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| FetchError::NotConfigured("semaphore closed".to_string()))?;

        let url = self.url(endpoint);
        debug!(%endpoint, %url, "fetching");

        let response = self
            .http
            .get(&url)
            .query(&self.query(endpoint))
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(FetchError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(FetchError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Api {
                status: status.as_u16(),
                message: body.chars().take(500).collect(),
            });
        }

        let body = response.text().await?;
        debug!(%endpoint, bytes = body.len(), "fetched");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LineType;

    #[test]
    fn config_builder() {
        let config = Open511Config::new("test-key")
            .with_base_url("http://localhost:8080")
            .with_operator_id("SF")
            .with_max_concurrent(10)
            .with_timeout(60);

        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.operator_id, "SF");
        assert_eq!(config.max_concurrent, 10);
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn config_defaults() {
        let config = Open511Config::new("test-key");

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.operator_id, "CT");
        assert_eq!(config.max_concurrent, DEFAULT_MAX_CONCURRENT);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn client_creation() {
        assert!(Open511Client::new(Open511Config::new("test-key")).is_ok());
        assert!(matches!(
            Open511Client::new(Open511Config::new("")),
            Err(FetchError::NotConfigured(_))
        ));
        assert!(Open511Client::new(Open511Config::new("k").with_max_concurrent(0)).is_err());
    }

    #[test]
    fn urls_and_query() {
        let client =
            Open511Client::new(Open511Config::new("secret").with_base_url("http://example.test/transit/"))
                .unwrap();

        assert_eq!(
            client.url(Endpoint::StopPlaces),
            "http://example.test/transit/stopPlaces"
        );

        let query = client.query(Endpoint::Timetable(LineType::Limited));
        assert!(query.contains(&("api_key", "secret".to_string())));
        assert!(query.contains(&("operator_id", "CT".to_string())));
        assert!(query.contains(&("format", "json".to_string())));
        assert!(query.contains(&("line_id", "Limited".to_string())));

        let query = client.query(Endpoint::StopMonitoring);
        assert!(query.contains(&("agency", "CT".to_string())));
    }

    // Live requests need a real API key; exercise the client against the
    // fixture source instead.
}
