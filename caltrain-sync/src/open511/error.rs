//! Fetch error types.

use super::endpoint::Endpoint;

/// Errors from fetching an endpoint's raw payload.
///
/// Fetches are never retried; the caller decides what a failure means.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API key rejected
    #[error("unauthorized: check API_KEY_511")]
    Unauthorized,

    /// Rate limited by the API
    #[error("rate limited by 511.org")]
    RateLimited,

    /// API returned a non-success status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Fixture source has no payload for the endpoint, or it could not be read
    #[error("fixture for {endpoint}: {message}")]
    Fixture { endpoint: Endpoint, message: String },

    /// Client could not be built from its configuration
    #[error("not configured: {0}")]
    NotConfigured(String),
}
