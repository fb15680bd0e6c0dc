//! REST document store adapter.
//!
//! Writes to a store that exposes every key path as `{base}/{path}.json`:
//! `PATCH` merges the listed children, `PUT` replaces the value. A `PATCH`
//! body may use relative paths as keys (`{"stops/70011": ...}`); the store
//! applies such a multi-location update as a whole. An auth token, when
//! configured, is passed as the `auth` query parameter.

use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use super::{DocumentStore, Fields, StoreError, segments};

/// Configuration for the REST store adapter.
#[derive(Debug, Clone)]
pub struct RestStoreConfig {
    /// Database URL, e.g. `https://example.firebaseio.com`
    pub base_url: String,
    /// Token sent as the `auth` query parameter
    pub auth_token: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl RestStoreConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            auth_token: None,
            timeout_secs: 30,
        }
    }

    /// Set the auth token.
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Document store reached over HTTP.
#[derive(Debug, Clone)]
pub struct RestStore {
    http: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
}

impl RestStore {
    pub fn new(config: RestStoreConfig) -> Result<Self, StoreError> {
        if config.base_url.is_empty() {
            return Err(StoreError::NotConfigured("empty store URL".to_string()));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth_token: config.auth_token,
        })
    }

    /// URL of the JSON document at `path`.
    pub fn url(&self, path: &str) -> String {
        let path = segments(path).collect::<Vec<_>>().join("/");
        format!("{}/{}.json", self.base_url, path)
    }

    async fn send(&self, request: reqwest::RequestBuilder, path: &str) -> Result<(), StoreError> {
        let request = match &self.auth_token {
            Some(token) => request.query(&[("auth", token)]),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Status {
                path: path.to_string(),
                status: status.as_u16(),
                message: body.chars().take(500).collect(),
            });
        }

        debug!(path, status = status.as_u16(), "store write");
        Ok(())
    }
}

impl DocumentStore for RestStore {
    async fn update(&self, path: &str, fields: Fields) -> Result<(), StoreError> {
        let request = self.http.patch(self.url(path)).json(&fields);
        self.send(request, path).await
    }

    async fn set(&self, path: &str, value: Value) -> Result<(), StoreError> {
        let request = self.http.put(self.url(path)).json(&value);
        self.send(request, path).await
    }
}
