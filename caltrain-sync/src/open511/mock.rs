//! Fixture source for running without 511.org access.
//!
//! Loads recorded endpoint payloads from a directory and serves them as if
//! they were live responses.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::domain::LineType;

use super::client::TransitSource;
use super::endpoint::Endpoint;
use super::error::FetchError;

/// Every endpoint a fixture directory may hold a payload for.
fn known_endpoints() -> impl Iterator<Item = Endpoint> {
    [Endpoint::StopPlaces, Endpoint::Holidays, Endpoint::StopMonitoring]
        .into_iter()
        .chain(LineType::ALL.into_iter().map(Endpoint::Timetable))
}

/// Source that serves recorded payloads, keyed by endpoint.
///
/// Endpoints without a payload fail with [`FetchError::Fixture`], which
/// makes it easy to simulate one failing timetable.
#[derive(Clone, Default)]
pub struct FixtureSource {
    bodies: Arc<HashMap<Endpoint, String>>,
}

impl FixtureSource {
    /// An empty source; add payloads with [`FixtureSource::with`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Load payloads from a directory.
    ///
    /// Expects files named after [`Endpoint::fixture_name`] (e.g.
    /// `stop_places.json`, `timetable_local.json`). Missing files are
    /// skipped; a directory with none of them is an error.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, FetchError> {
        let dir = dir.as_ref();
        let mut bodies = HashMap::new();

        for endpoint in known_endpoints() {
            let path = dir.join(endpoint.fixture_name());
            if !path.is_file() {
                continue;
            }
            let body = std::fs::read_to_string(&path).map_err(|e| FetchError::Fixture {
                endpoint,
                message: format!("failed to read {}: {e}", path.display()),
            })?;
            debug!(%endpoint, path = %path.display(), "loaded fixture");
            bodies.insert(endpoint, body);
        }

        if bodies.is_empty() {
            return Err(FetchError::Fixture {
                endpoint: Endpoint::StopPlaces,
                message: format!("no fixture files found in {}", dir.display()),
            });
        }

        Ok(Self {
            bodies: Arc::new(bodies),
        })
    }

    /// Add or replace the payload for an endpoint.
    pub fn with(mut self, endpoint: Endpoint, body: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.bodies).insert(endpoint, body.into());
        self
    }

    /// Endpoints this source has a payload for.
    pub fn available(&self) -> Vec<Endpoint> {
        self.bodies.keys().copied().collect()
    }
}

impl TransitSource for FixtureSource {
    async fn fetch(&self, endpoint: Endpoint) -> Result<String, FetchError> {
        self.bodies
            .get(&endpoint)
            .cloned()
            .ok_or_else(|| FetchError::Fixture {
                endpoint,
                message: "no payload recorded".to_string(),
            })
    }
}
