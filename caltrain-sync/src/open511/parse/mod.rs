//! Conversion from 511.org payloads to domain types.
//!
//! Each endpoint is parsed in two steps: the JSON text is decoded into the
//! DTOs in [`super::types`], then the DTOs are walked and every required
//! field is checked. A failure names the endpoint and the full field path,
//! e.g. `timetable(LOCAL): missing required field
//! Content.ServiceFrame.routes.Route[3].LineRef.ref`.
//!
//! All functions here are pure.

mod holidays;
mod predictions;
mod stops;
mod timetable;

use std::fmt;

use serde::de::DeserializeOwned;

use super::endpoint::Endpoint;
use super::types::Ref;

pub use holidays::{Holidays, parse_holidays};
pub use predictions::parse_stop_monitoring;
pub use stops::parse_stop_places;
pub use timetable::parse_timetable;

/// A payload did not have the shape the parser requires.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PayloadError {
    /// The body is not valid JSON, or a field has an unexpected JSON type.
    #[error("{endpoint}: invalid JSON: {message}")]
    Json { endpoint: Endpoint, message: String },

    /// A required field is absent or null.
    #[error("{endpoint}: missing required field {path}")]
    MissingField { endpoint: Endpoint, path: String },

    /// A field is present but its value cannot be used.
    #[error("{endpoint}: invalid value at {path}: {reason}")]
    InvalidField {
        endpoint: Endpoint,
        path: String,
        reason: String,
    },
}

/// Decode a response body into endpoint DTOs.
///
/// 511.org prefixes its bodies with a UTF-8 byte-order mark, which is
/// stripped along with surrounding whitespace.
pub fn decode<T: DeserializeOwned>(endpoint: Endpoint, body: &str) -> Result<T, PayloadError> {
    let body = body.trim_start_matches('\u{feff}').trim();
    serde_json::from_str(body).map_err(|e| PayloadError::Json {
        endpoint,
        message: e.to_string(),
    })
}

/// Location of a field inside a payload, for error reporting.
#[derive(Debug, Clone)]
pub(crate) struct FieldPath {
    endpoint: Endpoint,
    path: String,
}

impl FieldPath {
    pub(crate) fn root(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            path: String::new(),
        }
    }

    /// Path to a named child field.
    pub(crate) fn field(&self, name: &str) -> Self {
        let path = if self.path.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", self.path, name)
        };
        Self {
            endpoint: self.endpoint,
            path,
        }
    }

    /// Path to an element of a repeated field.
    pub(crate) fn index(&self, idx: usize) -> Self {
        Self {
            endpoint: self.endpoint,
            path: format!("{}[{}]", self.path, idx),
        }
    }

    pub(crate) fn missing(&self) -> PayloadError {
        PayloadError::MissingField {
            endpoint: self.endpoint,
            path: self.path.clone(),
        }
    }

    pub(crate) fn invalid(&self, reason: impl fmt::Display) -> PayloadError {
        PayloadError::InvalidField {
            endpoint: self.endpoint,
            path: self.path.clone(),
            reason: reason.to_string(),
        }
    }

    /// Require an optional value, reporting this path if it is absent.
    pub(crate) fn require<'a, T>(&self, value: Option<&'a T>) -> Result<&'a T, PayloadError> {
        value.ok_or_else(|| self.missing())
    }

    /// Require a NeTEx reference's `ref` value.
    ///
    /// `self` is the path of the reference object itself.
    pub(crate) fn require_ref<'a>(&self, value: Option<&'a Ref>) -> Result<&'a str, PayloadError> {
        let reference = self.require(value)?;
        self.field("ref")
            .require(reference.reference.as_ref())
            .map(String::as_str)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}
