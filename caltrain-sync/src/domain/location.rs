//! Geographic coordinates.

use serde::Serialize;

/// A point on the map, in degrees.
///
/// A stop either has a full location or none at all; there is no
/// half-populated form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}
