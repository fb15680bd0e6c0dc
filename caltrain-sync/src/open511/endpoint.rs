//! The upstream endpoints a sync cycle reads.

use std::fmt;

use crate::domain::LineType;

/// One 511.org transit endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `/stopPlaces`: every platform of the operator.
    StopPlaces,
    /// `/timetable`: routes and train runs of one line type.
    Timetable(LineType),
    /// `/holidays`: day types and per-date availability overrides.
    Holidays,
    /// `/StopMonitoring`: live predictions for every stop of the operator.
    StopMonitoring,
}

impl Endpoint {
    /// Path relative to the API base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::StopPlaces => "stopPlaces",
            Endpoint::Timetable(_) => "timetable",
            Endpoint::Holidays => "holidays",
            Endpoint::StopMonitoring => "StopMonitoring",
        }
    }

    /// Endpoint-specific query parameters, on top of the common ones.
    ///
    /// `operator_id` is the agency code, which `/StopMonitoring` takes
    /// under a different name.
    pub fn query(&self, operator_id: &str) -> Vec<(&'static str, String)> {
        match self {
            Endpoint::Timetable(line) => vec![("line_id", line.api_id().to_string())],
            Endpoint::StopMonitoring => vec![("agency", operator_id.to_string())],
            Endpoint::StopPlaces | Endpoint::Holidays => Vec::new(),
        }
    }

    /// File name used for this endpoint's payload in a fixture directory.
    pub fn fixture_name(&self) -> String {
        match self {
            Endpoint::StopPlaces => "stop_places.json".to_string(),
            Endpoint::Timetable(line) => {
                format!("timetable_{}.json", line.as_str().to_ascii_lowercase())
            }
            Endpoint::Holidays => "holidays.json".to_string(),
            Endpoint::StopMonitoring => "stop_monitoring.json".to_string(),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Timetable(line) => write!(f, "timetable({line})"),
            other => f.write_str(other.path()),
        }
    }
}
