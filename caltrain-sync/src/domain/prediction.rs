//! Real-time arrival and departure predictions.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A predicted arrival or departure of one vehicle at one stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredictedEvent {
    pub stop_id: String,
    pub vehicle_id: String,

    /// Timetabled time, if the feed gave one.
    pub scheduled_time: Option<DateTime<Utc>>,

    /// Live estimate; falls back to `scheduled_time` when the feed has no
    /// estimate. `None` only when neither is known.
    pub expected_time: Option<DateTime<Utc>>,
}

impl PredictedEvent {
    /// Create an event, falling back to the scheduled time for the estimate.
    pub fn new(
        stop_id: impl Into<String>,
        vehicle_id: impl Into<String>,
        scheduled_time: Option<DateTime<Utc>>,
        expected_time: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            stop_id: stop_id.into(),
            vehicle_id: vehicle_id.into(),
            scheduled_time,
            expected_time: expected_time.or(scheduled_time),
        }
    }
}

/// Predicted events at one stop.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StopPredictions {
    pub arrivals: Vec<PredictedEvent>,
    pub departures: Vec<PredictedEvent>,
}

/// All predictions from one monitoring response, grouped by stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredictionsSnapshot {
    pub updated_at: DateTime<Utc>,
    pub stops: BTreeMap<String, StopPredictions>,
}

impl PredictionsSnapshot {
    /// Build a snapshot from `(arrival, departure)` pairs, one per visit.
    ///
    /// Events are grouped under their own stop id, in input order.
    pub fn from_visits(
        updated_at: DateTime<Utc>,
        visits: impl IntoIterator<Item = (PredictedEvent, PredictedEvent)>,
    ) -> Self {
        let stops = visits.into_iter().fold(
            BTreeMap::<String, StopPredictions>::new(),
            |mut stops, (arrival, departure)| {
                stops
                    .entry(arrival.stop_id.clone())
                    .or_default()
                    .arrivals
                    .push(arrival);
                stops
                    .entry(departure.stop_id.clone())
                    .or_default()
                    .departures
                    .push(departure);
                stops
            },
        );

        Self { updated_at, stops }
    }

    /// Predictions at `stop_id`, if any.
    pub fn at_stop(&self, stop_id: &str) -> Option<&StopPredictions> {
        self.stops.get(stop_id)
    }
}
