//! Per-train schedules.

use serde::Serialize;

use super::{Direction, Route, TrainTime};

/// A scheduled call of a train at a stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StopTime {
    pub stop_id: String,
    pub arrival: TrainTime,
}

impl StopTime {
    pub fn new(stop_id: impl Into<String>, arrival: TrainTime) -> Self {
        Self {
            stop_id: stop_id.into(),
            arrival,
        }
    }
}

/// One scheduled run of a physical train.
///
/// The id is unique across all line types within a sync cycle (see
/// [`crate::sync::merge_timetables`] for what happens when it isn't).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrainSchedule {
    /// Journey id; this is the train number riders see.
    pub id: String,

    /// Route this train runs along.
    pub route_id: String,

    pub direction: Direction,

    /// Day type the train's timetable frame is valid on.
    pub day_type_ref: String,

    /// Calls in travel order. May be empty.
    pub stop_times: Vec<StopTime>,
}

/// Routes and trains of one line type, as parsed from one timetable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timetable {
    pub routes: Vec<Route>,
    pub trains: Vec<TrainSchedule>,
}
