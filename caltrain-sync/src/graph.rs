//! Journey graph: which trains link which stops, and when.
//!
//! Every train's call list is expanded into all forward stop pairs, so
//! "can I get from A to B" is a single lookup at A. A train calling at n
//! stops contributes n arrivals and n(n-1)/2 connections.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::{TrainSchedule, TrainTime};

/// A direct ride on one train between two of its stops.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Connection {
    pub origin: String,
    pub destination: String,
    /// Time at the origin stop.
    pub departure: TrainTime,
    /// Time at the destination stop.
    pub arrival: TrainTime,
    pub train_id: String,
    pub day_type_ref: String,
}

/// A train calling at a stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArrivalAtStop {
    pub time: TrainTime,
    pub train_id: String,
    pub day_type_ref: String,
}

/// Everything the graph knows about one stop.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StopJourneys {
    /// Trains calling here.
    pub arrivals: Vec<ArrivalAtStop>,

    /// Connections leaving this stop, keyed by destination stop id.
    pub destinations: BTreeMap<String, Vec<Connection>>,
}

/// Per-stop arrivals and outgoing connections for a set of trains.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JourneyGraph {
    stops: BTreeMap<String, StopJourneys>,
}

impl JourneyGraph {
    /// Build the graph from trains.
    ///
    /// Times are copied from the stop times as they are; an arrival with a
    /// larger day offset is not adjusted against its departure.
    pub fn build<'a>(trains: impl IntoIterator<Item = &'a TrainSchedule>) -> Self {
        let stops = trains
            .into_iter()
            .fold(BTreeMap::new(), |mut stops: BTreeMap<String, StopJourneys>, train| {
                for (i, from) in train.stop_times.iter().enumerate() {
                    let entry = stops.entry(from.stop_id.clone()).or_default();
                    entry.arrivals.push(ArrivalAtStop {
                        time: from.arrival,
                        train_id: train.id.clone(),
                        day_type_ref: train.day_type_ref.clone(),
                    });

                    for to in &train.stop_times[i + 1..] {
                        entry
                            .destinations
                            .entry(to.stop_id.clone())
                            .or_default()
                            .push(Connection {
                                origin: from.stop_id.clone(),
                                destination: to.stop_id.clone(),
                                departure: from.arrival,
                                arrival: to.arrival,
                                train_id: train.id.clone(),
                                day_type_ref: train.day_type_ref.clone(),
                            });
                    }
                }
                stops
            });

        Self { stops }
    }

    /// Arrivals and connections at a stop.
    pub fn at_stop(&self, stop_id: &str) -> Option<&StopJourneys> {
        self.stops.get(stop_id)
    }

    /// Direct connections from `origin` to `destination`.
    pub fn connections(&self, origin: &str, destination: &str) -> &[Connection] {
        self.stops
            .get(origin)
            .and_then(|s| s.destinations.get(destination))
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Iterate over stops in id order.
    pub fn stops(&self) -> impl Iterator<Item = (&String, &StopJourneys)> {
        self.stops.iter()
    }

    /// Number of stops some train calls at.
    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    /// Total number of connections across all stops.
    pub fn connection_count(&self) -> usize {
        self.stops
            .values()
            .flat_map(|s| s.destinations.values())
            .map(|v| v.len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Direction, StopTime};

    fn time(h: u8, m: u8) -> TrainTime {
        TrainTime::new(h, m, 0).unwrap()
    }

    fn train(id: &str, calls: &[(&str, TrainTime)]) -> TrainSchedule {
        TrainSchedule {
            id: id.into(),
            route_id: "R".into(),
            direction: Direction::North,
            day_type_ref: "WD".into(),
            stop_times: calls
                .iter()
                .map(|(stop, t)| StopTime::new(*stop, *t))
                .collect(),
        }
    }

    #[test]
    fn three_stop_train() {
        let t = train("101", &[("A", time(8, 0)), ("B", time(8, 10)), ("C", time(8, 25))]);

        let graph = JourneyGraph::build([&t]);

        assert_eq!(graph.stop_count(), 3);
        assert_eq!(graph.connection_count(), 3);

        let ab = graph.connections("A", "B");
        assert_eq!(ab.len(), 1);
        assert_eq!(ab[0].departure, time(8, 0));
        assert_eq!(ab[0].arrival, time(8, 10));
        assert_eq!(ab[0].train_id, "101");
        assert_eq!(ab[0].day_type_ref, "WD");

        let ac = graph.connections("A", "C");
        assert_eq!((ac[0].departure, ac[0].arrival), (time(8, 0), time(8, 25)));
        let bc = graph.connections("B", "C");
        assert_eq!((bc[0].departure, bc[0].arrival), (time(8, 10), time(8, 25)));

        // Forward only.
        assert!(graph.connections("C", "A").is_empty());
        assert!(graph.at_stop("C").unwrap().destinations.is_empty());

        for (stop, at) in [("A", time(8, 0)), ("B", time(8, 10)), ("C", time(8, 25))] {
            let arrivals = &graph.at_stop(stop).unwrap().arrivals;
            assert_eq!(
                arrivals,
                &vec![ArrivalAtStop {
                    time: at,
                    train_id: "101".into(),
                    day_type_ref: "WD".into(),
                }]
            );
        }
    }

    #[test]
    fn empty_train_contributes_nothing() {
        let t = train("999", &[]);

        let graph = JourneyGraph::build([&t]);

        assert_eq!(graph.stop_count(), 0);
        assert_eq!(graph.connection_count(), 0);
    }

    #[test]
    fn trains_share_stops() {
        let a = train("101", &[("A", time(8, 0)), ("B", time(8, 10))]);
        let b = train("103", &[("A", time(9, 0)), ("B", time(9, 10))]);

        let graph = JourneyGraph::build([&a, &b]);

        let ab: Vec<_> = graph
            .connections("A", "B")
            .iter()
            .map(|c| c.train_id.as_str())
            .collect();
        assert_eq!(ab, vec!["101", "103"]);
        assert_eq!(graph.at_stop("B").unwrap().arrivals.len(), 2);
    }

    #[test]
    fn day_offset_taken_at_face_value() {
        let late = TrainTime::new(23, 50, 0).unwrap();
        let after_midnight = TrainTime::new(0, 15, 1).unwrap();
        let t = train("199", &[("A", late), ("B", after_midnight)]);

        let graph = JourneyGraph::build([&t]);

        let ab = &graph.connections("A", "B")[0];
        assert_eq!(ab.departure, late);
        assert_eq!(ab.arrival, after_midnight);
    }

    #[test]
    fn serializes_for_storage() {
        let t = train("101", &[("A", time(8, 0)), ("B", time(8, 10))]);
        let graph = JourneyGraph::build([&t]);

        let value = serde_json::to_value(graph.at_stop("A").unwrap()).unwrap();

        assert_eq!(value["arrivals"][0]["train_id"], "101");
        assert_eq!(value["destinations"]["B"][0]["arrival"]["minute"], 10);
        assert_eq!(value["destinations"]["B"][0]["arrival"]["day_offset"], 0);
    }
}
