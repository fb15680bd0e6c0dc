//! Merging per-line timetables into one route and train mapping.

use std::collections::BTreeMap;
use std::fmt;

use crate::domain::{LineType, Route, Timetable, TrainSchedule};

/// Error returned when a merge order does not list each line type once.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("merge order must list each line type exactly once, got {0:?}")]
pub struct InvalidMergeOrder(pub Vec<LineType>);

/// Order in which line timetables are applied. Later lines win on an id
/// collision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOrder([LineType; 3]);

impl MergeOrder {
    pub fn new(order: [LineType; 3]) -> Result<Self, InvalidMergeOrder> {
        let complete = LineType::ALL.iter().all(|line| order.contains(line));
        if complete {
            Ok(Self(order))
        } else {
            Err(InvalidMergeOrder(order.to_vec()))
        }
    }

    /// Line types, first applied first.
    pub fn lines(&self) -> &[LineType] {
        &self.0
    }
}

impl Default for MergeOrder {
    /// Local, then Limited, then Bullet.
    fn default() -> Self {
        Self(LineType::ALL)
    }
}

/// What kind of record two timetables both defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Route,
    Train,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Route => f.write_str("route"),
            RecordKind::Train => f.write_str("train"),
        }
    }
}

/// Two line timetables used the same id; the later line's record was kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    pub kind: RecordKind,
    pub id: String,
    pub replaced: LineType,
    pub kept: LineType,
}

/// Routes and trains of every line, keyed by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedTimetable {
    pub routes: BTreeMap<String, Route>,
    pub trains: BTreeMap<String, TrainSchedule>,
    pub collisions: Vec<Collision>,
}

/// Merge per-line timetables in `order`.
///
/// A line without a timetable contributes nothing. Ids that appear in more
/// than one line are recorded as [`Collision`]s, not rejected.
pub fn merge_timetables(
    order: &MergeOrder,
    timetables: &BTreeMap<LineType, Timetable>,
) -> MergedTimetable {
    let mut merged = MergedTimetable::default();
    let mut route_lines: BTreeMap<String, LineType> = BTreeMap::new();
    let mut train_lines: BTreeMap<String, LineType> = BTreeMap::new();

    for &line in order.lines() {
        let Some(timetable) = timetables.get(&line) else {
            continue;
        };

        for route in &timetable.routes {
            if let Some(previous) = route_lines.insert(route.id.clone(), line) {
                merged.collisions.push(Collision {
                    kind: RecordKind::Route,
                    id: route.id.clone(),
                    replaced: previous,
                    kept: line,
                });
            }
            merged.routes.insert(route.id.clone(), route.clone());
        }

        for train in &timetable.trains {
            if let Some(previous) = train_lines.insert(train.id.clone(), line) {
                merged.collisions.push(Collision {
                    kind: RecordKind::Train,
                    id: train.id.clone(),
                    replaced: previous,
                    kept: line,
                });
            }
            merged.trains.insert(train.id.clone(), train.clone());
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Direction, StopTime, TrainTime};

    fn train(id: &str, route: &str, first_stop: &str) -> TrainSchedule {
        TrainSchedule {
            id: id.into(),
            route_id: route.into(),
            direction: Direction::South,
            day_type_ref: "WD".into(),
            stop_times: vec![StopTime::new(first_stop, TrainTime::new(7, 0, 0).unwrap())],
        }
    }

    fn route(id: &str, line: LineType) -> Route {
        Route {
            id: id.into(),
            name: id.into(),
            line,
            direction: Direction::South,
            stops: vec!["A".into(), "B".into()],
        }
    }

    #[test]
    fn later_line_wins() {
        let timetables = BTreeMap::from([
            (
                LineType::Local,
                Timetable {
                    routes: vec![route("LOC", LineType::Local)],
                    trains: vec![train("101", "LOC", "A"), train("103", "LOC", "A")],
                },
            ),
            (
                LineType::Bullet,
                Timetable {
                    routes: vec![route("BUL", LineType::Bullet)],
                    trains: vec![train("101", "BUL", "B")],
                },
            ),
        ]);

        let merged = merge_timetables(&MergeOrder::default(), &timetables);

        assert_eq!(merged.trains.len(), 2);
        assert_eq!(merged.trains["101"].route_id, "BUL");
        assert_eq!(merged.trains["101"].stop_times[0].stop_id, "B");
        assert_eq!(
            merged.collisions,
            vec![Collision {
                kind: RecordKind::Train,
                id: "101".into(),
                replaced: LineType::Local,
                kept: LineType::Bullet,
            }]
        );
    }

    #[test]
    fn order_is_explicit() {
        let timetables = BTreeMap::from([
            (
                LineType::Local,
                Timetable {
                    routes: vec![],
                    trains: vec![train("101", "LOC", "A")],
                },
            ),
            (
                LineType::Bullet,
                Timetable {
                    routes: vec![],
                    trains: vec![train("101", "BUL", "B")],
                },
            ),
        ]);
        let order =
            MergeOrder::new([LineType::Bullet, LineType::Limited, LineType::Local]).unwrap();

        let merged = merge_timetables(&order, &timetables);

        assert_eq!(merged.trains["101"].route_id, "LOC");
        assert_eq!(merged.collisions[0].kept, LineType::Local);
    }

    #[test]
    fn route_collisions_reported() {
        let timetables = BTreeMap::from([
            (
                LineType::Local,
                Timetable {
                    routes: vec![route("SHARED", LineType::Local)],
                    trains: vec![],
                },
            ),
            (
                LineType::Limited,
                Timetable {
                    routes: vec![route("SHARED", LineType::Limited)],
                    trains: vec![],
                },
            ),
        ]);

        let merged = merge_timetables(&MergeOrder::default(), &timetables);

        assert_eq!(merged.routes.len(), 1);
        assert_eq!(merged.routes["SHARED"].line, LineType::Limited);
        assert_eq!(merged.collisions[0].kind, RecordKind::Route);
    }

    #[test]
    fn invalid_order_rejected() {
        assert!(MergeOrder::new([LineType::Local, LineType::Local, LineType::Bullet]).is_err());
        assert_eq!(
            MergeOrder::default().lines(),
            &[LineType::Local, LineType::Limited, LineType::Bullet]
        );
    }
}
