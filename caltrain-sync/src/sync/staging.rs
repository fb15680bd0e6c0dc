//! Turning a finished schedule into store updates.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::calendar::Calendar;
use crate::domain::{Stop, date_millis};
use crate::graph::JourneyGraph;
use crate::store::{Fields, StoreError};

use super::merge::MergedTimetable;

/// One partial-merge write: replace the listed children of `path`.
///
/// Keys may be relative paths (`stops/70011`), so a single update can touch
/// several sections at once.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreUpdate {
    pub path: String,
    pub fields: Fields,
}

/// Everything one schedule cycle produced, ready to stage.
#[derive(Debug, Clone)]
pub struct Schedule {
    pub stops: Vec<Stop>,
    pub calendar: Calendar,
    pub timetable: MergedTimetable,
    pub graph: JourneyGraph,
}

/// Stage a schedule as one update at `root`.
///
/// Every record becomes a `<section>/<id>` key, plus `meta/updated_at`.
/// The store applies all of them or none.
pub fn stage_update(
    root: &str,
    schedule: &Schedule,
    updated_at: DateTime<Utc>,
) -> Result<StoreUpdate, StoreError> {
    let root = root.trim_matches('/');
    let mut fields = Fields::new();

    keyed(&mut fields, root, "stops", schedule.stops.iter().map(|s| (s.id.clone(), s)))?;
    keyed(
        &mut fields,
        root,
        "routes",
        schedule.timetable.routes.iter().map(|(k, v)| (k.clone(), v)),
    )?;
    keyed(
        &mut fields,
        root,
        "trains",
        schedule.timetable.trains.iter().map(|(k, v)| (k.clone(), v)),
    )?;
    keyed(
        &mut fields,
        root,
        "day_types",
        schedule.calendar.day_types.iter().map(|d| (d.id.clone(), d)),
    )?;
    keyed(
        &mut fields,
        root,
        "availability",
        schedule
            .calendar
            .availability
            .iter()
            .map(|(date, a)| (date_millis(*date).to_string(), a)),
    )?;
    keyed(
        &mut fields,
        root,
        "journeys",
        schedule.graph.stops().map(|(k, v)| (k.clone(), v)),
    )?;

    fields.insert(
        "meta/updated_at".to_string(),
        Value::from(updated_at.timestamp_millis()),
    );

    Ok(StoreUpdate {
        path: root.to_string(),
        fields,
    })
}

/// Serialize records into `fields` as `<section>/<id>` keys.
fn keyed<'a, T: Serialize + 'a>(
    fields: &mut Fields,
    root: &str,
    section: &str,
    records: impl Iterator<Item = (String, &'a T)>,
) -> Result<(), StoreError> {
    for (id, record) in records {
        let value = serde_json::to_value(record).map_err(|e| StoreError::Serialize {
            path: join(root, section),
            message: e.to_string(),
        })?;
        fields.insert(join(section, &id), value);
    }
    Ok(())
}

pub(crate) fn join(root: &str, section: &str) -> String {
    if root.is_empty() {
        section.to_string()
    } else {
        format!("{root}/{section}")
    }
}
