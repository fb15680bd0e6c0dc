//! Sync cycles: fetch, parse, derive, then write.
//!
//! A schedule cycle reads stops, holidays and the three line timetables
//! concurrently. Only when every stage succeeded are the timetables merged,
//! the journey graph built and the result written; a failed stage means no
//! writes at all.

mod error;
mod merge;
mod staging;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::calendar::Calendar;
use crate::domain::{LineType, Stop, Timetable};
use crate::graph::JourneyGraph;
use crate::open511::{
    Endpoint, Holidays, PayloadError, TransitSource, parse_holidays, parse_stop_monitoring,
    parse_stop_places, parse_timetable,
};
use crate::store::{DocumentStore, StoreError};

pub use error::{StageError, StageFailure, SyncError};
pub use merge::{
    Collision, InvalidMergeOrder, MergeOrder, MergedTimetable, RecordKind, merge_timetables,
};
pub use staging::{Schedule, StoreUpdate, stage_update};

/// Default key path all writes go under.
pub const DEFAULT_ROOT: &str = "caltrain";

/// Counts from a successful schedule cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub stops: usize,
    pub routes: usize,
    pub trains: usize,
    pub day_types: usize,
    pub availability_dates: usize,
    pub graph_stops: usize,
    pub connections: usize,
    pub collisions: usize,
    /// Keys in the store update written.
    pub keys: usize,
}

impl SyncReport {
    fn new(schedule: &Schedule, keys: usize) -> Self {
        Self {
            stops: schedule.stops.len(),
            routes: schedule.timetable.routes.len(),
            trains: schedule.timetable.trains.len(),
            day_types: schedule.calendar.day_types.len(),
            availability_dates: schedule.calendar.availability.len(),
            graph_stops: schedule.graph.stop_count(),
            connections: schedule.graph.connection_count(),
            collisions: schedule.timetable.collisions.len(),
            keys,
        }
    }
}

/// Counts from a successful predictions sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionsReport {
    pub updated_at: DateTime<Utc>,
    pub stops: usize,
    pub events: usize,
}

/// Runs sync cycles from a transit source into a document store.
pub struct Synchronizer<S, D> {
    source: S,
    store: D,
    root: String,
    order: MergeOrder,
}

impl<S: TransitSource, D: DocumentStore> Synchronizer<S, D> {
    pub fn new(source: S, store: D) -> Self {
        Self {
            source,
            store,
            root: DEFAULT_ROOT.to_string(),
            order: MergeOrder::default(),
        }
    }

    /// Set the key path writes go under.
    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = root.into();
        self
    }

    /// Set the timetable merge order.
    pub fn with_merge_order(mut self, order: MergeOrder) -> Self {
        self.order = order;
        self
    }

    pub fn store(&self) -> &D {
        &self.store
    }

    /// Fetch one endpoint and parse it.
    async fn stage<T>(
        &self,
        endpoint: Endpoint,
        parse: impl FnOnce(&str) -> Result<T, PayloadError>,
    ) -> Result<T, StageFailure> {
        debug!(%endpoint, "stage starting");
        let body = self
            .source
            .fetch(endpoint)
            .await
            .map_err(|e| StageFailure::new(endpoint, e))?;
        let parsed = parse(&body).map_err(|e| StageFailure::new(endpoint, e))?;
        debug!(%endpoint, "stage complete");
        Ok(parsed)
    }

    /// Fetch and derive everything a schedule cycle writes, without writing.
    ///
    /// All stages run to completion; if any failed, every failure is
    /// returned.
    pub async fn fetch_schedule(&self) -> Result<Schedule, SyncError> {
        let timetables = join_all(LineType::ALL.map(|line| async move {
            let timetable = self
                .stage(Endpoint::Timetable(line), |body| parse_timetable(line, body))
                .await?;
            Ok::<_, StageFailure>((line, timetable))
        }));

        let (stops, holidays, timetables) = tokio::join!(
            self.stage(Endpoint::StopPlaces, parse_stop_places),
            self.stage(Endpoint::Holidays, parse_holidays),
            timetables,
        );

        let (stops, holidays, timetables) = collect_stages(stops, holidays, timetables)?;

        let timetable = merge_timetables(&self.order, &timetables);
        for collision in &timetable.collisions {
            warn!(
                kind = %collision.kind,
                id = %collision.id,
                replaced = %collision.replaced,
                kept = %collision.kept,
                "id defined by more than one line, keeping later line"
            );
        }

        let calendar = Calendar::new(holidays.day_types, &holidays.conditions);
        let graph = JourneyGraph::build(timetable.trains.values());

        Ok(Schedule {
            stops,
            calendar,
            timetable,
            graph,
        })
    }

    /// Run one schedule cycle and write the result.
    pub async fn run_cycle(&self) -> Result<SyncReport, SyncError> {
        let schedule = self.fetch_schedule().await.inspect_err(|e| {
            warn!(error = %e, "schedule cycle failed, nothing written");
        })?;

        let update = stage_update(&self.root, &schedule, Utc::now())?;
        let keys = update.fields.len();
        debug!(path = %update.path, keys, "writing");
        self.store.update(&update.path, update.fields).await?;

        let report = SyncReport::new(&schedule, keys);
        info!(
            stops = report.stops,
            routes = report.routes,
            trains = report.trains,
            day_types = report.day_types,
            availability_dates = report.availability_dates,
            graph_stops = report.graph_stops,
            connections = report.connections,
            collisions = report.collisions,
            keys = report.keys,
            "schedule sync complete"
        );
        Ok(report)
    }

    /// Fetch live predictions and replace the stored snapshot.
    pub async fn sync_predictions(&self) -> Result<PredictionsReport, SyncError> {
        let snapshot = self
            .stage(Endpoint::StopMonitoring, parse_stop_monitoring)
            .await
            .map_err(|f| SyncError::Stages(vec![f]))?;

        let path = staging::join(self.root.trim_matches('/'), "realtime");
        let value = serde_json::to_value(&snapshot).map_err(|e| StoreError::Serialize {
            path: path.clone(),
            message: e.to_string(),
        })?;
        self.store.set(&path, value).await?;

        let report = PredictionsReport {
            updated_at: snapshot.updated_at,
            stops: snapshot.stops.len(),
            events: snapshot
                .stops
                .values()
                .map(|s| s.arrivals.len() + s.departures.len())
                .sum(),
        };
        info!(
            updated_at = %report.updated_at,
            stops = report.stops,
            events = report.events,
            "predictions sync complete"
        );
        Ok(report)
    }
}

/// Join the stage results, keeping every failure.
fn collect_stages(
    stops: Result<Vec<Stop>, StageFailure>,
    holidays: Result<Holidays, StageFailure>,
    timetables: Vec<Result<(LineType, Timetable), StageFailure>>,
) -> Result<(Vec<Stop>, Holidays, BTreeMap<LineType, Timetable>), SyncError> {
    let mut failures = Vec::new();
    let mut parsed = BTreeMap::new();
    for result in timetables {
        match result {
            Ok((line, timetable)) => {
                parsed.insert(line, timetable);
            }
            Err(failure) => failures.push(failure),
        }
    }

    match (stops, holidays) {
        (Ok(stops), Ok(holidays)) if failures.is_empty() => Ok((stops, holidays, parsed)),
        (stops, holidays) => {
            let mut all: Vec<StageFailure> =
                stops.err().into_iter().chain(holidays.err()).collect();
            all.extend(failures);
            Err(SyncError::Stages(all))
        }
    }
}
