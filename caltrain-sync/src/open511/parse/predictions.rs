//! `/StopMonitoring` parsing.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::domain::{PredictedEvent, PredictionsSnapshot};
use crate::open511::endpoint::Endpoint;
use crate::open511::types::{MonitoredStopVisit, StopMonitoringResponse};

use super::{FieldPath, PayloadError, decode};

/// Parse a `/StopMonitoring` body into a predictions snapshot.
///
/// Each monitored visit contributes one arrival and one departure event.
pub fn parse_stop_monitoring(body: &str) -> Result<PredictionsSnapshot, PayloadError> {
    let response: StopMonitoringResponse = decode(Endpoint::StopMonitoring, body)?;

    let path = FieldPath::root(Endpoint::StopMonitoring).field("ServiceDelivery");
    let delivery = path.require(response.service_delivery.as_ref())?;

    let timestamp_path = path.field("ResponseTimestamp");
    let updated_at = required_timestamp(delivery.response_timestamp.as_deref(), &timestamp_path)?;

    let path = path.field("StopMonitoringDelivery");
    let monitoring = path.require(delivery.stop_monitoring_delivery.as_ref())?;

    let visits_path = path.field("MonitoredStopVisit");
    let visits = monitoring
        .monitored_stop_visit
        .as_ref()
        .map(|v| v.as_slice())
        .unwrap_or(&[])
        .iter()
        .enumerate()
        .map(|(idx, visit)| convert_visit(visit, &visits_path.index(idx)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PredictionsSnapshot::from_visits(updated_at, visits))
}

/// Convert one visit into its `(arrival, departure)` events.
fn convert_visit(
    visit: &MonitoredStopVisit,
    path: &FieldPath,
) -> Result<(PredictedEvent, PredictedEvent), PayloadError> {
    let path = path.field("MonitoredVehicleJourney");
    let journey = path.require(visit.monitored_vehicle_journey.as_ref())?;

    let vehicle_path = path.field("FramedVehicleJourneyRef");
    let vehicle_ref = vehicle_path.require(journey.framed_vehicle_journey_ref.as_ref())?;
    let vehicle_id = vehicle_path
        .field("DatedVehicleJourneyRef")
        .require(vehicle_ref.dated_vehicle_journey_ref.as_ref())?;

    let call_path = path.field("MonitoredCall");
    let call = call_path.require(journey.monitored_call.as_ref())?;
    let stop_id = call_path
        .field("StopPointRef")
        .require(call.stop_point_ref.as_ref())?;

    let timestamp = |value: &Option<String>, name: &str| {
        optional_timestamp(value.as_deref(), &call_path.field(name))
    };

    let arrival = PredictedEvent::new(
        stop_id.as_str(),
        vehicle_id.as_str(),
        timestamp(&call.aimed_arrival_time, "AimedArrivalTime")?,
        timestamp(&call.expected_arrival_time, "ExpectedArrivalTime")?,
    );
    let departure = PredictedEvent::new(
        stop_id.as_str(),
        vehicle_id.as_str(),
        timestamp(&call.aimed_departure_time, "AimedDepartureTime")?,
        timestamp(&call.expected_departure_time, "ExpectedDepartureTime")?,
    );

    Ok((arrival, departure))
}

fn required_timestamp(value: Option<&str>, path: &FieldPath) -> Result<DateTime<Utc>, PayloadError> {
    optional_timestamp(value, path)?.ok_or_else(|| path.missing())
}

/// Parse an optional timestamp; absent is fine, unparseable is not.
fn optional_timestamp(
    value: Option<&str>,
    path: &FieldPath,
) -> Result<Option<DateTime<Utc>>, PayloadError> {
    match value {
        None => Ok(None),
        Some(s) => parse_timestamp(s)
            .map(Some)
            .ok_or_else(|| path.invalid(format!("not a timestamp: {s:?}"))),
    }
}

/// Parse an RFC 3339 timestamp. Timestamps without an offset are UTC.
fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.and_utc())
}
