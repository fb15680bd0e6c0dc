//! 511.org API response DTOs.
//!
//! These types mirror the JSON the 511.org transit endpoints return. The
//! payloads are machine-converted from XML (NeTEx and SIRI), which gives
//! them two quirks handled here:
//!
//! - Repeated elements arrive as a bare object when there is only one of
//!   them and as an array otherwise, hence [`OneOrMany`].
//! - Scalars are often strings even when they hold numbers or booleans.
//!
//! Nearly every field is an `Option` so that a missing field is reported by
//! the parser with its full path, instead of as a serde error without one.

use serde::Deserialize;

/// A repeated element that may be serialized as one object or a list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    /// View the element(s) as a slice.
    pub fn as_slice(&self) -> &[T] {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => std::slice::from_ref(item),
        }
    }
}

/// A NeTEx reference: `{"ref": "..."}`.
#[derive(Debug, Clone, Deserialize)]
pub struct Ref {
    #[serde(rename = "ref")]
    pub reference: Option<String>,
}

/// A number that may be sent as a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumberOrString {
    Number(f64),
    Text(String),
}

impl NumberOrString {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            NumberOrString::Number(n) => Some(*n),
            NumberOrString::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Returns the value as a non-negative integer, if it is one.
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            NumberOrString::Number(n) if n.fract() == 0.0 && *n >= 0.0 && *n <= u32::MAX as f64 => {
                Some(*n as u32)
            }
            NumberOrString::Number(_) => None,
            NumberOrString::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// A boolean that may be sent as a JSON boolean or `"true"`/`"false"`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum BoolOrString {
    Bool(bool),
    Text(String),
}

impl BoolOrString {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            BoolOrString::Bool(b) => Some(*b),
            BoolOrString::Text(s) if s.eq_ignore_ascii_case("true") => Some(true),
            BoolOrString::Text(s) if s.eq_ignore_ascii_case("false") => Some(false),
            BoolOrString::Text(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Stop places (`/stopPlaces`)
// ---------------------------------------------------------------------------

/// Response from `/stopPlaces`.
#[derive(Debug, Clone, Deserialize)]
pub struct StopPlacesResponse {
    #[serde(rename = "Siri")]
    pub siri: Option<Siri>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Siri {
    #[serde(rename = "ServiceDelivery")]
    pub service_delivery: Option<SiriServiceDelivery>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SiriServiceDelivery {
    #[serde(rename = "DataObjectDelivery")]
    pub data_object_delivery: Option<DataObjectDelivery>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataObjectDelivery {
    #[serde(rename = "dataObjects")]
    pub data_objects: Option<DataObjects>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataObjects {
    #[serde(rename = "SiteFrame")]
    pub site_frame: Option<SiteFrame>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SiteFrame {
    #[serde(rename = "stopPlaces")]
    pub stop_places: Option<StopPlaces>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StopPlaces {
    #[serde(rename = "StopPlace")]
    pub stop_place: Option<OneOrMany<StopPlace>>,
}

/// A single platform.
#[derive(Debug, Clone, Deserialize)]
pub struct StopPlace {
    #[serde(rename = "@id")]
    pub id: Option<String>,

    #[serde(rename = "Name")]
    pub name: Option<String>,

    #[serde(rename = "Centroid")]
    pub centroid: Option<Centroid>,

    #[serde(rename = "PublicCode")]
    pub public_code: Option<String>,

    pub quays: Option<Quays>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Centroid {
    #[serde(rename = "Location")]
    pub location: Option<CentroidLocation>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CentroidLocation {
    #[serde(rename = "Latitude")]
    pub latitude: Option<NumberOrString>,

    #[serde(rename = "Longitude")]
    pub longitude: Option<NumberOrString>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Quays {
    #[serde(rename = "Quay")]
    pub quay: Option<OneOrMany<Quay>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Quay {
    /// Compass octant the platform faces ("E", "SW", ...).
    #[serde(rename = "CompassOctant")]
    pub compass_octant: Option<String>,
}

// ---------------------------------------------------------------------------
// Timetable (`/timetable?line_id=...`)
// ---------------------------------------------------------------------------

/// Response from `/timetable`.
#[derive(Debug, Clone, Deserialize)]
pub struct TimetableResponse {
    #[serde(rename = "Content")]
    pub content: Option<TimetableContent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimetableContent {
    #[serde(rename = "ServiceFrame")]
    pub service_frame: Option<ServiceFrame>,

    #[serde(rename = "TimetableFrame")]
    pub timetable_frame: Option<OneOrMany<TimetableFrame>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceFrame {
    pub routes: Option<Routes>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Routes {
    #[serde(rename = "Route")]
    pub route: Option<OneOrMany<RouteDto>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouteDto {
    pub id: Option<String>,

    #[serde(rename = "Name")]
    pub name: Option<String>,

    #[serde(rename = "LineRef")]
    pub line_ref: Option<Ref>,

    #[serde(rename = "DirectionRef")]
    pub direction_ref: Option<Ref>,

    #[serde(rename = "pointsInSequence")]
    pub points_in_sequence: Option<PointsInSequence>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PointsInSequence {
    #[serde(rename = "PointOnRoute")]
    pub point_on_route: Option<OneOrMany<PointOnRoute>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PointOnRoute {
    #[serde(rename = "PointRef")]
    pub point_ref: Option<Ref>,
}

/// A group of journeys sharing one validity condition.
#[derive(Debug, Clone, Deserialize)]
pub struct TimetableFrame {
    pub id: Option<String>,

    #[serde(rename = "Name")]
    pub name: Option<String>,

    #[serde(rename = "frameValidityConditions")]
    pub frame_validity_conditions: Option<FrameValidityConditions>,

    #[serde(rename = "vehicleJourneys")]
    pub vehicle_journeys: Option<VehicleJourneys>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FrameValidityConditions {
    #[serde(rename = "AvailabilityCondition")]
    pub availability_condition: Option<FrameAvailabilityCondition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FrameAvailabilityCondition {
    #[serde(rename = "dayTypes")]
    pub day_types: Option<DayTypeRefs>,
}

/// `dayTypes` container, used by both timetable frames and holidays.
#[derive(Debug, Clone, Deserialize)]
pub struct DayTypeRefs {
    #[serde(rename = "DayTypeRef")]
    pub day_type_ref: Option<OneOrMany<Ref>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VehicleJourneys {
    #[serde(rename = "ServiceJourney")]
    pub service_journey: Option<OneOrMany<ServiceJourney>>,
}

/// One train run.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceJourney {
    pub id: Option<String>,

    #[serde(rename = "JourneyPatternView")]
    pub journey_pattern_view: Option<JourneyPatternView>,

    pub calls: Option<Calls>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JourneyPatternView {
    #[serde(rename = "RouteRef")]
    pub route_ref: Option<Ref>,

    #[serde(rename = "DirectionRef")]
    pub direction_ref: Option<Ref>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Calls {
    #[serde(rename = "Call")]
    pub call: Option<OneOrMany<CallDto>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallDto {
    #[serde(rename = "ScheduledStopPointRef")]
    pub scheduled_stop_point_ref: Option<Ref>,

    #[serde(rename = "Arrival")]
    pub arrival: Option<CallTime>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallTime {
    /// Clock time, `HH:MM:SS`.
    #[serde(rename = "Time")]
    pub time: Option<String>,

    #[serde(rename = "DaysOffset")]
    pub days_offset: Option<NumberOrString>,
}

// ---------------------------------------------------------------------------
// Holidays (`/holidays`)
// ---------------------------------------------------------------------------

/// Response from `/holidays`.
#[derive(Debug, Clone, Deserialize)]
pub struct HolidaysResponse {
    #[serde(rename = "Content")]
    pub content: Option<HolidaysContent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HolidaysContent {
    #[serde(rename = "DayType")]
    pub day_type: Option<OneOrMany<DayTypeDto>>,

    #[serde(rename = "AvailabilityConditions")]
    pub availability_conditions: Option<OneOrMany<AvailabilityConditionDto>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DayTypeDto {
    pub id: Option<String>,

    #[serde(rename = "Name")]
    pub name: Option<String>,

    pub properties: Option<DayTypeProperties>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DayTypeProperties {
    #[serde(rename = "PropertyOfDay")]
    pub property_of_day: Option<PropertyOfDay>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PropertyOfDay {
    /// Space-delimited weekday names, e.g. "Monday Tuesday".
    #[serde(rename = "DaysOfWeek")]
    pub days_of_week: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AvailabilityConditionDto {
    pub id: Option<String>,

    #[serde(rename = "FromDate")]
    pub from_date: Option<String>,

    #[serde(rename = "dayTypes")]
    pub day_types: Option<DayTypeRefs>,

    #[serde(rename = "IsAvailable")]
    pub is_available: Option<BoolOrString>,
}

// ---------------------------------------------------------------------------
// Stop monitoring (`/StopMonitoring`)
// ---------------------------------------------------------------------------

/// Response from `/StopMonitoring`.
#[derive(Debug, Clone, Deserialize)]
pub struct StopMonitoringResponse {
    #[serde(rename = "ServiceDelivery")]
    pub service_delivery: Option<MonitoringServiceDelivery>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringServiceDelivery {
    #[serde(rename = "ResponseTimestamp")]
    pub response_timestamp: Option<String>,

    #[serde(rename = "StopMonitoringDelivery")]
    pub stop_monitoring_delivery: Option<StopMonitoringDelivery>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StopMonitoringDelivery {
    #[serde(rename = "MonitoredStopVisit")]
    pub monitored_stop_visit: Option<OneOrMany<MonitoredStopVisit>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoredStopVisit {
    #[serde(rename = "MonitoredVehicleJourney")]
    pub monitored_vehicle_journey: Option<MonitoredVehicleJourney>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoredVehicleJourney {
    #[serde(rename = "FramedVehicleJourneyRef")]
    pub framed_vehicle_journey_ref: Option<FramedVehicleJourneyRef>,

    #[serde(rename = "MonitoredCall")]
    pub monitored_call: Option<MonitoredCall>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FramedVehicleJourneyRef {
    /// Train number.
    #[serde(rename = "DatedVehicleJourneyRef")]
    pub dated_vehicle_journey_ref: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoredCall {
    #[serde(rename = "StopPointRef")]
    pub stop_point_ref: Option<String>,

    #[serde(rename = "AimedArrivalTime")]
    pub aimed_arrival_time: Option<String>,

    #[serde(rename = "ExpectedArrivalTime")]
    pub expected_arrival_time: Option<String>,

    #[serde(rename = "AimedDepartureTime")]
    pub aimed_departure_time: Option<String>,

    #[serde(rename = "ExpectedDepartureTime")]
    pub expected_departure_time: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_or_many_accepts_object() {
        let parsed: OneOrMany<Ref> = serde_json::from_str(r#"{"ref": "WD"}"#).unwrap();
        assert_eq!(parsed.as_slice().len(), 1);
        assert_eq!(parsed.as_slice()[0].reference.as_deref(), Some("WD"));
    }

    #[test]
    fn one_or_many_accepts_array() {
        let parsed: OneOrMany<Ref> =
            serde_json::from_str(r#"[{"ref": "WD"}, {"ref": "SAT"}]"#).unwrap();
        let refs: Vec<_> = parsed
            .as_slice()
            .iter()
            .map(|r| r.reference.as_deref().unwrap())
            .collect();
        assert_eq!(refs, vec!["WD", "SAT"]);
    }

    #[test]
    fn number_or_string() {
        let n: NumberOrString = serde_json::from_str("37.7764").unwrap();
        let s: NumberOrString = serde_json::from_str(r#""-122.3942""#).unwrap();
        let bad: NumberOrString = serde_json::from_str(r#""north""#).unwrap();
        assert_eq!(n.as_f64(), Some(37.7764));
        assert_eq!(s.as_f64(), Some(-122.3942));
        assert_eq!(bad.as_f64(), None);

        let offset: NumberOrString = serde_json::from_str(r#""1""#).unwrap();
        assert_eq!(offset.as_u32(), Some(1));
        assert_eq!(NumberOrString::Number(2.0).as_u32(), Some(2));
        assert_eq!(NumberOrString::Number(-1.0).as_u32(), None);
        assert_eq!(NumberOrString::Number(0.5).as_u32(), None);
    }

    #[test]
    fn bool_or_string() {
        let b: BoolOrString = serde_json::from_str("true").unwrap();
        let s: BoolOrString = serde_json::from_str(r#""false""#).unwrap();
        let bad: BoolOrString = serde_json::from_str(r#""maybe""#).unwrap();
        assert_eq!(b.as_bool(), Some(true));
        assert_eq!(s.as_bool(), Some(false));
        assert_eq!(bad.as_bool(), None);
    }

    #[test]
    fn deserialize_service_journey() {
        let json = r#"{
            "id": "101",
            "JourneyPatternView": {
                "RouteRef": {"ref": "CT:LOCAL:N"},
                "DirectionRef": {"ref": "N"}
            },
            "calls": {
                "Call": [
                    {"ScheduledStopPointRef": {"ref": "70262"},
                     "Arrival": {"Time": "04:28:00", "DaysOffset": "0"}},
                    {"ScheduledStopPointRef": {"ref": "70222"},
                     "Arrival": {"Time": "04:34:00", "DaysOffset": "0"}}
                ]
            }
        }"#;

        let journey: ServiceJourney = serde_json::from_str(json).unwrap();

        assert_eq!(journey.id.as_deref(), Some("101"));
        let calls = journey.calls.unwrap().call.unwrap();
        assert_eq!(calls.as_slice().len(), 2);
        let first = &calls.as_slice()[0];
        assert_eq!(
            first.arrival.as_ref().unwrap().time.as_deref(),
            Some("04:28:00")
        );
    }

    #[test]
    fn deserialize_monitored_visit_without_estimates() {
        let json = r#"{
            "MonitoredVehicleJourney": {
                "FramedVehicleJourneyRef": {"DataFrameRef": "2018-01-10", "DatedVehicleJourneyRef": "263"},
                "MonitoredCall": {
                    "StopPointRef": "70012",
                    "AimedArrivalTime": "2018-01-10T21:40:00Z",
                    "AimedDepartureTime": "2018-01-10T21:40:00Z"
                }
            }
        }"#;

        let visit: MonitoredStopVisit = serde_json::from_str(json).unwrap();
        let call = visit.monitored_vehicle_journey.unwrap().monitored_call.unwrap();

        assert_eq!(call.stop_point_ref.as_deref(), Some("70012"));
        assert!(call.expected_arrival_time.is_none());
        assert!(call.expected_departure_time.is_none());
    }
}
