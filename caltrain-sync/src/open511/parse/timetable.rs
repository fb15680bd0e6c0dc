//! `/timetable` parsing.
//!
//! A timetable payload carries two independent trees: route definitions
//! under `ServiceFrame`, and train runs grouped by validity under
//! `TimetableFrame`. Trains point at routes by id, so both are returned.

use crate::domain::{Direction, LineType, Route, StopTime, Timetable, TrainSchedule, TrainTime};
use crate::open511::endpoint::Endpoint;
use crate::open511::types::{
    CallDto, RouteDto, ServiceJourney, TimetableContent, TimetableFrame, TimetableResponse,
};

use super::{FieldPath, PayloadError, decode};

/// Parse a `/timetable` body for one line type.
pub fn parse_timetable(line: LineType, body: &str) -> Result<Timetable, PayloadError> {
    let endpoint = Endpoint::Timetable(line);
    let response: TimetableResponse = decode(endpoint, body)?;

    let path = FieldPath::root(endpoint).field("Content");
    let content = path.require(response.content.as_ref())?;

    Ok(Timetable {
        routes: convert_routes(content, &path)?,
        trains: convert_frames(content, &path)?,
    })
}

fn convert_routes(content: &TimetableContent, path: &FieldPath) -> Result<Vec<Route>, PayloadError> {
    let path = path.field("ServiceFrame");
    let service_frame = path.require(content.service_frame.as_ref())?;

    let path = path.field("routes");
    let routes = path.require(service_frame.routes.as_ref())?;

    let path = path.field("Route");
    let routes = path.require(routes.route.as_ref())?;

    routes
        .as_slice()
        .iter()
        .enumerate()
        .map(|(idx, route)| convert_route(route, &path.index(idx)))
        .collect()
}

fn convert_route(route: &RouteDto, path: &FieldPath) -> Result<Route, PayloadError> {
    let id = path.field("id").require(route.id.as_ref())?;
    let name = path.field("Name").require(route.name.as_ref())?;

    let line_path = path.field("LineRef");
    let line = line_path
        .require_ref(route.line_ref.as_ref())?
        .parse::<LineType>()
        .map_err(|e| line_path.field("ref").invalid(e))?;

    let direction =
        Direction::from_reference(path.field("DirectionRef").require_ref(route.direction_ref.as_ref())?);

    let points_path = path.field("pointsInSequence");
    let points = points_path.require(route.points_in_sequence.as_ref())?;
    let points_path = points_path.field("PointOnRoute");
    let stops = points
        .point_on_route
        .as_ref()
        .map(|p| p.as_slice())
        .unwrap_or(&[])
        .iter()
        .enumerate()
        .map(|(idx, point)| {
            points_path
                .index(idx)
                .field("PointRef")
                .require_ref(point.point_ref.as_ref())
                .map(str::to_string)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Route {
        id: id.clone(),
        name: name.clone(),
        line,
        direction,
        stops,
    })
}

fn convert_frames(
    content: &TimetableContent,
    path: &FieldPath,
) -> Result<Vec<TrainSchedule>, PayloadError> {
    let path = path.field("TimetableFrame");
    let frames = path.require(content.timetable_frame.as_ref())?;

    let mut trains = Vec::new();
    for (idx, frame) in frames.as_slice().iter().enumerate() {
        trains.extend(convert_frame(frame, &path.index(idx))?);
    }
    Ok(trains)
}

/// Convert every journey of one frame, tagging each with the frame's day type.
fn convert_frame(frame: &TimetableFrame, path: &FieldPath) -> Result<Vec<TrainSchedule>, PayloadError> {
    let day_type_ref = frame_day_type(frame, path)?;

    let path = path.field("vehicleJourneys");
    let journeys = path.require(frame.vehicle_journeys.as_ref())?;
    let path = path.field("ServiceJourney");

    journeys
        .service_journey
        .as_ref()
        .map(|j| j.as_slice())
        .unwrap_or(&[])
        .iter()
        .enumerate()
        .map(|(idx, journey)| convert_journey(journey, day_type_ref, &path.index(idx)))
        .collect()
}

/// The day type a frame is valid on.
///
/// Frames list their day types as one-or-many references; the first one
/// is the frame's day type.
fn frame_day_type<'a>(frame: &'a TimetableFrame, path: &FieldPath) -> Result<&'a str, PayloadError> {
    let path = path.field("frameValidityConditions");
    let conditions = path.require(frame.frame_validity_conditions.as_ref())?;

    let path = path.field("AvailabilityCondition");
    let condition = path.require(conditions.availability_condition.as_ref())?;

    let path = path.field("dayTypes");
    let day_types = path.require(condition.day_types.as_ref())?;

    let path = path.field("DayTypeRef");
    let refs = path.require(day_types.day_type_ref.as_ref())?;
    let first = refs.as_slice().first();

    path.index(0).require_ref(first)
}

fn convert_journey(
    journey: &ServiceJourney,
    day_type_ref: &str,
    path: &FieldPath,
) -> Result<TrainSchedule, PayloadError> {
    let id = path.field("id").require(journey.id.as_ref())?;

    let view_path = path.field("JourneyPatternView");
    let view = view_path.require(journey.journey_pattern_view.as_ref())?;
    let route_id = view_path
        .field("RouteRef")
        .require_ref(view.route_ref.as_ref())?;
    let direction = Direction::from_reference(
        view_path
            .field("DirectionRef")
            .require_ref(view.direction_ref.as_ref())?,
    );

    // A journey without calls is legal and has an empty schedule.
    let calls_path = path.field("calls").field("Call");
    let stop_times = journey
        .calls
        .as_ref()
        .and_then(|c| c.call.as_ref())
        .map(|c| c.as_slice())
        .unwrap_or(&[])
        .iter()
        .enumerate()
        .map(|(idx, call)| convert_call(call, &calls_path.index(idx)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TrainSchedule {
        id: id.clone(),
        route_id: route_id.to_string(),
        direction,
        day_type_ref: day_type_ref.to_string(),
        stop_times,
    })
}

fn convert_call(call: &CallDto, path: &FieldPath) -> Result<StopTime, PayloadError> {
    let stop_id = path
        .field("ScheduledStopPointRef")
        .require_ref(call.scheduled_stop_point_ref.as_ref())?;

    let arrival_path = path.field("Arrival");
    let arrival = arrival_path.require(call.arrival.as_ref())?;

    let offset_path = arrival_path.field("DaysOffset");
    let day_offset = match &arrival.days_offset {
        Some(offset) => offset
            .as_u32()
            .ok_or_else(|| offset_path.invalid("not a non-negative integer"))?,
        None => 0,
    };

    let time_path = arrival_path.field("Time");
    let time = time_path.require(arrival.time.as_ref())?;
    let arrival = TrainTime::parse(time, day_offset).map_err(|e| time_path.invalid(e))?;

    Ok(StopTime::new(stop_id, arrival))
}
