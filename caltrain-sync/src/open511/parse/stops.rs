//! `/stopPlaces` parsing.

use crate::domain::{Direction, Location, Stop};
use crate::open511::endpoint::Endpoint;
use crate::open511::types::{Centroid, Quays, StopPlace, StopPlacesResponse};

use super::{FieldPath, PayloadError, decode};

/// Parse a `/stopPlaces` body into stops, in payload order.
pub fn parse_stop_places(body: &str) -> Result<Vec<Stop>, PayloadError> {
    let response: StopPlacesResponse = decode(Endpoint::StopPlaces, body)?;
    convert_stop_places(&response)
}

fn convert_stop_places(response: &StopPlacesResponse) -> Result<Vec<Stop>, PayloadError> {
    let path = FieldPath::root(Endpoint::StopPlaces).field("Siri");
    let siri = path.require(response.siri.as_ref())?;

    let path = path.field("ServiceDelivery");
    let delivery = path.require(siri.service_delivery.as_ref())?;

    let path = path.field("DataObjectDelivery");
    let data_delivery = path.require(delivery.data_object_delivery.as_ref())?;

    let path = path.field("dataObjects");
    let data_objects = path.require(data_delivery.data_objects.as_ref())?;

    let path = path.field("SiteFrame");
    let site_frame = path.require(data_objects.site_frame.as_ref())?;

    let path = path.field("stopPlaces");
    let stop_places = path.require(site_frame.stop_places.as_ref())?;

    let path = path.field("StopPlace");
    let places = path.require(stop_places.stop_place.as_ref())?;

    places
        .as_slice()
        .iter()
        .enumerate()
        .map(|(idx, place)| convert_stop_place(place, &path.index(idx)))
        .collect()
}

fn convert_stop_place(place: &StopPlace, path: &FieldPath) -> Result<Stop, PayloadError> {
    let id = path.field("@id").require(place.id.as_ref())?;
    let name = path.field("Name").require(place.name.as_ref())?;
    let public_code = path.field("PublicCode").require(place.public_code.as_ref())?;
    let location = location_from_centroid(place.centroid.as_ref(), &path.field("Centroid"))?;

    Ok(Stop {
        id: id.clone(),
        name: name.clone(),
        location,
        public_code: public_code.clone(),
        direction: heading(place.quays.as_ref()),
    })
}

/// A location only exists if every part of the centroid is present.
///
/// A coordinate that is present but not a number is a malformed payload,
/// not a missing location.
fn location_from_centroid(
    centroid: Option<&Centroid>,
    path: &FieldPath,
) -> Result<Option<Location>, PayloadError> {
    let Some(location) = centroid.and_then(|c| c.location.as_ref()) else {
        return Ok(None);
    };
    let (Some(latitude), Some(longitude)) = (&location.latitude, &location.longitude) else {
        return Ok(None);
    };

    let path = path.field("Location");
    let latitude = latitude
        .as_f64()
        .ok_or_else(|| path.field("Latitude").invalid("not a number"))?;
    let longitude = longitude
        .as_f64()
        .ok_or_else(|| path.field("Longitude").invalid("not a number"))?;

    Ok(Some(Location::new(latitude, longitude)))
}

/// Direction served by the platform, from its first quay's compass octant.
fn heading(quays: Option<&Quays>) -> Option<Direction> {
    let quay = quays?.quay.as_ref()?.as_slice().first()?;
    quay.compass_octant
        .as_deref()
        .map(Direction::from_compass_octant)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrap(stop_places: &str) -> String {
        format!(
            r#"{{"Siri": {{"ServiceDelivery": {{"ResponseTimestamp": "2018-01-10T21:33:50Z",
                "DataObjectDelivery": {{"dataObjects": {{"SiteFrame": {{
                    "stopPlaces": {{"StopPlace": {stop_places}}}
                }}}}}}}}}}}}"#
        )
    }

    #[test]
    fn parse_full_stop() {
        let body = wrap(
            r#"[{
                "@id": "70011",
                "Name": "San Francisco Caltrain",
                "Centroid": {"Location": {"Longitude": "-122.3942", "Latitude": "37.7764"}},
                "PublicCode": "70011",
                "quays": {"Quay": {"@id": "70011", "CompassOctant": "E"}}
            }, {
                "@id": "70012",
                "Name": "San Francisco Caltrain",
                "Centroid": {"Location": {"Longitude": -122.3943, "Latitude": 37.7765}},
                "PublicCode": "70012",
                "quays": {"Quay": {"@id": "70012", "CompassOctant": "W"}}
            }]"#,
        );

        let stops = parse_stop_places(&body).unwrap();

        assert_eq!(stops.len(), 2);
        assert_eq!(stops[0].id, "70011");
        assert_eq!(stops[0].name, "San Francisco Caltrain");
        assert_eq!(stops[0].public_code, "70011");
        assert_eq!(stops[0].location, Some(Location::new(37.7764, -122.3942)));
        assert_eq!(stops[0].direction, Some(Direction::North));
        assert_eq!(stops[1].location, Some(Location::new(37.7765, -122.3943)));
        assert_eq!(stops[1].direction, Some(Direction::South));
    }

    #[test]
    fn single_stop_object() {
        let body = wrap(
            r#"{"@id": "70021", "Name": "22nd Street", "PublicCode": "70021",
                "Centroid": {"Location": {"Longitude": "-122.39", "Latitude": "37.75"}}}"#,
        );

        let stops = parse_stop_places(&body).unwrap();

        assert_eq!(stops.len(), 1);
        assert_eq!(stops[0].direction, None);
    }

    #[test]
    fn partial_centroid_is_no_location() {
        for centroid in [
            r#"null"#,
            r#"{"Location": null}"#,
            r#"{"Location": {"Longitude": null, "Latitude": "37.75"}}"#,
            r#"{"Location": {"Longitude": "-122.39", "Latitude": null}}"#,
            r#"{"Location": {"Longitude": "-122.39"}}"#,
        ] {
            let body = wrap(&format!(
                r#"{{"@id": "1", "Name": "n", "PublicCode": "1", "Centroid": {centroid}}}"#
            ));
            let stops = parse_stop_places(&body).unwrap();
            assert_eq!(stops[0].location, None, "centroid {centroid}");
        }
    }

    #[test]
    fn absent_heading_is_not_an_error() {
        for quays in [
            r#"null"#,
            r#"{"Quay": null}"#,
            r#"{"Quay": {"@id": "1"}}"#,
            r#"{"Quay": []}"#,
        ] {
            let body = wrap(&format!(
                r#"{{"@id": "1", "Name": "n", "PublicCode": "1", "quays": {quays}}}"#
            ));
            let stops = parse_stop_places(&body).unwrap();
            assert_eq!(stops[0].direction, None, "quays {quays}");
        }
    }

    #[test]
    fn first_quay_decides_heading() {
        let body = wrap(
            r#"{"@id": "1", "Name": "n", "PublicCode": "1",
                "quays": {"Quay": [{"CompassOctant": "E"}, {"CompassOctant": "W"}]}}"#,
        );
        let stops = parse_stop_places(&body).unwrap();
        assert_eq!(stops[0].direction, Some(Direction::North));
    }

    #[test]
    fn missing_name_reports_path() {
        let body = wrap(r#"[{"@id": "1", "Name": "a", "PublicCode": "1"}, {"@id": "2", "PublicCode": "2"}]"#);

        let err = parse_stop_places(&body).unwrap_err();

        assert_eq!(
            err,
            PayloadError::MissingField {
                endpoint: Endpoint::StopPlaces,
                path: "Siri.ServiceDelivery.DataObjectDelivery.dataObjects.SiteFrame.stopPlaces.StopPlace[1].Name".into(),
            }
        );
    }

    #[test]
    fn missing_container_reports_path() {
        let body = r#"{"Siri": {"ServiceDelivery": {}}}"#;

        let err = parse_stop_places(body).unwrap_err();

        assert_eq!(
            err.to_string(),
            "stopPlaces: missing required field Siri.ServiceDelivery.DataObjectDelivery"
        );
    }

    #[test]
    fn non_numeric_coordinate_is_invalid() {
        let body = wrap(
            r#"{"@id": "1", "Name": "n", "PublicCode": "1",
                "Centroid": {"Location": {"Longitude": "west", "Latitude": "37.75"}}}"#,
        );

        let err = parse_stop_places(&body).unwrap_err();

        assert!(matches!(err, PayloadError::InvalidField { ref path, .. }
            if path.ends_with("StopPlace[0].Centroid.Location.Longitude")));
    }
}
