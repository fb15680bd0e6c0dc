//! `/holidays` parsing.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::domain::{AvailabilityCondition, DayType, parse_days_of_week};
use crate::open511::endpoint::Endpoint;
use crate::open511::types::{AvailabilityConditionDto, DayTypeDto, HolidaysResponse};

use super::{FieldPath, PayloadError, decode};

/// Day types and raw availability overrides from one `/holidays` response.
///
/// The overrides are not merged here; see [`crate::calendar`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Holidays {
    pub day_types: Vec<DayType>,
    pub conditions: Vec<AvailabilityCondition>,
}

/// Parse a `/holidays` body.
pub fn parse_holidays(body: &str) -> Result<Holidays, PayloadError> {
    let response: HolidaysResponse = decode(Endpoint::Holidays, body)?;

    let path = FieldPath::root(Endpoint::Holidays).field("Content");
    let content = path.require(response.content.as_ref())?;

    let day_types_path = path.field("DayType");
    let day_types = day_types_path
        .require(content.day_type.as_ref())?
        .as_slice()
        .iter()
        .enumerate()
        .map(|(idx, dto)| convert_day_type(dto, &day_types_path.index(idx)))
        .collect::<Result<Vec<_>, _>>()?;

    // A calendar with no overrides at all is plausible outside holiday season.
    let conditions_path = path.field("AvailabilityConditions");
    let conditions = content
        .availability_conditions
        .as_ref()
        .map(|c| c.as_slice())
        .unwrap_or(&[])
        .iter()
        .enumerate()
        .map(|(idx, dto)| convert_condition(dto, &conditions_path.index(idx)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Holidays {
        day_types,
        conditions,
    })
}

fn convert_day_type(dto: &DayTypeDto, path: &FieldPath) -> Result<DayType, PayloadError> {
    let id = path.field("id").require(dto.id.as_ref())?;
    let name = path.field("Name").require(dto.name.as_ref())?;

    let path = path.field("properties");
    let properties = path.require(dto.properties.as_ref())?;
    let path = path.field("PropertyOfDay");
    let property = path.require(properties.property_of_day.as_ref())?;
    let path = path.field("DaysOfWeek");
    let days = path.require(property.days_of_week.as_ref())?;

    Ok(DayType {
        id: id.clone(),
        name: name.clone(),
        days: parse_days_of_week(days).map_err(|e| path.invalid(e))?,
    })
}

fn convert_condition(
    dto: &AvailabilityConditionDto,
    path: &FieldPath,
) -> Result<AvailabilityCondition, PayloadError> {
    let id = path.field("id").require(dto.id.as_ref())?;

    let date_path = path.field("FromDate");
    let from_date = date_path.require(dto.from_date.as_ref())?;
    let date = parse_calendar_date(from_date)
        .ok_or_else(|| date_path.invalid(format!("not a date: {from_date:?}")))?;

    let flag_path = path.field("IsAvailable");
    let is_available = flag_path
        .require(dto.is_available.as_ref())?
        .as_bool()
        .ok_or_else(|| flag_path.invalid("expected true or false"))?;

    // The upstream sends a bare reference for one day type and a list for
    // several; both become a list here.
    let refs_path = path.field("dayTypes");
    let day_types = refs_path.require(dto.day_types.as_ref())?;
    let refs_path = refs_path.field("DayTypeRef");
    let day_type_refs = refs_path
        .require(day_types.day_type_ref.as_ref())?
        .as_slice()
        .iter()
        .enumerate()
        .map(|(idx, r)| {
            refs_path
                .index(idx)
                .require_ref(Some(r))
                .map(str::to_string)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(AvailabilityCondition {
        id: id.clone(),
        date,
        day_type_refs,
        is_available,
    })
}

/// Parse a date or date-time string, keeping only the calendar date.
///
/// Offsets, when present, are not applied: the date is the one written.
fn parse_calendar_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    const HOLIDAYS: &str = r#"{"Content": {
        "DayType": [
            {"id": "WD", "Name": "Weekday",
             "properties": {"PropertyOfDay": {"DaysOfWeek": "Monday Tuesday Wednesday Thursday Friday "}}},
            {"id": "SAT", "Name": "Saturday",
             "properties": {"PropertyOfDay": {"DaysOfWeek": "Saturday"}}}
        ],
        "AvailabilityConditions": [
            {"id": "AC1", "FromDate": "2018-12-25T00:00:00", "ToDate": "2018-12-25T23:59:00",
             "dayTypes": {"DayTypeRef": {"ref": "WD"}}, "IsAvailable": "false"},
            {"id": "AC2", "FromDate": "2018-12-25T00:00:00",
             "dayTypes": {"DayTypeRef": [{"ref": "SAT"}, {"ref": "SUN"}]}, "IsAvailable": "true"}
        ]
    }}"#;

    #[test]
    fn parse_day_types() {
        let holidays = parse_holidays(HOLIDAYS).unwrap();

        assert_eq!(holidays.day_types.len(), 2);
        let weekday = &holidays.day_types[0];
        assert_eq!(weekday.id, "WD");
        assert_eq!(weekday.name, "Weekday");
        assert_eq!(weekday.days.len(), 5);
        assert!(weekday.includes(Weekday::Fri));
        assert_eq!(holidays.day_types[1].days, vec![Weekday::Sat]);
    }

    #[test]
    fn normalizes_single_and_list_refs() {
        let holidays = parse_holidays(HOLIDAYS).unwrap();
        let christmas = NaiveDate::from_ymd_opt(2018, 12, 25).unwrap();

        assert_eq!(
            holidays.conditions,
            vec![
                AvailabilityCondition {
                    id: "AC1".into(),
                    date: christmas,
                    day_type_refs: vec!["WD".into()],
                    is_available: false,
                },
                AvailabilityCondition {
                    id: "AC2".into(),
                    date: christmas,
                    day_type_refs: vec!["SAT".into(), "SUN".into()],
                    is_available: true,
                },
            ]
        );
    }

    #[test]
    fn boolean_flag_and_missing_conditions() {
        let body = r#"{"Content": {
            "DayType": {"id": "SUN", "Name": "Sunday",
                        "properties": {"PropertyOfDay": {"DaysOfWeek": "Sunday"}}}
        }}"#;

        let holidays = parse_holidays(body).unwrap();

        assert_eq!(holidays.day_types.len(), 1);
        assert!(holidays.conditions.is_empty());

        let body = r#"{"Content": {"DayType": [], "AvailabilityConditions": {
            "id": "AC9", "FromDate": "2019-07-04", "IsAvailable": true,
            "dayTypes": {"DayTypeRef": {"ref": "SUN"}}}}}"#;

        let holidays = parse_holidays(body).unwrap();

        assert!(holidays.conditions[0].is_available);
        assert_eq!(
            holidays.conditions[0].date,
            NaiveDate::from_ymd_opt(2019, 7, 4).unwrap()
        );
    }

    #[test]
    fn date_time_discarded() {
        assert_eq!(
            parse_calendar_date("2018-11-22T00:00:00-08:00"),
            NaiveDate::from_ymd_opt(2018, 11, 22)
        );
        assert_eq!(
            parse_calendar_date("2018-11-22T17:30:00.000"),
            NaiveDate::from_ymd_opt(2018, 11, 22)
        );
        assert_eq!(parse_calendar_date("Thanksgiving"), None);
    }

    #[test]
    fn day_type_with_no_days() {
        let body = r#"{"Content": {"DayType": [
            {"id": "HOL", "Name": "Holiday", "properties": {"PropertyOfDay": {"DaysOfWeek": "none"}}}
        ]}}"#;

        let holidays = parse_holidays(body).unwrap();

        assert_eq!(holidays.day_types[0].id, "HOL");
        assert!(holidays.day_types[0].days.is_empty());
    }

    #[test]
    fn unknown_day_name_reports_path() {
        let body = r#"{"Content": {"DayType": [
            {"id": "X", "Name": "X", "properties": {"PropertyOfDay": {"DaysOfWeek": "Caturday"}}}
        ]}}"#;

        let err = parse_holidays(body).unwrap_err();

        assert_eq!(
            err,
            PayloadError::InvalidField {
                endpoint: Endpoint::Holidays,
                path: "Content.DayType[0].properties.PropertyOfDay.DaysOfWeek".into(),
                reason: "unknown day name: \"Caturday\"".into(),
            }
        );
    }

    #[test]
    fn bad_flag_is_invalid() {
        let body = r#"{"Content": {"DayType": [], "AvailabilityConditions": [
            {"id": "AC1", "FromDate": "2018-12-25", "IsAvailable": "sometimes",
             "dayTypes": {"DayTypeRef": {"ref": "WD"}}}]}}"#;

        let err = parse_holidays(body).unwrap_err();

        assert!(matches!(err, PayloadError::InvalidField { ref path, .. }
            if path == "Content.AvailabilityConditions[0].IsAvailable"));
    }

    #[test]
    fn missing_refs_reports_path() {
        let body = r#"{"Content": {"DayType": [], "AvailabilityConditions": [
            {"id": "AC1", "FromDate": "2018-12-25", "IsAvailable": "true", "dayTypes": {}}]}}"#;

        let err = parse_holidays(body).unwrap_err();

        assert_eq!(
            err.to_string(),
            "holidays: missing required field Content.AvailabilityConditions[0].dayTypes.DayTypeRef"
        );
    }
}
