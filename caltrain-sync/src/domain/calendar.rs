//! Calendar day types and per-date availability overrides.

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Serialize, Serializer};

/// Error returned when a day list names something other than a weekday.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown day name: {0:?}")]
pub struct UnknownDayName(pub String);

/// A named category of calendar days, e.g. "Weekday" or "Saturday".
///
/// Trains are scheduled against day types rather than dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayType {
    pub id: String,
    pub name: String,

    /// Weekdays this day type covers, Monday first, without duplicates.
    #[serde(serialize_with = "serialize_weekdays")]
    pub days: Vec<Weekday>,
}

impl DayType {
    /// Returns true if this day type covers `weekday`.
    pub fn includes(&self, weekday: Weekday) -> bool {
        self.days.contains(&weekday)
    }
}

/// One upstream availability override entry, with its shape normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityCondition {
    pub id: String,
    pub date: NaiveDate,
    pub day_type_refs: Vec<String>,
    pub is_available: bool,
}

/// Which day types are switched on or off for one date.
///
/// Both sets are kept as given; a day type present in both is preserved
/// rather than resolved here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Availability {
    #[serde(serialize_with = "serialize_date_millis")]
    pub date: NaiveDate,
    pub available: BTreeSet<String>,
    pub unavailable: BTreeSet<String>,
}

impl Availability {
    /// An override for `date` that changes nothing yet.
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            available: BTreeSet::new(),
            unavailable: BTreeSet::new(),
        }
    }
}

/// Milliseconds since the Unix epoch at UTC midnight of `date`.
///
/// This is the storage key for availability records.
pub fn date_millis(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
}

/// Parse a whitespace-separated list of weekday names.
///
/// Accepts full day names and the aggregates `Weekdays`, `Weekend` and
/// `Everyday`, case-insensitively. `None` adds no days.
///
/// ```
/// use caltrain_sync::domain::parse_days_of_week;
/// use chrono::Weekday;
///
/// let days = parse_days_of_week(" Saturday Sunday ").unwrap();
/// assert_eq!(days, vec![Weekday::Sat, Weekday::Sun]);
///
/// let days = parse_days_of_week("Weekdays").unwrap();
/// assert_eq!(days.len(), 5);
///
/// assert!(parse_days_of_week("none").unwrap().is_empty());
/// ```
pub fn parse_days_of_week(s: &str) -> Result<Vec<Weekday>, UnknownDayName> {
    let mut present = [false; 7];

    for token in s.split_whitespace() {
        let range = match token.to_ascii_lowercase().as_str() {
            "monday" => 0..1,
            "tuesday" => 1..2,
            "wednesday" => 2..3,
            "thursday" => 3..4,
            "friday" => 4..5,
            "saturday" => 5..6,
            "sunday" => 6..7,
            "weekdays" => 0..5,
            "weekend" => 5..7,
            "everyday" => 0..7,
            "none" => 0..0,
            _ => return Err(UnknownDayName(token.to_string())),
        };
        for idx in range {
            present[idx] = true;
        }
    }

    Ok(WEEK
        .iter()
        .zip(present)
        .filter(|(_, on)| *on)
        .map(|(day, _)| *day)
        .collect())
}

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

fn serialize_weekdays<S: Serializer>(days: &[Weekday], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(days.iter().map(|d| weekday_name(*d)))
}

fn serialize_date_millis<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_i64(date_millis(*date))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_individual_days() {
        let days = parse_days_of_week("Monday Tuesday Wednesday Thursday Friday").unwrap();
        assert_eq!(
            days,
            vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri
            ]
        );
    }

    #[test]
    fn parse_orders_and_dedups() {
        let days = parse_days_of_week("Sunday  Saturday Sunday").unwrap();
        assert_eq!(days, vec![Weekday::Sat, Weekday::Sun]);
    }

    #[test]
    fn parse_aggregates() {
        assert_eq!(parse_days_of_week("Weekend").unwrap().len(), 2);
        assert_eq!(parse_days_of_week("Everyday").unwrap().len(), 7);
        assert_eq!(parse_days_of_week("weekdays Saturday").unwrap().len(), 6);
    }

    #[test]
    fn parse_empty_is_no_days() {
        assert!(parse_days_of_week("   ").unwrap().is_empty());
        assert!(parse_days_of_week("none").unwrap().is_empty());
        assert_eq!(
            parse_days_of_week("None Sunday").unwrap(),
            vec![Weekday::Sun]
        );
    }

    #[test]
    fn reject_unknown_day() {
        let err = parse_days_of_week("Monday Funday").unwrap_err();
        assert_eq!(err, UnknownDayName("Funday".into()));
    }

    #[test]
    fn day_type_serializes_names() {
        let day_type = DayType {
            id: "SAT".into(),
            name: "Saturday".into(),
            days: vec![Weekday::Sat],
        };
        assert!(day_type.includes(Weekday::Sat));
        assert!(!day_type.includes(Weekday::Sun));
        assert_eq!(
            serde_json::to_value(&day_type).unwrap(),
            serde_json::json!({"id": "SAT", "name": "Saturday", "days": ["Saturday"]})
        );
    }

    #[test]
    fn date_millis_is_utc_midnight() {
        let date = NaiveDate::from_ymd_opt(2018, 1, 1).unwrap();
        assert_eq!(date_millis(date), 1_514_764_800_000);
    }

    #[test]
    fn availability_serializes_date_as_millis() {
        let date = NaiveDate::from_ymd_opt(1970, 1, 2).unwrap();
        let mut availability = Availability::empty(date);
        availability.unavailable.insert("WD".into());
        assert_eq!(
            serde_json::to_value(&availability).unwrap(),
            serde_json::json!({"date": 86_400_000, "available": [], "unavailable": ["WD"]})
        );
    }
}
