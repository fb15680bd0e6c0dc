//! Calendar merging.
//!
//! Combines day-type definitions with per-date availability overrides. The
//! merge is a union per date, so the order overrides arrive in never
//! matters.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate};

use crate::domain::{Availability, AvailabilityCondition, DayType};

/// Merge raw availability overrides into one [`Availability`] per date.
///
/// Refs from conditions flagged available go to `available`, the rest to
/// `unavailable`. Overlap between the two sets is kept as is.
pub fn merge_availability(
    conditions: &[AvailabilityCondition],
) -> BTreeMap<NaiveDate, Availability> {
    conditions.iter().fold(BTreeMap::new(), |mut merged, condition| {
        let entry = merged
            .entry(condition.date)
            .or_insert_with(|| Availability::empty(condition.date));
        let target = if condition.is_available {
            &mut entry.available
        } else {
            &mut entry.unavailable
        };
        target.extend(condition.day_type_refs.iter().cloned());
        merged
    })
}

/// Day types plus their merged per-date overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Calendar {
    pub day_types: Vec<DayType>,
    pub availability: BTreeMap<NaiveDate, Availability>,
}

impl Calendar {
    pub fn new(day_types: Vec<DayType>, conditions: &[AvailabilityCondition]) -> Self {
        Self {
            day_types,
            availability: merge_availability(conditions),
        }
    }

    /// Day-type ids that run on `date`.
    ///
    /// Starts from the day types covering the date's weekday, removes the
    /// date's unavailable refs and adds its available ones. An override
    /// only affects its own date.
    pub fn active_day_types(&self, date: NaiveDate) -> BTreeSet<String> {
        let weekday = date.weekday();
        let mut active: BTreeSet<String> = self
            .day_types
            .iter()
            .filter(|dt| dt.includes(weekday))
            .map(|dt| dt.id.clone())
            .collect();

        if let Some(over) = self.availability.get(&date) {
            for id in &over.unavailable {
                active.remove(id);
            }
            active.extend(over.available.iter().cloned());
        }

        active
    }
}
