//! Domain types for the Caltrain schedule sync.
//!
//! These are the flat records the upstream payloads are normalized into.
//! Values are built fresh every sync cycle and carry no behaviour beyond
//! construction, small accessors, and serialization for the store.

mod calendar;
mod direction;
mod line;
mod location;
mod prediction;
mod schedule;
mod stop;
mod time;

pub use calendar::{
    Availability, AvailabilityCondition, DayType, UnknownDayName, date_millis, parse_days_of_week,
};
pub use direction::Direction;
pub use line::{LineType, UnknownLineType};
pub use location::Location;
pub use prediction::{PredictedEvent, PredictionsSnapshot, StopPredictions};
pub use schedule::{StopTime, Timetable, TrainSchedule};
pub use stop::{Route, Stop};
pub use time::{TimeError, TrainTime};
