//! Scheduled train times.
//!
//! The timetable gives each call as an `HH:MM:SS` clock time plus a
//! separate day offset for calls that spill past midnight. The two are
//! kept apart here: nothing in this crate folds the offset into the clock
//! time, so consumers comparing times across stops must look at both.

use std::fmt;

use serde::Serialize;

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A scheduled clock time with a day offset.
///
/// `day_offset` is zero for calls on the service day the train set out on,
/// and one (or more) once the run crosses midnight.
///
/// # Examples
///
/// ```
/// use caltrain_sync::domain::TrainTime;
///
/// let time = TrainTime::parse("23:58:00", 0).unwrap();
/// assert_eq!(time.hour(), 23);
/// assert_eq!(time.minute(), 58);
/// assert_eq!(time.to_string(), "23:58");
///
/// let after_midnight = TrainTime::parse("00:12", 1).unwrap();
/// assert_eq!(after_midnight.to_string(), "00:12+1");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TrainTime {
    hour: u8,
    minute: u8,
    day_offset: u32,
}

impl TrainTime {
    /// Create a time from its components.
    pub fn new(hour: u8, minute: u8, day_offset: u32) -> Result<Self, TimeError> {
        if hour > 23 {
            return Err(TimeError::new("hour must be 0-23"));
        }
        if minute > 59 {
            return Err(TimeError::new("minute must be 0-59"));
        }
        Ok(Self {
            hour,
            minute,
            day_offset,
        })
    }

    /// Parse a colon-delimited `HH:MM` or `HH:MM:SS` clock time.
    ///
    /// Seconds are accepted and dropped; times are kept to the minute.
    ///
    /// ```
    /// use caltrain_sync::domain::TrainTime;
    ///
    /// assert!(TrainTime::parse("04:28:00", 0).is_ok());
    /// assert!(TrainTime::parse("4:28", 0).is_ok());
    /// assert!(TrainTime::parse("0428", 0).is_err());
    /// assert!(TrainTime::parse("24:00", 0).is_err());
    /// ```
    pub fn parse(s: &str, day_offset: u32) -> Result<Self, TimeError> {
        let mut parts = s.trim().split(':');

        let hour = parts
            .next()
            .ok_or_else(|| TimeError::new("expected HH:MM format"))?;
        let minute = parts
            .next()
            .ok_or_else(|| TimeError::new("expected HH:MM format"))?;

        if let Some(seconds) = parts.next() {
            parse_component(seconds).ok_or_else(|| TimeError::new("invalid second digits"))?;
        }
        if parts.next().is_some() {
            return Err(TimeError::new("too many components"));
        }

        let hour = parse_component(hour).ok_or_else(|| TimeError::new("invalid hour digits"))?;
        let minute =
            parse_component(minute).ok_or_else(|| TimeError::new("invalid minute digits"))?;

        Self::new(hour, minute, day_offset)
    }

    /// Returns the hour (0-23).
    pub fn hour(&self) -> u8 {
        self.hour
    }

    /// Returns the minute (0-59).
    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// Returns the number of days past the service day this time falls on.
    pub fn day_offset(&self) -> u32 {
        self.day_offset
    }
}

/// Parse a one- or two-digit decimal component.
fn parse_component(s: &str) -> Option<u8> {
    if s.is_empty() || s.len() > 2 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

impl fmt::Debug for TrainTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TrainTime({:02}:{:02}+{})",
            self.hour, self.minute, self.day_offset
        )
    }
}

impl fmt::Display for TrainTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)?;
        if self.day_offset > 0 {
            write!(f, "+{}", self.day_offset)?;
        }
        Ok(())
    }
}
