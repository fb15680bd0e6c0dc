//! Direction of travel along the Caltrain corridor.

use std::fmt;

use serde::Serialize;

/// Direction a train travels, or the direction of trains served by a platform.
///
/// The corridor runs San Francisco (north) to Gilroy (south), so every
/// service is one of the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    North,
    South,
}

impl Direction {
    /// Derive a direction from a platform's compass-octant code.
    ///
    /// Caltrain platforms facing east serve northbound trains; every other
    /// octant is treated as southbound.
    ///
    /// ```
    /// use caltrain_sync::domain::Direction;
    ///
    /// assert_eq!(Direction::from_compass_octant("E"), Direction::North);
    /// assert_eq!(Direction::from_compass_octant("W"), Direction::South);
    /// ```
    pub fn from_compass_octant(octant: &str) -> Self {
        if octant == "E" {
            Direction::North
        } else {
            Direction::South
        }
    }

    /// Derive a direction from a route or journey direction reference.
    ///
    /// References beginning with `N` are northbound, everything else south.
    ///
    /// ```
    /// use caltrain_sync::domain::Direction;
    ///
    /// assert_eq!(Direction::from_reference("N"), Direction::North);
    /// assert_eq!(Direction::from_reference("NB"), Direction::North);
    /// assert_eq!(Direction::from_reference("S"), Direction::South);
    /// ```
    pub fn from_reference(reference: &str) -> Self {
        if reference.starts_with('N') {
            Direction::North
        } else {
            Direction::South
        }
    }

    /// Returns the storage spelling (`NORTH` or `SOUTH`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::North => "NORTH",
            Direction::South => "SOUTH",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
