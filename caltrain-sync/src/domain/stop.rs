//! Stops and routes.

use serde::Serialize;

use super::{Direction, LineType, Location};

/// A boarding point (platform) on the network.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stop {
    /// Stop id, referenced by routes and stop times.
    pub id: String,

    /// Human-readable name, e.g. "San Francisco Caltrain".
    pub name: String,

    /// Platform location, if the upstream provides a complete one.
    pub location: Option<Location>,

    /// Rider-facing stop code.
    pub public_code: String,

    /// Direction of trains calling at this platform, if known.
    pub direction: Option<Direction>,
}

/// An ordered sequence of stops served by one line in one direction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub id: String,
    pub name: String,

    /// Service tier this route belongs to.
    pub line: LineType,

    pub direction: Direction,

    /// Stop ids in physical travel order.
    pub stops: Vec<String>,
}
