//! Caltrain service tiers.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Error returned when a line reference names no known service tier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown line type: {0:?}")]
pub struct UnknownLineType(pub String);

/// One of the three Caltrain service tiers.
///
/// Each tier has its own timetable endpoint, selected by [`LineType::api_id`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LineType {
    Local,
    Limited,
    Bullet,
}

impl LineType {
    /// Every tier, in the default merge order.
    pub const ALL: [LineType; 3] = [LineType::Local, LineType::Limited, LineType::Bullet];

    /// The line id used by the upstream API (`line_id` query parameter and
    /// `LineRef` values).
    pub fn api_id(&self) -> &'static str {
        match self {
            LineType::Local => "Local",
            LineType::Limited => "Limited",
            LineType::Bullet => "Baby Bullet",
        }
    }

    /// The constant used in storage and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            LineType::Local => "LOCAL",
            LineType::Limited => "LIMITED",
            LineType::Bullet => "BULLET",
        }
    }
}

impl FromStr for LineType {
    type Err = UnknownLineType;

    /// Accepts both the storage constants and the upstream line ids.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOCAL" | "Local" => Ok(LineType::Local),
            "LIMITED" | "Limited" => Ok(LineType::Limited),
            "BULLET" | "Baby Bullet" => Ok(LineType::Bullet),
            other => Err(UnknownLineType(other.to_string())),
        }
    }
}

impl fmt::Display for LineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
