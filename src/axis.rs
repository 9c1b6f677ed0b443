//! Axis metadata: field keys, human-readable titles, and scale behaviour.
//!
//! Every selectable field is an [`AxisKey`]; its title, time/reversal flags and the
//! chart kind it selects on the x axis are all derived from the variant, so the
//! string comparisons of the chart layer go through one table.
//!
//! The string-based helpers ([`axis_title`], [`is_reversed`], [`is_time_axis`]) keep the
//! lenient behaviour for free-form input: an unknown key has an empty title, and only
//! the exact pace title is reversed.

use crate::chart::ChartKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const PACE_TITLE: &str = "Pace (min/km)";
pub const SPEED_TITLE: &str = "Speed (km/hr)";
pub const DISTANCE_TITLE: &str = "Distance (km)";
pub const ELEVATION_TITLE: &str = "Elevation (m)";
pub const PERCEIVED_EFFORT_TITLE: &str = "Perceived Effort (1 [very easy] - 10 [maximum effort])";
pub const DATE_TITLE: &str = "Date";

/// A plottable activity field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AxisKey {
    #[serde(rename = "pace_float_mps")]
    Pace,
    #[serde(rename = "speed_kmphr")]
    Speed,
    #[serde(rename = "distance_km")]
    Distance,
    #[serde(rename = "elevation_m")]
    Elevation,
    #[serde(rename = "perceived_effort")]
    PerceivedEffort,
    #[serde(rename = "date")]
    Date,
}

/// Keys offered for the y axis.
pub const Y_AXIS_KEYS: [AxisKey; 2] = [AxisKey::Pace, AxisKey::Speed];

/// Keys offered for the x axis.
pub const X_AXIS_KEYS: [AxisKey; 4] = [
    AxisKey::Distance,
    AxisKey::Elevation,
    AxisKey::PerceivedEffort,
    AxisKey::Date,
];

impl AxisKey {
    pub const ALL: [AxisKey; 6] = [
        AxisKey::Pace,
        AxisKey::Speed,
        AxisKey::Distance,
        AxisKey::Elevation,
        AxisKey::PerceivedEffort,
        AxisKey::Date,
    ];

    /// Field name as used by the service's JSON.
    pub fn field_key(self) -> &'static str {
        match self {
            AxisKey::Pace => "pace_float_mps",
            AxisKey::Speed => "speed_kmphr",
            AxisKey::Distance => "distance_km",
            AxisKey::Elevation => "elevation_m",
            AxisKey::PerceivedEffort => "perceived_effort",
            AxisKey::Date => "date",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            AxisKey::Pace => PACE_TITLE,
            AxisKey::Speed => SPEED_TITLE,
            AxisKey::Distance => DISTANCE_TITLE,
            AxisKey::Elevation => ELEVATION_TITLE,
            AxisKey::PerceivedEffort => PERCEIVED_EFFORT_TITLE,
            AxisKey::Date => DATE_TITLE,
        }
    }

    pub fn from_field_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.field_key() == key)
    }

    /// Exact reverse lookup of [`AxisKey::title`].
    pub fn from_title(title: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.title() == title)
    }

    pub fn is_time_axis(self) -> bool {
        matches!(self, AxisKey::Date)
    }

    /// Smaller pace is faster, so pace is drawn with better values higher.
    pub fn is_reversed(self) -> bool {
        matches!(self, AxisKey::Pace)
    }

    /// Chart kind this key selects when placed on the x axis; `None` for y-only keys.
    pub fn x_chart_kind(self) -> Option<ChartKind> {
        match self {
            AxisKey::Distance | AxisKey::Elevation | AxisKey::PerceivedEffort => {
                Some(ChartKind::NumericScatter)
            }
            AxisKey::Date => Some(ChartKind::TimeScatter),
            AxisKey::Pace | AxisKey::Speed => None,
        }
    }

    pub fn allowed_on(self, role: AxisRole) -> bool {
        match role {
            AxisRole::X => X_AXIS_KEYS.contains(&self),
            AxisRole::Y => Y_AXIS_KEYS.contains(&self),
        }
    }

    pub fn spec(self) -> AxisSpec {
        AxisSpec {
            title: self.title().to_string(),
            is_time_axis: self.is_time_axis(),
            is_reversed: self.is_reversed(),
        }
    }
}

impl fmt::Display for AxisKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown axis key {0:?}")]
pub struct UnknownAxisKey(pub String);

impl FromStr for AxisKey {
    type Err = UnknownAxisKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        AxisKey::from_field_key(s).ok_or_else(|| UnknownAxisKey(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisRole {
    X,
    Y,
}

impl fmt::Display for AxisRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AxisRole::X => f.write_str("x"),
            AxisRole::Y => f.write_str("y"),
        }
    }
}

/// Resolved presentation of one axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisSpec {
    pub title: String,
    pub is_time_axis: bool,
    pub is_reversed: bool,
}

impl AxisSpec {
    /// Resolve from a field key; unknown keys get an empty title and no flags.
    pub fn for_key(key: &str) -> Self {
        Self::for_title(axis_title(key))
    }

    pub fn for_title(title: &str) -> Self {
        Self {
            title: title.to_string(),
            is_time_axis: is_time_axis(title),
            is_reversed: is_reversed(title),
        }
    }
}

/// Title for a field key, or `""` when the key is not plottable.
pub fn axis_title(key: &str) -> &'static str {
    AxisKey::from_field_key(key).map(AxisKey::title).unwrap_or("")
}

/// True only for the exact pace title.
pub fn is_reversed(title: &str) -> bool {
    title == PACE_TITLE
}

/// True only for the exact date title.
pub fn is_time_axis(title: &str) -> bool {
    title == DATE_TITLE
}
