//! Project activity records onto `{x, y}` pairs.

use crate::axis::AxisKey;
use crate::models::ActivityRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single coordinate: a number, or a calendar date for time axes.
///
/// Serializes untagged, so dates appear as `"2025-02-01"` and numbers as plain JSON numbers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlotValue {
    Number(f64),
    Date(NaiveDate),
}

impl PlotValue {
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            PlotValue::Number(v) => Some(v),
            PlotValue::Date(_) => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match *self {
            PlotValue::Date(d) => Some(d),
            PlotValue::Number(_) => None,
        }
    }
}

impl From<f64> for PlotValue {
    fn from(v: f64) -> Self {
        PlotValue::Number(v)
    }
}

impl From<NaiveDate> for PlotValue {
    fn from(d: NaiveDate) -> Self {
        PlotValue::Date(d)
    }
}

/// One scatter point. A `None` coordinate means the source field was missing;
/// renderers skip such points instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotPoint {
    pub x: Option<PlotValue>,
    pub y: Option<PlotValue>,
}

impl PlotPoint {
    pub fn new(x: impl Into<PlotValue>, y: impl Into<PlotValue>) -> Self {
        Self {
            x: Some(x.into()),
            y: Some(y.into()),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.x.is_some() && self.y.is_some()
    }
}

/// One point per record, in input order: `x` from `x_key`, `y` from `y_key`.
pub fn project(records: &[ActivityRecord], y_key: AxisKey, x_key: AxisKey) -> Vec<PlotPoint> {
    records
        .iter()
        .map(|r| PlotPoint {
            x: r.field(x_key),
            y: r.field(y_key),
        })
        .collect()
}

/// Like [`project`] but for raw field names; an unknown name yields `None` on that axis
/// for every point rather than an error.
pub fn project_by_field(
    records: &[ActivityRecord],
    y_field: &str,
    x_field: &str,
) -> Vec<PlotPoint> {
    let x_key = AxisKey::from_field_key(x_field);
    let y_key = AxisKey::from_field_key(y_field);
    records
        .iter()
        .map(|r| PlotPoint {
            x: x_key.and_then(|k| r.field(k)),
            y: y_key.and_then(|k| r.field(k)),
        })
        .collect()
}
