//! Chart selection and declarative chart descriptions.
//!
//! A [`ChartDescription`] is everything a plotting surface needs to draw one scatter
//! plot: the title and its style, both axis specs, and a single unlabelled series.
//! [`viz`](crate::viz) renders it to an image; [`ChartDescription::to_chart_config`]
//! emits the equivalent JSON configuration for browser charting libraries.

use crate::axis::{AxisKey, AxisSpec};
use crate::models::ActivityRecord;
use crate::project::{PlotPoint, project};
use serde::Serialize;
use serde_json::{Value, json};
use std::fmt;

/// Marker colour of the data series.
pub const MARKER_COLOR: Rgb = Rgb(43, 125, 17);
pub const TITLE_FONT_PX: u32 = 16;
pub const TITLE_PADDING_BOTTOM_PX: u32 = 10;
pub const AXIS_FONT_PX: u32 = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// Linear x scale.
    NumericScatter,
    /// x values are calendar dates.
    TimeScatter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.0, self.1, self.2)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitleStyle {
    pub text: String,
    pub display: bool,
    pub bold: bool,
    pub font_px: u32,
    pub padding_bottom_px: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    /// Always `None`: the only series is unnamed and the legend is hidden.
    pub label: Option<String>,
    pub color: Rgb,
    pub points: Vec<PlotPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDescription {
    pub kind: ChartKind,
    pub title: TitleStyle,
    pub show_legend: bool,
    pub x_axis: AxisSpec,
    pub y_axis: AxisSpec,
    pub series: Series,
}

impl ChartDescription {
    pub fn title(&self) -> &str {
        &self.title.text
    }

    pub fn points(&self) -> &[PlotPoint] {
        &self.series.points
    }

    /// Chart.js-style scatter configuration.
    pub fn to_chart_config(&self) -> Value {
        let data: Vec<Value> = self
            .series
            .points
            .iter()
            .map(|p| json!({ "x": p.x, "y": p.y }))
            .collect();
        let weight = if self.title.bold { "bold" } else { "normal" };
        json!({
            "type": "scatter",
            "data": {
                "datasets": [{
                    "data": data,
                    "backgroundColor": self.series.color.to_string(),
                }]
            },
            "options": {
                "plugins": {
                    "title": {
                        "display": self.title.display,
                        "text": self.title.text,
                        "color": "black",
                        "font": {
                            "size": self.title.font_px,
                            "weight": weight,
                        },
                        "padding": { "bottom": self.title.padding_bottom_px },
                    },
                    "legend": { "display": self.show_legend },
                },
                "scales": {
                    "x": scale_config(&self.x_axis),
                    "y": scale_config(&self.y_axis),
                },
            },
        })
    }
}

fn scale_config(axis: &AxisSpec) -> Value {
    let mut scale = json!({
        "title": {
            "display": true,
            "text": axis.title,
            "color": "black",
            "font": { "size": AXIS_FONT_PX },
        },
        "reverse": axis.is_reversed,
        "border": { "color": "black" },
        "grid": { "tickColor": "black" },
        "ticks": { "color": "black", "font": { "size": AXIS_FONT_PX } },
    });
    if axis.is_time_axis {
        scale["type"] = json!("time");
    }
    scale
}

/// Pick the renderer for an x-axis title. Titles outside the x-axis set yield `None`.
pub fn select_chart_kind(x_title: &str) -> Option<ChartKind> {
    AxisKey::from_title(x_title).and_then(AxisKey::x_chart_kind)
}

pub fn chart_title(y_title: &str, x_title: &str) -> String {
    format!("{y_title} vs {x_title}")
}

/// Build the description for a chart, or `None` when `x_title` selects no chart kind.
pub fn build_chart(
    chart_title: &str,
    y_title: &str,
    x_title: &str,
    points: Vec<PlotPoint>,
) -> Option<ChartDescription> {
    let kind = select_chart_kind(x_title)?;
    let x_axis = AxisSpec::for_title(x_title);
    let y_axis = AxisSpec::for_title(y_title);
    debug_assert_eq!(x_axis.is_time_axis, kind == ChartKind::TimeScatter);
    Some(ChartDescription {
        kind,
        title: TitleStyle {
            text: chart_title.to_string(),
            display: true,
            bold: true,
            font_px: TITLE_FONT_PX,
            padding_bottom_px: TITLE_PADDING_BOTTOM_PX,
        },
        show_legend: false,
        x_axis,
        y_axis,
        series: Series {
            label: None,
            color: MARKER_COLOR,
            points,
        },
    })
}

/// Project `records` and build the "<y> vs <x>" chart for them.
pub fn compose(
    records: &[ActivityRecord],
    y_key: AxisKey,
    x_key: AxisKey,
) -> Option<ChartDescription> {
    let points = project(records, y_key, x_key);
    build_chart(
        &chart_title(y_key.title(), x_key.title()),
        y_key.title(),
        x_key.title(),
        points,
    )
}
