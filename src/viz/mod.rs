//! Visualization: render a [`ChartDescription`] to **SVG** or **PNG**.
//!
//! - One scatter series in the description's marker colour, no legend
//! - Bold chart title with padding below it
//! - Reversed y axes (pace) draw smaller values higher
//! - Time x axes label ticks as `YYYY-MM-DD`
//! - Points with missing or mistyped coordinates are skipped, not fatal

pub mod util;

use crate::chart::{ChartDescription, ChartKind};
use anyhow::{Result, anyhow};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::{FontFamily, FontStyle};
use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;
use std::ops::Range;
use std::path::Path;

use util::{
    compute_left_label_area_px, drawable_points, ensure_fonts_registered, format_tick,
    padded_range, x_to_date,
};

const MARGIN: u32 = 16;
const MARKER_RADIUS: i32 = 4;
const Y_LABEL_COUNT: usize = 10;
const MAX_X_LABELS: usize = 10;

/// Plotting frame shared by all backends.
struct Frame {
    x: Range<f64>,
    y: Range<f64>,
    /// `-1.0` when the y axis is reversed: values are drawn negated and labelled back.
    y_sign: f64,
    points: Vec<(f64, f64)>,
}

impl Frame {
    fn new(chart: &ChartDescription) -> Result<Self> {
        let y_sign = if chart.y_axis.is_reversed { -1.0 } else { 1.0 };
        let points: Vec<(f64, f64)> = drawable_points(chart)
            .into_iter()
            .map(|(x, y)| (x, y * y_sign))
            .collect();
        if points.is_empty() {
            return Err(anyhow!("no data to plot"));
        }
        let (x_min, x_max) =
            padded_range(points.iter().map(|p| p.0)).ok_or_else(|| anyhow!("no valid x values"))?;
        let (y_min, y_max) =
            padded_range(points.iter().map(|p| p.1)).ok_or_else(|| anyhow!("no valid y values"))?;
        Ok(Self {
            x: x_min..x_max,
            y: y_min..y_max,
            y_sign,
            points,
        })
    }
}

/// Render `chart` to `out_path`; `.svg` selects the SVG backend, anything else PNG.
pub fn render_chart<P: AsRef<Path>>(
    chart: &ChartDescription,
    out_path: P,
    width: u32,
    height: u32,
) -> Result<()> {
    let frame = Frame::new(chart)?;
    ensure_fonts_registered()?;
    let out_path = out_path.as_ref();
    let path_string = out_path.to_string_lossy().into_owned();

    if out_path.extension().and_then(|s| s.to_str()) == Some("svg") {
        let root = SVGBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_scatter(root, chart, &frame)?;
    } else {
        let root = BitMapBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_scatter(root, chart, &frame)?;
    }
    Ok(())
}

/// Render `chart` as an SVG document in memory.
pub fn render_svg_string(chart: &ChartDescription, width: u32, height: u32) -> Result<String> {
    let frame = Frame::new(chart)?;
    ensure_fonts_registered()?;
    let mut buf = String::new();
    {
        let root = SVGBackend::with_string(&mut buf, (width, height)).into_drawing_area();
        draw_scatter(root, chart, &frame)?;
    }
    Ok(buf)
}

fn draw_scatter<DB>(
    root: DrawingArea<DB, Shift>,
    chart: &ChartDescription,
    frame: &Frame,
) -> Result<()>
where
    DB: DrawingBackend,
{
    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;

    let plot_area = if chart.title.display {
        let style = if chart.title.bold {
            FontStyle::Bold
        } else {
            FontStyle::Normal
        };
        root.titled(
            chart.title(),
            (FontFamily::SansSerif, chart.title.font_px, style),
        )
        .map_err(|e| anyhow!("{:?}", e))?
        .margin(chart.title.padding_bottom_px, 0, 0, 0)
    } else {
        root.margin(0, 0, 0, 0)
    };

    let y_sign = frame.y_sign;
    let left_label_width_px = compute_left_label_area_px(
        frame.y.start * y_sign,
        frame.y.end * y_sign,
        Y_LABEL_COUNT,
        12,
    );

    let mut cc = ChartBuilder::on(&plot_area)
        .margin(MARGIN)
        .set_label_area_size(LabelAreaPosition::Left, left_label_width_px)
        .set_label_area_size(LabelAreaPosition::Bottom, 56)
        .build_cartesian_2d(frame.x.clone(), frame.y.clone())
        .map_err(|e| anyhow!("{:?}", e))?;

    let kind = chart.kind;
    let x_label_fmt = |x: &f64| match kind {
        ChartKind::NumericScatter => format_tick(*x),
        ChartKind::TimeScatter => x_to_date(*x)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
    };
    // adding 0.0 turns -0.0 into 0.0
    let y_label_fmt = |y: &f64| format_tick(*y * y_sign + 0.0);
    let x_label_count = match kind {
        ChartKind::NumericScatter => MAX_X_LABELS,
        // avoid repeating the same day when the span is short
        ChartKind::TimeScatter => ((frame.x.end - frame.x.start).ceil() as usize + 1).clamp(2, 6),
    };

    cc.configure_mesh()
        .x_desc(chart.x_axis.title.as_str())
        .y_desc(chart.y_axis.title.as_str())
        .x_labels(x_label_count)
        .y_labels(Y_LABEL_COUNT)
        .x_label_formatter(&x_label_fmt)
        .y_label_formatter(&y_label_fmt)
        .label_style((FontFamily::SansSerif, 12))
        .axis_desc_style((FontFamily::SansSerif, 14))
        .draw()
        .map_err(|e| anyhow!("{:?}", e))?;

    let color = RGBColor(chart.series.color.0, chart.series.color.1, chart.series.color.2);
    cc.draw_series(
        frame
            .points
            .iter()
            .map(|(x, y)| Circle::new((*x, *y), MARKER_RADIUS, color.filled())),
    )
    .map_err(|e| anyhow!("{:?}", e))?;

    root.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}
