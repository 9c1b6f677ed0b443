//! Utility functions for rendering: point extraction, ranges, tick labels, fonts.

use crate::chart::{ChartDescription, ChartKind};
use ab_glyph::FontRef;
use anyhow::{Result, anyhow};
use chrono::{Datelike, NaiveDate};
use log::debug;
use plotters::style::{FontStyle, register_font};
use std::path::PathBuf;
use std::sync::OnceLock;

/// Environment variable naming a TrueType font to render with.
pub const FONT_ENV: &str = "FITNESS_PLOT_FONT";

/// Places to look for a font when `FITNESS_PLOT_FONT` is unset.
const FONT_CANDIDATES: [&str; 8] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

static FONTS: OnceLock<Result<PathBuf, String>> = OnceLock::new();

/// Register a "sans-serif" face for the `ab_glyph` text path, which cannot discover
/// OS fonts on its own. Runs the search once per process.
pub fn ensure_fonts_registered() -> Result<()> {
    match FONTS.get_or_init(register_first_available) {
        Ok(_) => Ok(()),
        Err(msg) => Err(anyhow!("{msg}")),
    }
}

/// True when a font could be registered, i.e. rendering can draw text.
pub fn fonts_available() -> bool {
    ensure_fonts_registered().is_ok()
}

fn register_first_available() -> Result<PathBuf, String> {
    let candidates = std::env::var_os(FONT_ENV)
        .map(PathBuf::from)
        .into_iter()
        .chain(FONT_CANDIDATES.iter().map(PathBuf::from));
    for path in candidates {
        let Ok(bytes) = std::fs::read(&path) else {
            continue;
        };
        let Some(bytes) = leak_if_font(bytes) else {
            debug!("skipping {}: not a usable font", path.display());
            continue;
        };
        if register_font("sans-serif", FontStyle::Normal, bytes).is_ok()
            && register_font("sans-serif", FontStyle::Bold, bytes).is_ok()
        {
            debug!("registered plot font {}", path.display());
            return Ok(path);
        }
    }
    Err(format!(
        "no usable TrueType font found; set {FONT_ENV} to the path of a .ttf file"
    ))
}

/// Parse `bytes` as a font and, only if that succeeds, keep them for the whole
/// process (registered fonts must outlive every chart).
fn leak_if_font(bytes: Vec<u8>) -> Option<&'static [u8]> {
    FontRef::try_from_slice(&bytes).ok()?;
    Some(Box::leak(bytes.into_boxed_slice()))
}

/// Dates are drawn on a day-number axis.
pub fn date_to_x(d: NaiveDate) -> f64 {
    d.num_days_from_ce() as f64
}

pub fn x_to_date(x: f64) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
}

/// Coordinates the renderer can draw, in input order. Points with a missing
/// coordinate, an x of the wrong type for the chart kind, or a non-finite value are
/// skipped.
pub fn drawable_points(chart: &ChartDescription) -> Vec<(f64, f64)> {
    let mut out = Vec::with_capacity(chart.points().len());
    for p in chart.points() {
        let x = p.x.and_then(|x| match chart.kind {
            ChartKind::NumericScatter => x.as_f64(),
            ChartKind::TimeScatter => x.as_date().map(date_to_x),
        });
        let y = p.y.and_then(|y| y.as_f64());
        if let (Some(x), Some(y)) = (x, y)
            && x.is_finite()
            && y.is_finite()
        {
            out.push((x, y));
        }
    }
    let skipped = chart.points().len() - out.len();
    if skipped > 0 {
        debug!("skipping {skipped} point(s) without usable coordinates");
    }
    out
}

/// Min/max of `values` with 5% padding on each side; a flat range is widened by ±1.
pub fn padded_range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let (mut lo, mut hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !lo.is_finite() || !hi.is_finite() {
        return None;
    }
    if (hi - lo).abs() < f64::EPSILON {
        lo -= 1.0;
        hi += 1.0;
    } else {
        let pad = (hi - lo) * 0.05;
        lo -= pad;
        hi += pad;
    }
    Some((lo, hi))
}

/// Tick label with precision by magnitude (`1234`, `12.3`, `6.88`).
pub fn format_tick(v: f64) -> String {
    let a = v.abs();
    let prec = if a >= 100.0 {
        0
    } else if a >= 10.0 {
        1
    } else {
        2
    };
    format!("{:.*}", prec, v)
}

/// Heuristic: estimate pixel width of text (Plotters has no built-in text measuring).
pub fn estimate_text_width_px(text: &str, font_px: u32) -> u32 {
    ((text.chars().count() as f32) * (font_px as f32) * 0.60).ceil() as u32
}

/// Left label area wide enough for the y tick labels between `lo` and `hi`,
/// clamped to a sensible range.
pub fn compute_left_label_area_px(lo: f64, hi: f64, ticks: usize, font_px: u32) -> u32 {
    let mut max_px = 0u32;
    for i in 0..=ticks {
        let t = if ticks == 0 {
            0.0
        } else {
            i as f64 / ticks as f64
        };
        let s = format_tick(lo + (hi - lo) * t);
        max_px = max_px.max(estimate_text_width_px(&s, font_px));
    }
    // room for the rotated axis title and tick marks
    max_px.saturating_add(18 + font_px + 8).clamp(60, 160)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_axis_round_trips() {
        let d = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert_eq!(x_to_date(date_to_x(d)), Some(d));
        assert_eq!(x_to_date(date_to_x(d) + 0.4), Some(d));
    }

    #[test]
    fn junk_font_bytes_are_not_kept() {
        assert_eq!(leak_if_font(b"definitely not a font".to_vec()), None);
        assert_eq!(leak_if_font(Vec::new()), None);
    }

    #[test]
    fn flat_range_is_widened() {
        assert_eq!(padded_range([5.0, 5.0].into_iter()), Some((4.0, 6.0)));
        assert_eq!(padded_range(std::iter::empty()), None);
        let (lo, hi) = padded_range([0.0, 10.0].into_iter()).unwrap();
        assert!((lo + 0.5).abs() < 1e-9 && (hi - 10.5).abs() < 1e-9);
    }

    #[test]
    fn tick_precision_tracks_magnitude() {
        assert_eq!(format_tick(6.876), "6.88");
        assert_eq!(format_tick(12.34), "12.3");
        assert_eq!(format_tick(1234.4), "1234");
        assert_eq!(format_tick(-6.5), "-6.50");
    }
}
