//! fitplot
//!
//! A small Rust library for working with a personal fitness-tracker service:
//! fetch logged workouts, turn them into scatter-plot descriptions, and render
//! them. Pairs with the `fitplot` CLI.
//!
//! ### Features
//! - Typed client for the tracker's activity and user endpoints
//! - Axis metadata for the plottable fields (pace, speed, distance, elevation, effort, date)
//! - Declarative chart descriptions, with reversed pace axes and date x axes
//! - A plot session that validates input, fetches once, and keeps the latest chart
//! - SVG/PNG rendering, CSV/JSON export, and per-activity summary statistics
//!
//! ### Example
//! ```no_run
//! use fitplot::{AxisKey, Client, PlotRequest, PlotSession};
//!
//! let client = Client::default();
//! let mut session = PlotSession::new();
//! let request = PlotRequest::new("3", "2025-01-01", "2025-06-01", AxisKey::Pace, AxisKey::Date);
//! let chart = session.submit(&client, &request)?;
//! fitplot::viz::render_chart(chart, "pace.svg", 1000, 600)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod api;
pub mod axis;
pub mod chart;
pub mod error;
pub mod models;
pub mod project;
pub mod session;
pub mod stats;
pub mod storage;
pub mod viz;

pub use api::Client;
pub use axis::{AxisKey, AxisSpec};
pub use chart::{ChartDescription, ChartKind};
pub use error::PlotError;
pub use models::{ActivityRecord, DateRange};
pub use project::{PlotPoint, PlotValue};
pub use session::{ActivitySource, PlotRequest, PlotSession, PlotState};
