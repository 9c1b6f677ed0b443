//! Fetch-and-compose orchestration for plot submissions.
//!
//! A [`PlotSession`] owns the current chart and the user-facing message. Each
//! submission moves it through `Validating -> Fetching -> {Succeeded, Failed}`:
//!
//! - validation runs locally and never touches the network;
//! - one request is sent per valid submission, without retries;
//! - a successful response replaces the chart wholesale, a failed one leaves the
//!   previous chart in place and sets a message.
//!
//! Every submission takes the next generation number. A completion is applied only
//! when it carries the latest generation, so when fetches overlap the last
//! submission wins regardless of which response arrives first.

use crate::axis::{AxisKey, AxisRole};
use crate::chart::{self, ChartDescription};
use crate::error::PlotError;
use crate::models::{ActivityRecord, DateRange};
use anyhow::Result;
use log::{debug, info, warn};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

/// Anything that can answer "activities of this user between these dates".
pub trait ActivitySource {
    fn activities_to_plot(
        &self,
        user_id: &str,
        range: &DateRange,
    ) -> Result<Vec<ActivityRecord>>;
}

/// Raw form input for one plot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlotRequest {
    pub user_id: String,
    pub start_date: String,
    pub end_date: String,
    /// Field key for the y axis, e.g. `pace_float_mps`.
    pub y_axis: String,
    /// Field key for the x axis, e.g. `date`.
    pub x_axis: String,
}

impl PlotRequest {
    pub fn new(
        user_id: impl Into<String>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
        y_axis: AxisKey,
        x_axis: AxisKey,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            start_date: start_date.into(),
            end_date: end_date.into(),
            y_axis: y_axis.field_key().to_string(),
            x_axis: x_axis.field_key().to_string(),
        }
    }

    /// Check user id, dates, then axis keys, in that order.
    pub fn validate(&self) -> Result<ValidRequest, PlotError> {
        let user_id = self.user_id.trim();
        if user_id.is_empty() {
            return Err(PlotError::MissingUserId);
        }
        let range = DateRange::parse(&self.start_date, &self.end_date)?;
        let y_axis = axis_for(&self.y_axis, AxisRole::Y)?;
        let x_axis = axis_for(&self.x_axis, AxisRole::X)?;
        Ok(ValidRequest {
            user_id: user_id.to_string(),
            range,
            y_axis,
            x_axis,
        })
    }
}

fn axis_for(key: &str, role: AxisRole) -> Result<AxisKey, PlotError> {
    key.parse::<AxisKey>()
        .ok()
        .filter(|k| k.allowed_on(role))
        .ok_or_else(|| PlotError::UnsupportedAxis {
            role,
            key: key.trim().to_string(),
        })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidRequest {
    pub user_id: String,
    pub range: DateRange,
    pub y_axis: AxisKey,
    pub x_axis: AxisKey,
}

/// Handle for an issued fetch; hand it back to [`PlotSession::complete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    request: ValidRequest,
}

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn request(&self) -> &ValidRequest {
        &self.request
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotState {
    Idle,
    Validating,
    Fetching,
    Succeeded,
    Failed,
}

/// What [`PlotSession::complete`] did with a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// A newer submission was issued; the response was dropped.
    Stale,
}

type Completion = (Ticket, Result<Vec<ActivityRecord>>);

pub struct PlotSession {
    state: PlotState,
    chart: Option<ChartDescription>,
    message: Option<String>,
    last_error: Option<PlotError>,
    generation: u64,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
}

impl Default for PlotSession {
    fn default() -> Self {
        Self::new()
    }
}

impl PlotSession {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            state: PlotState::Idle,
            chart: None,
            message: None,
            last_error: None,
            generation: 0,
            tx,
            rx,
        }
    }

    pub fn state(&self) -> PlotState {
        self.state
    }

    /// The chart from the most recent successful submission, if any.
    pub fn chart(&self) -> Option<&ChartDescription> {
        self.chart.as_ref()
    }

    /// User-facing message of the latest failure; cleared on success.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn last_error(&self) -> Option<&PlotError> {
        self.last_error.as_ref()
    }

    /// Generation of the latest submission (0 before the first one).
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_fetching(&self) -> bool {
        self.state == PlotState::Fetching
    }

    /// Validate `request` and issue a ticket for it.
    ///
    /// Invalid requests still take a generation, so a fetch that is still in flight
    /// from an earlier submission will not overwrite the failure.
    pub fn begin(&mut self, request: &PlotRequest) -> Result<Ticket, PlotError> {
        self.state = PlotState::Validating;
        self.generation += 1;
        match request.validate() {
            Ok(valid) => {
                info!(
                    "plot #{}: user {} {}..{} {} vs {}",
                    self.generation,
                    valid.user_id,
                    valid.range.start,
                    valid.range.end,
                    valid.y_axis,
                    valid.x_axis
                );
                self.state = PlotState::Fetching;
                Ok(Ticket {
                    generation: self.generation,
                    request: valid,
                })
            }
            Err(err) => {
                debug!("plot #{} rejected: {err}", self.generation);
                let message = user_message(
                    &err,
                    request.user_id.trim(),
                    request.start_date.trim(),
                    request.end_date.trim(),
                );
                self.fail(err.clone(), message);
                Err(err)
            }
        }
    }

    /// Apply the result of a fetch issued by [`begin`](Self::begin).
    pub fn complete(&mut self, ticket: Ticket, result: Result<Vec<ActivityRecord>>) -> Outcome {
        if ticket.generation != self.generation {
            debug!(
                "dropping response for plot #{} (latest is #{})",
                ticket.generation, self.generation
            );
            return Outcome::Stale;
        }
        let req = ticket.request;
        match result {
            Ok(records) => match chart::compose(&records, req.y_axis, req.x_axis) {
                Some(chart) => {
                    info!(
                        "plot #{}: {} with {} points",
                        ticket.generation,
                        chart.title(),
                        chart.points().len()
                    );
                    self.chart = Some(chart);
                    self.message = None;
                    self.last_error = None;
                    self.state = PlotState::Succeeded;
                }
                None => {
                    let err = PlotError::UnsupportedAxis {
                        role: AxisRole::X,
                        key: req.x_axis.to_string(),
                    };
                    let message = user_message(&err, &req.user_id, "", "");
                    self.fail(err, message);
                }
            },
            Err(err) => {
                warn!("plot #{} failed: {err:#}", ticket.generation);
                let err = PlotError::Request(format!("{err:#}"));
                let message = user_message(
                    &err,
                    &req.user_id,
                    &req.range.start.to_string(),
                    &req.range.end.to_string(),
                );
                self.fail(err, message);
            }
        }
        Outcome::Applied
    }

    fn fail(&mut self, err: PlotError, message: String) {
        self.state = PlotState::Failed;
        self.message = Some(message);
        self.last_error = Some(err);
    }

    /// Validate, fetch and compose in one blocking call.
    pub fn submit<S>(
        &mut self,
        source: &S,
        request: &PlotRequest,
    ) -> Result<&ChartDescription, PlotError>
    where
        S: ActivitySource + ?Sized,
    {
        let ticket = self.begin(request)?;
        let result = {
            let req = ticket.request();
            source.activities_to_plot(&req.user_id, &req.range)
        };
        self.complete(ticket, result);
        if let Some(err) = &self.last_error {
            return Err(err.clone());
        }
        self.chart
            .as_ref()
            .ok_or_else(|| PlotError::Request("no chart produced".into()))
    }

    /// Validate and start the fetch on a worker thread. The result is applied by
    /// [`poll`](Self::poll) or [`wait`](Self::wait). Returns the submission's generation.
    pub fn submit_in_background<S>(
        &mut self,
        source: Arc<S>,
        request: &PlotRequest,
    ) -> Result<u64, PlotError>
    where
        S: ActivitySource + Send + Sync + 'static,
    {
        let ticket = self.begin(request)?;
        let generation = ticket.generation;
        let tx = self.tx.clone();
        thread::spawn(move || {
            let result = {
                let req = ticket.request();
                source.activities_to_plot(&req.user_id, &req.range)
            };
            // The session may be gone; nobody is left to care.
            let _ = tx.send((ticket, result));
        });
        Ok(generation)
    }

    /// Apply every completion that has arrived, without blocking.
    pub fn poll(&mut self) -> Vec<Outcome> {
        let mut outcomes = Vec::new();
        while let Ok((ticket, result)) = self.rx.try_recv() {
            outcomes.push(self.complete(ticket, result));
        }
        outcomes
    }

    /// Block until one completion arrives (or `timeout` passes) and apply it.
    pub fn wait(&mut self, timeout: Duration) -> Option<Outcome> {
        let (ticket, result) = self.rx.recv_timeout(timeout).ok()?;
        Some(self.complete(ticket, result))
    }
}

/// Text shown to the user for a failed submission.
pub fn user_message(err: &PlotError, user_id: &str, start: &str, end: &str) -> String {
    match err {
        PlotError::MissingUserId => "Please enter a user ID to plot activity data.".to_string(),
        PlotError::InvalidDate { .. } | PlotError::InvalidDateRange { .. } => {
            "No activity data to plot. Please enter correct start and end dates.".to_string()
        }
        PlotError::UnsupportedAxis { role, key } => {
            format!("Cannot plot {key:?} on the {role} axis. Please choose another field.")
        }
        PlotError::Request(_) => format!(
            "No activity data to plot for user ID {user_id} between {start} and {end}. Please try again."
        ),
    }
}
