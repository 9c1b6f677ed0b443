//! Typed failures of a plot submission.
//!
//! Transport and decoding problems inside [`crate::api`] stay `anyhow::Error`; the
//! orchestrator folds them into [`PlotError::Request`] so callers can tell local
//! validation failures apart from remote ones.

use crate::axis::AxisRole;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlotError {
    #[error("a user id is required")]
    MissingUserId,

    #[error("invalid date {value:?}, expected YYYY-MM-DD")]
    InvalidDate { value: String },

    #[error("start date {start} is after end date {end}")]
    InvalidDateRange { start: String, end: String },

    #[error("{key:?} cannot be plotted on the {role} axis")]
    UnsupportedAxis { role: AxisRole, key: String },

    #[error("request failed: {0}")]
    Request(String),
}

impl PlotError {
    /// True for failures detected locally, before any request is sent.
    pub fn is_validation(&self) -> bool {
        !matches!(self, PlotError::Request(_))
    }

    /// True for both malformed dates and reversed ranges.
    pub fn is_date_error(&self) -> bool {
        matches!(
            self,
            PlotError::InvalidDate { .. } | PlotError::InvalidDateRange { .. }
        )
    }
}
