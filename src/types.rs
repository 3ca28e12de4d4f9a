//! Core types for the Synheart Vigil pipeline
//!
//! This module defines the rows that flow through each stage of the pipeline
//! (raw trials, per-session scores, relative response times) and the closed
//! set of statistics the stages can be configured with.

use crate::error::ComputeError;
use crate::stats;
use serde::{Deserialize, Serialize};

/// Central-tendency statistic used for session scoring and baselines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Statistic {
    Mean,
    Median,
}

impl Statistic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Statistic::Mean => "mean",
            Statistic::Median => "median",
        }
    }

    /// Resolve a statistic by name.
    ///
    /// Any name other than `"mean"` or `"median"` is rejected here, at the
    /// configuration boundary, before any aggregation work happens.
    pub fn parse(name: &str) -> Result<Self, ComputeError> {
        match name {
            "mean" => Ok(Statistic::Mean),
            "median" => Ok(Statistic::Median),
            other => Err(ComputeError::UnknownStatistic(other.to_string())),
        }
    }

    /// Reduce a set of values with this statistic
    pub fn apply(&self, values: &[f64]) -> f64 {
        match self {
            Statistic::Mean => stats::mean(values),
            Statistic::Median => stats::median(values),
        }
    }
}

/// One raw reaction-time trial
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub user_id: String,
    /// Session the trial belongs to
    #[serde(rename = "session")]
    pub session_id: String,
    /// Reaction time; only strictly positive values are valid. Non-positive
    /// values mark premature starts and are dropped before aggregation.
    pub response_time: f64,
}

impl Measurement {
    pub fn new(
        user_id: impl Into<String>,
        session_id: impl Into<String>,
        response_time: f64,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            session_id: session_id.into(),
            response_time,
        }
    }
}

/// One aggregated score per observed (user, session) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionScore {
    pub user_id: String,
    #[serde(rename = "session")]
    pub session_id: String,
    /// Central-tendency aggregate of the session's trials
    pub response_time: f64,
}

/// Terminal output row: session score plus relative response time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelativeResponse {
    pub user_id: String,
    #[serde(rename = "session")]
    pub session_id: String,
    /// Aggregated (and possibly outlier-filtered) session score
    pub response_time: f64,
    /// Percentage deviation from the user's baseline; positive means faster
    /// than baseline
    pub rrt: f64,
}
