//! Pipeline orchestration
//!
//! This module provides the public API for Synheart Vigil. It composes the
//! full pipeline from raw trials to relative response times: validity
//! filtering → session scoring → per-user outlier filtering → baseline
//! normalization.

use crate::aggregator::score_sessions;
use crate::encoder::ReportEncoder;
use crate::error::ComputeError;
use crate::filter::{filter_to_fixed_point, SdWindowFilter, DEFAULT_FILTERING_FACTOR};
use crate::normalizer::relative_response_times;
use crate::schema::RecordSchema;
use crate::types::{Measurement, RelativeResponse, SessionScore, Statistic};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RrtConfig {
    /// Outlier window width in standard deviations; `None` disables
    /// filtering entirely
    pub filtering_factor: Option<f64>,
    /// Statistic collapsing a session's trials into one score
    pub session_statistic: Statistic,
    /// Statistic establishing each user's baseline
    pub baseline_statistic: Statistic,
}

impl Default for RrtConfig {
    fn default() -> Self {
        Self {
            filtering_factor: Some(DEFAULT_FILTERING_FACTOR),
            session_statistic: Statistic::Median,
            baseline_statistic: Statistic::Mean,
        }
    }
}

impl RrtConfig {
    /// Build a configuration from statistic names, rejecting unknown names
    /// before any processing starts.
    pub fn from_names(
        session_statistic: &str,
        baseline_statistic: &str,
        filtering_factor: Option<f64>,
    ) -> Result<Self, ComputeError> {
        Ok(Self {
            filtering_factor,
            session_statistic: Statistic::parse(session_statistic)?,
            baseline_statistic: Statistic::parse(baseline_statistic)?,
        })
    }
}

/// Compute relative response times from raw PVT trials.
///
/// Pipeline stages:
/// 1. Drop invalid trials: a reaction time must be strictly positive
/// 2. Score each (user, session) pair with the session statistic
/// 3. If a filtering factor is configured, filter each user's scores
///    through the SD window until stable
/// 4. Normalize each surviving score against its user's baseline
pub fn process_pvt(measurements: Vec<Measurement>, config: &RrtConfig) -> Vec<RelativeResponse> {
    // remove early starts
    let valid: Vec<Measurement> = measurements
        .into_iter()
        .filter(|m| m.response_time > 0.0)
        .collect();

    let scores = score_sessions(&valid, config.session_statistic);

    let scores = match config.filtering_factor {
        Some(factor) => filter_scores_per_user(scores, factor),
        None => scores,
    };

    relative_response_times(&scores, config.baseline_statistic)
}

/// Filter each user's session scores independently, then concatenate the
/// survivors once at the end. Groups are disjoint, so no user's window ever
/// sees another user's scores.
fn filter_scores_per_user(scores: Vec<SessionScore>, factor: f64) -> Vec<SessionScore> {
    let window = SdWindowFilter::new(factor);

    let mut groups: BTreeMap<String, Vec<SessionScore>> = BTreeMap::new();
    for score in scores {
        groups.entry(score.user_id.clone()).or_default().push(score);
    }

    let filtered: Vec<Vec<SessionScore>> = groups
        .into_values()
        .map(|group| {
            filter_to_fixed_point(group, |s| s.response_time, |values| window.mask(values))
        })
        .collect();

    filtered.into_iter().flatten().collect()
}

/// Processor tying the tabular input surface to the pipeline.
///
/// Use this when the input arrives as JSON records rather than typed
/// measurements; column names come from the configured [`RecordSchema`].
pub struct VigilProcessor {
    schema: RecordSchema,
    config: RrtConfig,
    encoder: ReportEncoder,
}

impl Default for VigilProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl VigilProcessor {
    /// Create a processor with default column names and configuration
    pub fn new() -> Self {
        Self {
            schema: RecordSchema::default(),
            config: RrtConfig::default(),
            encoder: ReportEncoder::new(),
        }
    }

    /// Create a processor with explicit column names and configuration
    pub fn with_config(schema: RecordSchema, config: RrtConfig) -> Self {
        Self {
            schema,
            config,
            encoder: ReportEncoder::new(),
        }
    }

    /// Process a batch of tabular records into relative response rows
    pub fn process_records(
        &self,
        records: &[serde_json::Value],
    ) -> Result<Vec<RelativeResponse>, ComputeError> {
        let measurements = self.schema.measurements(records)?;
        Ok(process_pvt(measurements, &self.config))
    }

    /// Process a JSON array of records and return a report payload
    pub fn process_json(&self, records_json: &str) -> Result<String, ComputeError> {
        let records: Vec<serde_json::Value> = serde_json::from_str(records_json)?;
        let rows = self.process_records(&records)?;
        self.encoder.encode_to_json(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn trial(user: &str, session: &str, rt: f64) -> Measurement {
        Measurement::new(user, session, rt)
    }

    fn no_filtering() -> RrtConfig {
        RrtConfig {
            filtering_factor: None,
            ..RrtConfig::default()
        }
    }

    fn rrt_of(rows: &[RelativeResponse], user: &str, session: &str) -> f64 {
        rows.iter()
            .find(|r| r.user_id == user && r.session_id == session)
            .expect("row missing")
            .rrt
    }

    #[test]
    fn test_default_config() {
        let config = RrtConfig::default();
        assert_eq!(config.filtering_factor, Some(2.5));
        assert_eq!(config.session_statistic, Statistic::Median);
        assert_eq!(config.baseline_statistic, Statistic::Mean);
    }

    #[test]
    fn test_config_from_names() {
        let config = RrtConfig::from_names("mean", "median", Some(1.5)).unwrap();
        assert_eq!(config.session_statistic, Statistic::Mean);
        assert_eq!(config.baseline_statistic, Statistic::Median);
        assert_eq!(config.filtering_factor, Some(1.5));
    }

    #[test]
    fn test_config_rejects_unknown_statistic() {
        let err = RrtConfig::from_names("mode", "mean", None).unwrap_err();
        assert_eq!(err.to_string(), "Unknown function: mode");

        let err = RrtConfig::from_names("median", "mode", None).unwrap_err();
        assert_eq!(err.to_string(), "Unknown function: mode");
    }

    #[test]
    fn test_non_positive_trials_never_contribute() {
        let rows = process_pvt(
            vec![
                trial("1", "1", 0.0),
                trial("1", "1", -12.0),
                trial("1", "1", 20.0),
                trial("1", "2", 40.0),
            ],
            &no_filtering(),
        );

        // Session 1 scores 20, not the median of {-12, 0, 20}
        assert_eq!(rows.len(), 2);
        let session_1 = rows.iter().find(|r| r.session_id == "1").unwrap();
        assert_eq!(session_1.response_time, 20.0);
    }

    #[test]
    fn test_session_with_only_invalid_trials_produces_no_score() {
        let rows = process_pvt(
            vec![trial("1", "1", -5.0), trial("1", "2", 30.0)],
            &no_filtering(),
        );

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].session_id, "2");
    }

    #[test]
    fn test_end_to_end_without_filtering() {
        let rows = process_pvt(
            vec![
                trial("1", "1", 10.0),
                trial("1", "1", 20.0),
                trial("1", "1", 25.0),
                trial("1", "2", 40.0),
                trial("2", "100", 60.0),
            ],
            &no_filtering(),
        );

        // Median session scores 20 and 40 give user 1 a mean baseline of 30
        assert_eq!(rows.len(), 3);
        assert!((rrt_of(&rows, "1", "1") - 100.0 / 3.0).abs() < 1e-9);
        assert!((rrt_of(&rows, "1", "2") + 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(rrt_of(&rows, "2", "100"), 0.0);
    }

    #[test]
    fn test_filtering_drops_outlier_sessions() {
        // Four ordinary sessions and one wildly slow one
        let mut trials: Vec<Measurement> = ["1", "2", "3", "4"]
            .iter()
            .enumerate()
            .map(|(i, s)| trial("1", s, 250.0 + i as f64))
            .collect();
        trials.push(trial("1", "5", 90000.0));

        let config = RrtConfig {
            filtering_factor: Some(1.2),
            ..RrtConfig::default()
        };
        let rows = process_pvt(trials, &config);

        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|r| r.session_id != "5"));
    }

    #[test]
    fn test_no_factor_keeps_every_session() {
        let trials = vec![
            trial("1", "1", 250.0),
            trial("1", "2", 260.0),
            trial("1", "3", 90000.0),
        ];
        let rows = process_pvt(trials, &no_filtering());
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn test_filtering_windows_are_per_user() {
        // User 2's slow scores must not widen user 1's window
        let trials = vec![
            trial("1", "1", 250.0),
            trial("1", "2", 251.0),
            trial("1", "3", 252.0),
            trial("2", "1", 9000.0),
            trial("2", "2", 9001.0),
            trial("2", "3", 9002.0),
        ];
        let config = RrtConfig {
            filtering_factor: Some(2.5),
            ..RrtConfig::default()
        };
        let rows = process_pvt(trials, &config);

        assert_eq!(rows.iter().filter(|r| r.user_id == "1").count(), 3);
        assert_eq!(rows.iter().filter(|r| r.user_id == "2").count(), 3);
    }

    #[test]
    fn test_identical_session_scores_all_reject_under_filtering() {
        // Zero spread collapses the window to an empty interval
        let trials = vec![
            trial("1", "1", 300.0),
            trial("1", "2", 300.0),
            trial("1", "3", 300.0),
        ];
        let rows = process_pvt(trials, &RrtConfig::default());
        assert!(rows.is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(process_pvt(Vec::new(), &RrtConfig::default()).is_empty());
    }

    #[test]
    fn test_processor_over_json_records() {
        let records = json!([
            {"user_id": 1, "session": 1, "response_time": 10.0},
            {"user_id": 1, "session": 1, "response_time": 20.0},
            {"user_id": 1, "session": 1, "response_time": 25.0},
            {"user_id": 1, "session": 2, "response_time": 40.0},
            {"user_id": 2, "session": 100, "response_time": 60.0}
        ])
        .to_string();

        let processor =
            VigilProcessor::with_config(RecordSchema::default(), no_filtering());
        let payload = processor.process_json(&records).unwrap();

        let report: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(report["producer"]["name"], "synheart-vigil");
        assert_eq!(report["rows"].as_array().unwrap().len(), 3);

        let user_2_row = report["rows"]
            .as_array()
            .unwrap()
            .iter()
            .find(|r| r["user_id"] == "2")
            .unwrap();
        assert_eq!(user_2_row["rrt"], 0.0);
    }

    #[test]
    fn test_processor_surfaces_schema_errors_unchanged() {
        let processor = VigilProcessor::new();
        let err = processor
            .process_json(r#"[{"user_id": 1, "response_time": 300.0}]"#)
            .unwrap_err();

        assert!(matches!(err, ComputeError::MissingColumn(ref c) if c == "session"));
    }

    #[test]
    fn test_processor_rejects_malformed_json() {
        let processor = VigilProcessor::new();
        assert!(matches!(
            processor.process_json("not json"),
            Err(ComputeError::JsonError(_))
        ));
    }
}
