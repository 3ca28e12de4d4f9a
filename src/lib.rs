//! Synheart Vigil - On-device compute engine for PVT-based alertness signals
//!
//! Vigil turns raw reaction-time trials from a Psychomotor Vigilance Task
//! into a per-session alertness score through a deterministic pipeline:
//! validity filtering → session scoring → per-user outlier filtering →
//! baseline normalization.
//!
//! The output is the relative response time (RRT): the percentage deviation
//! of a session's aggregated response time from that user's own baseline.
//! Positive values mean the user was faster than their baseline, negative
//! means slower.
//!
//! ## Modules
//!
//! - **filter**: SD-window outlier predicate and fixed-point row filtering
//! - **aggregator**: user → session scoring of raw trials
//! - **normalizer**: per-user baseline deviation (the RRT itself)
//! - **pipeline**: orchestration, configuration, and the record-based API

pub mod aggregator;
pub mod encoder;
pub mod error;
pub mod filter;
pub mod normalizer;
pub mod pipeline;
pub mod schema;
pub mod stats;
pub mod types;

pub use encoder::{AlertnessReport, ReportEncoder};
pub use error::ComputeError;
pub use filter::{SdWindowFilter, DEFAULT_FILTERING_FACTOR};
pub use pipeline::{process_pvt, RrtConfig, VigilProcessor};
pub use schema::RecordSchema;
pub use types::{Measurement, RelativeResponse, SessionScore, Statistic};

/// Vigil version embedded in all report payloads
pub const VIGIL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for report payloads
pub const PRODUCER_NAME: &str = "synheart-vigil";
