//! Report encoding
//!
//! Wraps pipeline output rows in a provenance envelope: which producer
//! computed them, with which build, and when.

use crate::error::ComputeError;
use crate::types::RelativeResponse;
use crate::{PRODUCER_NAME, VIGIL_VERSION};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Producer metadata stamped on every report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Alertness report: provenance envelope plus the output rows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertnessReport {
    pub producer: ReportProducer,
    pub computed_at_utc: DateTime<Utc>,
    pub rows: Vec<RelativeResponse>,
}

/// Encoder for producing alertness reports
pub struct ReportEncoder {
    instance_id: String,
}

impl Default for ReportEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    /// Wrap output rows in a report envelope
    pub fn encode(&self, rows: Vec<RelativeResponse>) -> AlertnessReport {
        AlertnessReport {
            producer: ReportProducer {
                name: PRODUCER_NAME.to_string(),
                version: VIGIL_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            computed_at_utc: Utc::now(),
            rows,
        }
    }

    /// Encode to JSON string
    pub fn encode_to_json(&self, rows: Vec<RelativeResponse>) -> Result<String, ComputeError> {
        serde_json::to_string_pretty(&self.encode(rows)).map_err(ComputeError::JsonError)
    }
}
