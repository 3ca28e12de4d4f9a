//! Tabular input surface
//!
//! Consumers hand the pipeline already-tabular records: JSON objects with one
//! field per column. `RecordSchema` names the columns to read from each
//! record; adaptation canonicalizes identifier scalars to strings and fails
//! the whole batch on the first missing or unreadable field, producing no
//! partial output.

use crate::error::ComputeError;
use crate::types::Measurement;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Column names for the raw measurement table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSchema {
    /// Column holding the user identifier
    pub user_column: String,
    /// Column holding the session identifier
    pub session_column: String,
    /// Column holding the reaction time
    pub response_column: String,
}

impl Default for RecordSchema {
    fn default() -> Self {
        Self {
            user_column: "user_id".to_string(),
            session_column: "session".to_string(),
            response_column: "response_time".to_string(),
        }
    }
}

impl RecordSchema {
    /// Adapt a batch of records into measurements
    pub fn measurements(&self, records: &[Value]) -> Result<Vec<Measurement>, ComputeError> {
        records.iter().map(|r| self.measurement(r)).collect()
    }

    fn measurement(&self, record: &Value) -> Result<Measurement, ComputeError> {
        let user_id = id_string(field(record, &self.user_column)?, &self.user_column)?;
        let session_id = id_string(field(record, &self.session_column)?, &self.session_column)?;
        let response_time = field(record, &self.response_column)?.as_f64().ok_or_else(|| {
            ComputeError::ParseError(format!(
                "column {} does not hold a numeric value",
                self.response_column
            ))
        })?;

        Ok(Measurement {
            user_id,
            session_id,
            response_time,
        })
    }
}

fn field<'a>(record: &'a Value, column: &str) -> Result<&'a Value, ComputeError> {
    record
        .get(column)
        .ok_or_else(|| ComputeError::MissingColumn(column.to_string()))
}

/// Canonicalize a JSON scalar identifier to a string key
fn id_string(value: &Value, column: &str) -> Result<String, ComputeError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(ComputeError::ParseError(format!(
            "column {column} does not hold a scalar identifier: {other}"
        ))),
    }
}
