//! Decoded flight telemetry
//!
//! A [`FlightData`] maps a message-type name (`GPS`, `ATT`, `BAT`, ...) to the
//! ordered series of decoded records of that type. Decoding binary logs happens
//! upstream; this module only models and loads the decoded JSON shape:
//!
//! ```json
//! {
//!   "GPS": [{"timestamp": 1700000000.0, "fix_type": 3}],
//!   "ATT": [{"timestamp": 1700000000.1, "alt": 12.5, "roll": 1.2}]
//! }
//! ```

use crate::error::{FlightChatError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Field carrying the record time, in seconds
pub const TIMESTAMP_FIELD: &str = "timestamp";

/// One decoded telemetry record: field name to value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TelemetryRecord(BTreeMap<String, Value>);

impl TelemetryRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly useful when assembling fixtures
    ///
    /// # Examples
    ///
    /// ```
    /// use flightchat::flight_data::TelemetryRecord;
    ///
    /// let record = TelemetryRecord::new().with("alt", 12.5);
    /// assert_eq!(record.number("alt"), Some(12.5));
    /// ```
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    /// Raw value of a field
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Numeric value of a field, `None` when absent or not a number
    pub fn number(&self, field: &str) -> Option<f64> {
        self.0.get(field).and_then(Value::as_f64)
    }

    /// Numeric value of a field, falling back to `0.0`
    pub fn number_or_zero(&self, field: &str) -> f64 {
        self.number(field).unwrap_or(0.0)
    }

    /// Record timestamp in seconds
    pub fn timestamp(&self) -> Option<f64> {
        self.number(TIMESTAMP_FIELD)
    }

    /// Whether the record defines the given field at all
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Number of fields in the record
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the record has no fields
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Decoded telemetry series keyed by message type
///
/// Read-only from the point of view of the chat panel; it is replaced
/// wholesale whenever a new log is loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlightData(BTreeMap<String, Vec<TelemetryRecord>>);

impl FlightData {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style series insert
    pub fn with_series(mut self, message_type: impl Into<String>, records: Vec<TelemetryRecord>) -> Self {
        self.insert(message_type, records);
        self
    }

    /// Insert or replace the series for a message type
    pub fn insert(&mut self, message_type: impl Into<String>, records: Vec<TelemetryRecord>) {
        self.0.insert(message_type.into(), records);
    }

    /// Records of a message type, if the type is present
    pub fn series(&self, message_type: &str) -> Option<&[TelemetryRecord]> {
        self.0.get(message_type).map(Vec::as_slice)
    }

    /// Message types present, in name order
    pub fn message_types(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Total number of records across all series
    pub fn record_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    /// Whether no message type is present
    ///
    /// A mapping that names message types with empty series still counts as
    /// loaded, since that is what the decoder emits for a log with no
    /// matching messages.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse flight data from a JSON document
    ///
    /// Accepts either the bare mapping or the upload response envelope
    /// (`{"status": "success", "data": {...}}`).
    ///
    /// # Errors
    ///
    /// Returns error if the JSON is invalid or is not an object of arrays
    /// of objects
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Convert an already parsed JSON value
    ///
    /// # Errors
    ///
    /// Returns error if the value does not have the flight data shape
    pub fn from_value(value: Value) -> Result<Self> {
        let value = match value {
            Value::Object(mut map) if map.contains_key("data") && map.contains_key("status") => {
                let status = map.get("status").cloned().unwrap_or(Value::Null);
                if status.as_str() != Some("success") {
                    let detail = map
                        .get("message")
                        .or_else(|| map.get("detail"))
                        .and_then(Value::as_str)
                        .map(|m| format!(": {}", m))
                        .unwrap_or_default();
                    return Err(FlightChatError::FlightData(format!(
                        "backend reported status {}{}",
                        status, detail
                    ))
                    .into());
                }
                map.remove("data").unwrap_or(Value::Null)
            }
            other => other,
        };

        if !value.is_object() {
            return Err(FlightChatError::FlightData(
                "expected a JSON object keyed by message type".to_string(),
            )
            .into());
        }

        serde_json::from_value(value).map_err(|e| {
            FlightChatError::FlightData(format!("unexpected flight data shape: {}", e)).into()
        })
    }

    /// Load flight data from a JSON file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            FlightChatError::FlightData(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let data = Self::from_json_str(&contents)?;
        tracing::info!(
            path = %path.display(),
            message_types = data.0.len(),
            records = data.record_count(),
            "Loaded flight data"
        );
        Ok(data)
    }

    /// Copy of the data without records stamped before `start_time`
    ///
    /// Records that carry no timestamp are dropped as well.
    pub fn trimmed_from(&self, start_time: f64) -> Self {
        let series = self
            .0
            .iter()
            .map(|(name, records)| {
                let kept = records
                    .iter()
                    .filter(|r| r.timestamp().is_some_and(|t| t >= start_time))
                    .cloned()
                    .collect();
                (name.clone(), kept)
            })
            .collect();
        Self(series)
    }
}
