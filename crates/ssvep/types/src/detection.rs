//! Detection requests and results

use crate::frequency::Frequency;
use crate::wire::iso_millis;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Message returned alongside a successful clear
pub const CLEARED_MESSAGE: &str = "Logs cleared successfully";

/// Reasons a detection request is rejected before any state changes
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("frequency is required")]
    MissingFrequency,

    #[error("frequency must be a number, got {0}")]
    NotANumber(String),

    #[error("frequency must be finite")]
    NonFinite,

    #[error("frequency must be non-zero")]
    Zero,
}

/// Raw detection request as sent by the UI
///
/// `frequency` is kept untyped so that a non-numeric value is reported as a
/// validation failure rather than a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectRequest {
    #[serde(default)]
    pub frequency: Option<Value>,

    #[serde(default)]
    pub user_id: Option<String>,

    #[serde(default)]
    pub command_id: Option<String>,
}

impl DetectRequest {
    /// Request for a bare frequency
    pub fn new(frequency: f64) -> Self {
        Self {
            frequency: serde_json::Number::from_f64(frequency).map(Value::Number),
            ..Default::default()
        }
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_command(mut self, command_id: impl Into<String>) -> Self {
        self.command_id = Some(command_id.into());
        self
    }

    /// Check the request and extract a typed [`Detection`].
    ///
    /// A zero frequency counts as no reading. Empty identifiers are treated
    /// as absent.
    pub fn validate(self) -> Result<Detection, ValidationError> {
        let frequency = match self.frequency {
            None | Some(Value::Null) => return Err(ValidationError::MissingFrequency),
            Some(Value::Number(number)) => number.as_f64().ok_or(ValidationError::NonFinite)?,
            Some(other) => return Err(ValidationError::NotANumber(other.to_string())),
        };
        let frequency = Frequency::new(frequency).map_err(|_| ValidationError::NonFinite)?;
        if frequency.hz() == 0.0 {
            return Err(ValidationError::Zero);
        }

        Ok(Detection {
            frequency,
            user_id: self.user_id.filter(|id| !id.is_empty()),
            command_id: self.command_id.filter(|id| !id.is_empty()),
        })
    }
}

/// A validated detection request
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub frequency: Frequency,
    pub user_id: Option<String>,
    pub command_id: Option<String>,
}

/// Outcome of a successful detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResult {
    pub command: String,
    pub frequency: Frequency,

    /// Timestamp of the recorded log entry
    #[serde(with = "iso_millis")]
    pub timestamp: DateTime<Utc>,

    /// Simulated processing delay in milliseconds
    pub processing_time: f64,

    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_id: Option<String>,
}

/// Outcome of wiping the selection log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearResult {
    pub message: String,

    /// Log length immediately before the wipe
    pub cleared_entries: usize,

    #[serde(with = "iso_millis")]
    pub timestamp: DateTime<Utc>,
}

impl ClearResult {
    pub fn new(cleared_entries: usize, timestamp: DateTime<Utc>) -> Self {
        Self {
            message: CLEARED_MESSAGE.to_string(),
            cleared_entries,
            timestamp,
        }
    }
}
