//! Per-user activity records

use crate::frequency::Frequency;
use crate::wire::{iso_millis, usage_map};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Running usage statistics for one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserActivity {
    /// Number of detections recorded for this user
    pub total_commands: u64,

    /// Time of the most recent detection
    #[serde(with = "iso_millis")]
    pub last_active: DateTime<Utc>,

    /// Detections per frequency
    #[serde(with = "usage_map")]
    pub frequency_usage: BTreeMap<Frequency, u64>,
}

impl UserActivity {
    /// Create an empty record, first seen at `at`
    pub fn new(at: DateTime<Utc>) -> Self {
        Self {
            total_commands: 0,
            last_active: at,
            frequency_usage: BTreeMap::new(),
        }
    }

    /// Count one detection at `frequency`
    pub fn record(&mut self, frequency: Frequency, at: DateTime<Utc>) {
        self.total_commands += 1;
        self.last_active = at;
        *self.frequency_usage.entry(frequency).or_insert(0) += 1;
    }

    /// Detections recorded at `frequency`
    pub fn usage(&self, frequency: Frequency) -> u64 {
        self.frequency_usage.get(&frequency).copied().unwrap_or(0)
    }
}
