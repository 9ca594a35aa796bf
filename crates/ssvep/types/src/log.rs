//! Selection log entries

use crate::frequency::Frequency;
use crate::wire::iso_millis;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded detection event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Detected stimulus frequency
    pub frequency: Frequency,

    /// Resolved command label
    pub command: String,

    /// When the detection was recorded
    #[serde(with = "iso_millis")]
    pub timestamp: DateTime<Utc>,

    /// User the selection belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// Tile the UI reported as selected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_id: Option<String>,
}

impl LogEntry {
    /// Does this entry belong to the given user?
    pub fn is_for_user(&self, user_id: &str) -> bool {
        self.user_id.as_deref() == Some(user_id)
    }
}
