//! Core types for the SSVEP command detection service
//!
//! This crate holds the data model shared by the daemon and its clients:
//! - Stimulus frequencies and the frequency-to-command table
//! - Selection log entries and per-user activity records
//! - Detection requests and results
//! - Analytics derived from the selection log

pub mod activity;
pub mod analytics;
pub mod detection;
pub mod frequency;
pub mod log;
mod wire;

pub use activity::UserActivity;
pub use analytics::{LogAnalytics, LogQuery, SystemStats, RECENT_WINDOW_HOURS, SYSTEM_UPTIME};
pub use detection::{
    ClearResult, DetectRequest, Detection, DetectionResult, ValidationError, CLEARED_MESSAGE,
};
pub use frequency::{Frequency, FrequencyCommand, FrequencyError, FrequencyTable};
pub use log::LogEntry;
