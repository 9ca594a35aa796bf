//! Detection service
//!
//! Resolves detected frequencies to commands, records them in the selection
//! log, and answers log queries. Acquisition is simulated: every detection
//! waits a random delay and a small share of detections report a fault.

mod auth;
mod clock;
mod entropy;

pub use auth::AdminKey;
pub use clock::{Clock, ManualClock, SystemClock};
pub use entropy::{Entropy, StdEntropy};

use crate::config::{DaemonConfig, DetectionConfig};
use crate::error::{ServiceError, ServiceResult, SIMULATED_FAULT};
use crate::storage::{InMemoryStorage, Storage, StorageStats};
use chrono::Local;
use ssvep_types::{
    ClearResult, DetectRequest, DetectionResult, FrequencyCommand, FrequencyTable, LogAnalytics,
    LogEntry, LogQuery, SystemStats,
};
use std::sync::Arc;
use std::time::Duration;

/// Detection and logging service
pub struct DetectionService {
    storage: Arc<dyn Storage>,
    table: FrequencyTable,
    clock: Arc<dyn Clock>,
    entropy: Arc<dyn Entropy>,
    admin_key: AdminKey,
    config: DetectionConfig,
}

impl DetectionService {
    pub fn new(
        storage: Arc<dyn Storage>,
        clock: Arc<dyn Clock>,
        entropy: Arc<dyn Entropy>,
        admin_key: AdminKey,
        config: DetectionConfig,
    ) -> Self {
        Self {
            storage,
            table: FrequencyTable::standard(),
            clock,
            entropy,
            admin_key,
            config,
        }
    }

    /// Service with in-memory storage, wall-clock time and OS entropy
    pub fn from_config(config: &DaemonConfig) -> Self {
        Self::new(
            Arc::new(InMemoryStorage::new(config.detection.log_capacity)),
            Arc::new(SystemClock),
            Arc::new(StdEntropy::from_entropy()),
            AdminKey::new(&config.admin.key),
            config.detection.clone(),
        )
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Resolve and record a detection.
    ///
    /// Invalid requests fail before any state changes. Once the selection is
    /// recorded the simulated delay always elapses, and a simulated fault only
    /// changes what the caller sees: the selection stays recorded.
    pub async fn detect(&self, request: DetectRequest) -> ServiceResult<DetectionResult> {
        let detection = request.validate().map_err(|err| {
            tracing::warn!(error = %err, "Rejected detection request");
            ServiceError::Validation(err)
        })?;

        let command = self.table.resolve(detection.frequency);
        let entry = LogEntry {
            frequency: detection.frequency,
            command: command.clone(),
            timestamp: self.clock.now(),
            user_id: detection.user_id.clone(),
            command_id: detection.command_id.clone(),
        };
        let timestamp = entry.timestamp;

        self.storage.record_selection(entry).await?;

        let processing_time = self.processing_delay_ms();
        let delay = Duration::try_from_secs_f64(processing_time / 1000.0).unwrap_or_default();
        tokio::time::sleep(delay).await;

        if self.entropy.unit() < self.config.fault_rate {
            tracing::error!(
                frequency = %detection.frequency,
                command = %command,
                "{}",
                SIMULATED_FAULT
            );
            return Err(ServiceError::Fault(SIMULATED_FAULT.to_string()));
        }

        tracing::debug!(
            frequency = %detection.frequency,
            command = %command,
            user_id = ?detection.user_id,
            processing_ms = processing_time,
            "Detected command"
        );

        Ok(DetectionResult {
            command,
            frequency: detection.frequency,
            timestamp,
            processing_time,
            success: true,
            user_id: detection.user_id,
            command_id: detection.command_id,
        })
    }

    /// Query the selection log.
    ///
    /// Analytics cover every entry matching the filter; `logs` holds at most
    /// `limit` of them, most recent first.
    pub async fn query(&self, user_id: Option<&str>, limit: usize) -> ServiceResult<LogQuery> {
        let user_id = user_id.filter(|id| !id.is_empty());
        let snapshot = self.storage.snapshot(user_id).await?;
        let now = self.clock.now();

        let analytics = LogAnalytics::compute(&snapshot.entries, now, &Local);

        let mut logs = snapshot.entries;
        // Stable: equal timestamps keep insertion order
        logs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        logs.truncate(limit);

        Ok(LogQuery {
            logs,
            analytics,
            user_activity: snapshot.user_activity,
            system_stats: SystemStats::new(snapshot.total_users, snapshot.total_logs, now),
        })
    }

    /// Wipe the selection log and all activity records
    pub async fn clear(&self, admin_key: &str) -> ServiceResult<ClearResult> {
        if !self.admin_key.verify(admin_key) {
            tracing::warn!("Rejected log clear: invalid admin key");
            return Err(ServiceError::Unauthorized);
        }

        let cleared = self.storage.clear().await?;
        tracing::info!(cleared_entries = cleared, "Cleared selection log");

        Ok(ClearResult::new(cleared, self.clock.now()))
    }

    /// The frequency table, ascending
    pub fn frequencies(&self) -> Vec<FrequencyCommand> {
        self.table.entries()
    }

    pub async fn stats(&self) -> ServiceResult<StorageStats> {
        Ok(self.storage.stats().await?)
    }

    /// Delay in `[min, max)` milliseconds
    fn processing_delay_ms(&self) -> f64 {
        let span = self.config.max_latency_ms - self.config.min_latency_ms;
        self.config.min_latency_ms + self.entropy.unit() * span
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use crate::error::StorageError;
    use crate::storage::{LogSnapshot, StorageResult};
    use ssvep_types::{Frequency, ValidationError};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Plays back fixed samples, then repeats the last one
    struct Scripted(Mutex<VecDeque<f64>>);

    impl Scripted {
        fn new(samples: &[f64]) -> Arc<Self> {
            Arc::new(Self(Mutex::new(samples.iter().copied().collect())))
        }
    }

    impl Entropy for Scripted {
        fn unit(&self) -> f64 {
            let mut samples = self.0.lock().unwrap();
            if samples.len() > 1 {
                samples.pop_front().unwrap()
            } else {
                samples.front().copied().unwrap_or(0.5)
            }
        }
    }

    struct Harness {
        service: DetectionService,
        clock: Arc<ManualClock>,
        storage: Arc<InMemoryStorage>,
    }

    fn harness(entropy: Arc<dyn Entropy>, capacity: usize) -> Harness {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap(),
        ));
        let storage = Arc::new(InMemoryStorage::new(capacity));
        let service = DetectionService::new(
            storage.clone(),
            clock.clone(),
            entropy,
            AdminKey::new("admin-secret-key"),
            DetectionConfig {
                log_capacity: capacity,
                ..Default::default()
            },
        );
        Harness {
            service,
            clock,
            storage,
        }
    }

    fn never_faults() -> Arc<dyn Entropy> {
        Scripted::new(&[0.5])
    }

    #[tokio::test(start_paused = true)]
    async fn test_detect_known_and_custom_frequencies() {
        let h = harness(never_faults(), 1000);

        let water = h.service.detect(DetectRequest::new(15.0)).await.unwrap();
        assert_eq!(water.command, "Water");
        assert!(water.success);

        let custom = h.service.detect(DetectRequest::new(99.0)).await.unwrap();
        assert_eq!(custom.command, "Custom Command (99 Hz)");
        assert_eq!(custom.frequency, Frequency::from(99));
    }

    #[tokio::test(start_paused = true)]
    async fn test_processing_time_follows_entropy() {
        let h = harness(Scripted::new(&[0.0, 0.5, 0.999, 0.5]), 1000);

        let first = h.service.detect(DetectRequest::new(10.0)).await.unwrap();
        assert_eq!(first.processing_time, 50.0);

        let second = h.service.detect(DetectRequest::new(10.0)).await.unwrap();
        assert!((second.processing_time - 249.8).abs() < 1e-9);
        assert!(second.processing_time < 250.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_detect_waits_for_processing_delay() {
        let h = harness(Scripted::new(&[0.5, 0.5]), 1000);
        let started = tokio::time::Instant::now();

        let result = h.service.detect(DetectRequest::new(12.0)).await.unwrap();

        assert_eq!(result.processing_time, 150.0);
        assert!(started.elapsed() >= Duration::from_millis(150));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_frequency_changes_nothing() {
        let h = harness(never_faults(), 1000);

        let err = h
            .service
            .detect(DetectRequest::new(0.0).with_user("u1"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ValidationError::Zero)));

        let stats = h.storage.stats().await.unwrap();
        assert_eq!(stats.total_logs, 0);
        assert_eq!(stats.total_users, 0);
    }

    /// Backend whose every call fails
    struct Offline;

    #[async_trait::async_trait]
    impl Storage for Offline {
        async fn record_selection(&self, _entry: LogEntry) -> StorageResult<()> {
            Err(StorageError::Unavailable("offline".to_string()))
        }

        async fn snapshot(&self, _user_id: Option<&str>) -> StorageResult<LogSnapshot> {
            Err(StorageError::Unavailable("offline".to_string()))
        }

        async fn clear(&self) -> StorageResult<usize> {
            Err(StorageError::Unavailable("offline".to_string()))
        }

        async fn stats(&self) -> StorageResult<StorageStats> {
            Err(StorageError::Unavailable("offline".to_string()))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_storage_failures_surface_as_storage_errors() {
        let service = DetectionService::new(
            Arc::new(Offline),
            Arc::new(ManualClock::new(Utc::now())),
            never_faults(),
            AdminKey::new("admin-secret-key"),
            DetectionConfig::default(),
        );

        let err = service.detect(DetectRequest::new(10.0)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Storage(StorageError::Unavailable(_))));

        let err = service.query(None, 50).await.unwrap_err();
        assert!(matches!(err, ServiceError::Storage(_)));

        let err = service.clear("admin-secret-key").await.unwrap_err();
        assert!(matches!(err, ServiceError::Storage(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_request_changes_nothing() {
        let h = harness(never_faults(), 1000);
        let request = DetectRequest {
            frequency: Some(serde_json::json!("15")),
            user_id: Some("u1".to_string()),
            command_id: None,
        };

        let err = h.service.detect(request).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let stats = h.storage.stats().await.unwrap();
        assert_eq!(stats.total_logs, 0);
        assert_eq!(stats.total_users, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fault_keeps_recorded_selection() {
        // latency sample, then a fault roll below 1%
        let h = harness(Scripted::new(&[0.5, 0.001]), 1000);

        let err = h
            .service
            .detect(DetectRequest::new(17.0).with_user("u1"))
            .await
            .unwrap_err();
        assert!(matches!(&err, ServiceError::Fault(msg) if msg == SIMULATED_FAULT));

        let query = h.service.query(Some("u1"), 50).await.unwrap();
        assert_eq!(query.logs.len(), 1);
        assert_eq!(query.logs[0].command, "Help");
        assert_eq!(query.user_activity.unwrap().total_commands, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_activity_counts_per_user() {
        let h = harness(never_faults(), 1000);
        for frequency in [10.0, 10.0, 12.0] {
            h.service
                .detect(DetectRequest::new(frequency).with_user("u1"))
                .await
                .unwrap();
        }
        h.service
            .detect(DetectRequest::new(10.0).with_user("u2"))
            .await
            .unwrap();

        let query = h.service.query(Some("u1"), 50).await.unwrap();
        let activity = query.user_activity.unwrap();
        assert_eq!(activity.total_commands, 3);
        assert_eq!(activity.usage(Frequency::from(10)), 2);
        assert_eq!(activity.usage(Frequency::from(12)), 1);
        assert_eq!(query.system_stats.total_users, 2);
        assert_eq!(query.system_stats.total_logs, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_query_sorts_and_limits() {
        let h = harness(never_faults(), 1000);
        for (i, frequency) in [10.0, 12.0, 15.0, 17.0].into_iter().enumerate() {
            h.clock.advance(chrono::Duration::seconds(i as i64 + 1));
            h.service.detect(DetectRequest::new(frequency)).await.unwrap();
        }

        let query = h.service.query(None, 2).await.unwrap();
        let commands: Vec<&str> = query.logs.iter().map(|e| e.command.as_str()).collect();
        assert_eq!(commands, vec!["Help", "Water"]);

        // analytics see the whole filtered set, not only the page
        assert_eq!(query.analytics.total_selections, 4);
        assert!((query.analytics.average_frequency - 13.5).abs() < 1e-9);
        assert!(query.user_activity.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_equal_timestamps_keep_insertion_order() {
        let h = harness(never_faults(), 1000);
        h.service.detect(DetectRequest::new(10.0)).await.unwrap();
        h.service.detect(DetectRequest::new(12.0)).await.unwrap();

        let query = h.service.query(None, 50).await.unwrap();
        let commands: Vec<&str> = query.logs.iter().map(|e| e.command.as_str()).collect();
        assert_eq!(commands, vec!["Yes", "No"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_query_filters_by_exact_user() {
        let h = harness(never_faults(), 1000);
        h.service
            .detect(DetectRequest::new(10.0).with_user("u1"))
            .await
            .unwrap();
        h.service
            .detect(DetectRequest::new(12.0).with_user("u10"))
            .await
            .unwrap();
        h.service.detect(DetectRequest::new(15.0)).await.unwrap();

        let query = h.service.query(Some("u1"), 50).await.unwrap();
        assert_eq!(query.logs.len(), 1);
        assert!(query.logs.iter().all(|e| e.user_id.as_deref() == Some("u1")));
        assert_eq!(query.analytics.average_frequency, 10.0);

        let empty = h.service.query(Some("ghost"), 50).await.unwrap();
        assert!(empty.logs.is_empty());
        assert_eq!(empty.analytics.average_frequency, 0.0);
        assert!(empty.analytics.most_used_command.is_none());

        let everyone = h.service.query(Some(""), 50).await.unwrap();
        assert_eq!(everyone.logs.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_log_retention_evicts_oldest() {
        let h = harness(never_faults(), 1000);
        for i in 1..=1001u32 {
            h.clock.advance(chrono::Duration::milliseconds(1));
            h.service
                .detect(DetectRequest::new(f64::from(i)))
                .await
                .unwrap();
        }

        let query = h.service.query(None, 2000).await.unwrap();
        assert_eq!(query.logs.len(), 1000);
        assert_eq!(query.system_stats.total_logs, 1000);
        // frequency 1 was the oldest entry
        assert!(query.logs.iter().all(|e| e.frequency.hz() != 1.0));
        assert_eq!(query.logs[0].frequency, Frequency::from(1001));
    }

    #[tokio::test(start_paused = true)]
    async fn test_system_stats_backup_is_two_hours_ago() {
        let h = harness(never_faults(), 1000);
        let query = h.service.query(None, 50).await.unwrap();
        assert_eq!(
            query.system_stats.last_backup,
            h.clock.now() - chrono::Duration::hours(2)
        );
        assert_eq!(query.system_stats.system_uptime, "99.9%");
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_requires_admin_key() {
        let h = harness(never_faults(), 1000);
        h.service
            .detect(DetectRequest::new(10.0).with_user("u1"))
            .await
            .unwrap();
        h.service.detect(DetectRequest::new(12.0)).await.unwrap();

        let err = h.service.clear("wrong").await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized));
        assert_eq!(h.storage.stats().await.unwrap().total_logs, 2);

        let cleared = h.service.clear("admin-secret-key").await.unwrap();
        assert_eq!(cleared.cleared_entries, 2);
        assert_eq!(cleared.message, "Logs cleared successfully");
        assert_eq!(cleared.timestamp, h.clock.now());

        let stats = h.storage.stats().await.unwrap();
        assert_eq!(stats.total_logs, 0);
        assert_eq!(stats.total_users, 0);
    }
}
