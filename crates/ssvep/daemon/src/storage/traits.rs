//! Storage trait definitions

use crate::error::StorageError;
use async_trait::async_trait;
use ssvep_types::{LogEntry, UserActivity};

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Entries matching a query, with the related activity record
#[derive(Debug, Clone, Default)]
pub struct LogSnapshot {
    /// Matching entries in insertion order
    pub entries: Vec<LogEntry>,

    /// Activity record of the queried user, if any
    pub user_activity: Option<UserActivity>,

    /// Distinct users with an activity record
    pub total_users: usize,

    /// Unfiltered log length
    pub total_logs: usize,
}

/// Size of the stored state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageStats {
    pub total_users: usize,
    pub total_logs: usize,
    pub capacity: usize,
}

/// Storage for the selection log and user activity.
///
/// The log and the activity map form one resource: each method observes or
/// changes both as a single step.
///
/// `InMemoryStorage` never fails. [`StorageError::Unavailable`] is for
/// backends that can lose their connection.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Record a selection.
    ///
    /// Updates the owning user's activity record (created on first use),
    /// appends the entry, then evicts the oldest entries beyond capacity.
    async fn record_selection(&self, entry: LogEntry) -> StorageResult<()>;

    /// Entries belonging to `user_id`, or all entries when `None`
    async fn snapshot(&self, user_id: Option<&str>) -> StorageResult<LogSnapshot>;

    /// Empty the log and the activity map, returning the prior log length
    async fn clear(&self) -> StorageResult<usize>;

    /// Current sizes
    async fn stats(&self) -> StorageResult<StorageStats>;
}
