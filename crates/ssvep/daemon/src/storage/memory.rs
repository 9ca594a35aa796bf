//! In-memory storage implementation

use super::traits::*;
use async_trait::async_trait;
use ssvep_types::{LogEntry, UserActivity};
use std::collections::{HashMap, VecDeque};
use tokio::sync::Mutex;

#[derive(Debug, Default)]
struct SelectionState {
    log: VecDeque<LogEntry>,
    activity: HashMap<String, UserActivity>,
}

/// Process-lifetime storage; everything is lost on restart
#[derive(Debug)]
pub struct InMemoryStorage {
    state: Mutex<SelectionState>,
    capacity: usize,
}

impl InMemoryStorage {
    /// Create storage that keeps at most `capacity` log entries
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Mutex::new(SelectionState::default()),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn record_selection(&self, entry: LogEntry) -> StorageResult<()> {
        let mut state = self.state.lock().await;

        if let Some(user_id) = &entry.user_id {
            state
                .activity
                .entry(user_id.clone())
                .or_insert_with(|| UserActivity::new(entry.timestamp))
                .record(entry.frequency, entry.timestamp);
        }

        state.log.push_back(entry);

        while state.log.len() > self.capacity {
            state.log.pop_front();
        }

        Ok(())
    }

    async fn snapshot(&self, user_id: Option<&str>) -> StorageResult<LogSnapshot> {
        let state = self.state.lock().await;

        let entries = match user_id {
            Some(user_id) => state
                .log
                .iter()
                .filter(|e| e.is_for_user(user_id))
                .cloned()
                .collect(),
            None => state.log.iter().cloned().collect(),
        };

        Ok(LogSnapshot {
            entries,
            user_activity: user_id.and_then(|id| state.activity.get(id).cloned()),
            total_users: state.activity.len(),
            total_logs: state.log.len(),
        })
    }

    async fn clear(&self) -> StorageResult<usize> {
        let mut state = self.state.lock().await;
        let cleared = state.log.len();
        state.log.clear();
        state.activity.clear();
        Ok(cleared)
    }

    async fn stats(&self) -> StorageResult<StorageStats> {
        let state = self.state.lock().await;
        Ok(StorageStats {
            total_users: state.activity.len(),
            total_logs: state.log.len(),
            capacity: self.capacity,
        })
    }
}
