//! Storage layer for ssvep-daemon
//!
//! Holds the selection log and per-user activity records for the lifetime of
//! the process.

mod memory;
mod traits;

pub use memory::InMemoryStorage;
pub use traits::{LogSnapshot, Storage, StorageResult, StorageStats};
