//! SSVEP detection daemon library
//!
//! This module provides the core components for the detection daemon:
//! - Detection service (frequency resolution, simulated latency and faults)
//! - Selection log storage
//! - REST API handlers
//! - Server lifecycle management

pub mod api;
pub mod config;
pub mod error;
pub mod server;
pub mod service;
pub mod storage;

pub use api::{create_router, AppState};
pub use config::DaemonConfig;
pub use error::{ApiError, DaemonError, ServiceError, StorageError};
pub use server::Server;
pub use service::{Clock, DetectionService, Entropy, ManualClock, StdEntropy, SystemClock};
pub use storage::{InMemoryStorage, Storage};
