//! Error handling and ingestion statistics.
//!
//! This module provides:
//! - Error type definitions for every layer (splitter, saver, storage, queue, service)
//! - Ingestion statistics tracking
//! - Retry strategy configuration for backpressure

mod retry;
mod stats;
mod types;

// Re-export public API
pub use retry::get_save_retry_strategy;
pub use stats::IngestStats;
pub use types::{
    ChunkError, DatabaseError, IngestEvent, InitializationError, QueueError, SaverError,
    ServiceError,
};
