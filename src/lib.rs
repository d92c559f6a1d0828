//! journey_store library: write-behind persistence of journey records.
//!
//! Journeys are accepted one at a time by a bounded in-memory `Saver`, which
//! flushes them to SQLite in fixed-size chunks on a timer and once more when it
//! is closed. Chunks that fail stay buffered and are retried on the next round;
//! whatever is still unwritten at close is handed back as
//! `SaverError::PartialFlush`.
//!
//! Around that core the crate provides a storage gateway (`JourneyRepo`), a
//! validating `JourneyService` with synchronous and queued operations, and
//! `run_ingest`, which loads a JSON-lines file through either path.
//!
//! # Example
//!
//! ```no_run
//! use journey_store::{run_ingest, Config, WriteMode};
//! use std::path::PathBuf;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config {
//!     file: PathBuf::from("journeys.jsonl"),
//!     mode: WriteMode::Async,
//!     ..Default::default()
//! };
//! let report = run_ingest(config).await?;
//! println!("{} journeys stored", report.stored);
//! # Ok(())
//! # }
//! ```

mod app;
pub mod config;
pub mod error_handling;
pub mod flusher;
pub mod initialization;
mod models;
pub mod queue;
mod run;
pub mod saver;
pub mod service;
pub mod storage;
pub mod utils;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel, WriteMode};
pub use error_handling::{
    ChunkError, DatabaseError, IngestEvent, IngestStats, QueueError, SaverError, ServiceError,
};
pub use flusher::{ChunkFlusher, Flusher};
pub use models::Journey;
pub use queue::{run_consumer, task_channel, TaskConsumer, TaskMessage, TaskProducer};
pub use run::{run_ingest, IngestReport};
pub use saver::Saver;
pub use service::JourneyService;
pub use storage::{init_db_pool_with_path, run_migrations, JourneyRepo, SqliteJourneyRepo};
pub use utils::{slice_to_map, split_to_chunks};
