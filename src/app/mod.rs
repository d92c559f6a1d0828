//! Main application modules.
//!
//! This module provides input parsing, progress logging, shutdown handling
//! and statistics printing used by the ingestion run.

pub mod input;
pub mod logging;
pub mod shutdown;
pub mod statistics;

// Re-export public API
pub use input::parse_journey_line;
pub use logging::log_progress;
pub use shutdown::{shutdown_gracefully, spawn_interrupt_watcher};
pub use statistics::print_ingest_statistics;
