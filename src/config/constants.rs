//! Configuration constants.
//!
//! Defaults for the CLI/library configuration and the fixed operational
//! parameters of the write pipeline.

use std::time::Duration;

/// Default SQLite database path.
pub const DB_PATH: &str = "./journey_store.db";

/// Default number of journeys the saver buffers between flush rounds.
pub const DEFAULT_SAVER_CAPACITY: usize = 1000;

/// Default number of journeys persisted per storage call.
pub const DEFAULT_CHUNK_SIZE: usize = 100;

/// Default delay between periodic flush rounds, in milliseconds.
pub const DEFAULT_FLUSH_INTERVAL_MS: u64 = 1000;

/// Default number of task messages the queue holds before senders wait.
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Default SQLite pool size.
pub const DEFAULT_MAX_DB_CONNECTIONS: u32 = 5;

/// How long a query waits for a pooled connection before failing.
/// Fails fast instead of sqlx's 30s default so a stuck flush round surfaces.
pub const DB_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Lines read between progress log messages.
pub const LOGGING_INTERVAL: usize = 1000;

// BufferFull retry policy for the queue consumer.
/// Base of the exponential backoff, in milliseconds.
pub const SAVE_RETRY_BASE_MS: u64 = 2;
/// Multiplier applied to every backoff step.
pub const SAVE_RETRY_FACTOR: u64 = 25;
/// Upper bound on a single backoff delay, in milliseconds.
pub const SAVE_RETRY_MAX_DELAY_MS: u64 = 1000;
/// Retries before a journey is shed.
pub const SAVE_RETRY_MAX_ATTEMPTS: usize = 5;

/// Exit code used by the binary when a closing flush left journeys unpersisted.
pub const EXIT_CODE_PARTIAL_FLUSH: i32 = 2;
