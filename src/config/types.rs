//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration. Every option can also be supplied through a
//! `JOURNEY_STORE_*` environment variable (or a `.env` file loaded by the binary).

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    DB_PATH, DEFAULT_CHUNK_SIZE, DEFAULT_FLUSH_INTERVAL_MS, DEFAULT_MAX_DB_CONNECTIONS,
    DEFAULT_QUEUE_CAPACITY, DEFAULT_SAVER_CAPACITY,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// How ingested journeys reach storage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum WriteMode {
    /// One insert per journey, on the request path.
    Sync,
    /// Journeys are queued as tasks and written behind by the saver in chunks.
    Async,
}

/// Command-line options and library configuration.
///
/// # Examples
///
/// ```bash
/// # Write-behind ingestion of a JSON-lines file
/// journey_store journeys.jsonl --mode async --chunk-size 50
///
/// # Synchronous ingestion from stdin into a custom database
/// cat journeys.jsonl | journey_store - --mode sync --db-path ./trips.db
/// ```
#[derive(Debug, Clone, Parser)]
#[command(
    name = "journey_store",
    about = "Ingests journey records (JSON lines) and persists them to SQLite."
)]
pub struct Config {
    /// File to read journeys from (one JSON object per line, `-` for stdin)
    #[arg(value_parser, env = "JOURNEY_STORE_FILE")]
    pub file: PathBuf,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info, env = "JOURNEY_STORE_LOG_LEVEL")]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain, env = "JOURNEY_STORE_LOG_FORMAT")]
    pub log_format: LogFormat,

    /// Database path (SQLite file)
    #[arg(long, value_parser, default_value = DB_PATH, env = "JOURNEY_STORE_DB_PATH")]
    pub db_path: PathBuf,

    /// Write mode: sync|async
    #[arg(long, value_enum, default_value_t = WriteMode::Async, env = "JOURNEY_STORE_MODE")]
    pub mode: WriteMode,

    /// Maximum number of journeys buffered by the saver between flush rounds
    #[arg(long, default_value_t = DEFAULT_SAVER_CAPACITY, env = "JOURNEY_STORE_CAPACITY")]
    pub capacity: usize,

    /// Number of journeys written per storage call
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE, env = "JOURNEY_STORE_CHUNK_SIZE")]
    pub chunk_size: usize,

    /// Delay between periodic flush rounds, in milliseconds
    #[arg(long, default_value_t = DEFAULT_FLUSH_INTERVAL_MS, env = "JOURNEY_STORE_FLUSH_INTERVAL_MS")]
    pub flush_interval_ms: u64,

    /// Number of task messages the queue holds before producers wait
    #[arg(long, default_value_t = DEFAULT_QUEUE_CAPACITY, env = "JOURNEY_STORE_QUEUE_CAPACITY")]
    pub queue_capacity: usize,

    /// Maximum SQLite pool connections
    #[arg(long, default_value_t = DEFAULT_MAX_DB_CONNECTIONS, env = "JOURNEY_STORE_MAX_DB_CONNECTIONS")]
    pub max_db_connections: u32,
}

impl Config {
    /// Delay between periodic flush rounds.
    pub fn flush_interval(&self) -> Duration {
        Duration::from_millis(self.flush_interval_ms)
    }

    /// Rejects sizes and intervals that would make the pipeline unusable.
    pub fn validate(&self) -> Result<(), String> {
        if self.capacity == 0 {
            return Err("capacity must be greater than 0".to_string());
        }
        if self.chunk_size == 0 {
            return Err("chunk-size must be greater than 0".to_string());
        }
        if self.flush_interval_ms == 0 {
            return Err("flush-interval-ms must be greater than 0".to_string());
        }
        if self.queue_capacity == 0 {
            return Err("queue-capacity must be greater than 0".to_string());
        }
        if self.max_db_connections == 0 {
            return Err("max-db-connections must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file: PathBuf::from("journeys.jsonl"),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            db_path: PathBuf::from(DB_PATH),
            mode: WriteMode::Async,
            capacity: DEFAULT_SAVER_CAPACITY,
            chunk_size: DEFAULT_CHUNK_SIZE,
            flush_interval_ms: DEFAULT_FLUSH_INTERVAL_MS,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            max_db_connections: DEFAULT_MAX_DB_CONNECTIONS,
        }
    }
}
