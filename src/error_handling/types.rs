//! Error type definitions.
//!
//! This module defines all error types used throughout the application.

use log::SetLoggerError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

use crate::models::Journey;

/// Error types for initialization failures.
#[derive(Error, Debug)]
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),
}

/// Error types for database operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error creating the database file.
    #[error("Database file creation error: {0}")]
    FileCreationError(String),

    /// SQL execution error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),

    /// Schema migration error.
    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    /// No journey row with the requested id.
    #[error("Journey {0} not found")]
    NotFound(u64),

    /// A stored timestamp could not be converted back to a date.
    #[error("Invalid stored timestamp: {0}")]
    InvalidTimestamp(String),

    /// A value does not fit the SQLite integer column.
    #[error("Value out of range for storage: {0}")]
    OutOfRange(u64),
}

/// Input-contract violations of the chunk splitter and map helpers.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkError {
    /// Chunk size must be at least one element.
    #[error("chunk size must be greater than zero")]
    InvalidChunkSize,

    /// The input sequence was absent.
    #[error("sequence cannot be nil")]
    NilSequence,

    /// The input sequence was absent or empty where elements are required.
    #[error("sequence cannot be nil or empty")]
    EmptySequence,
}

/// Errors returned by the write-behind saver.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SaverError {
    /// The buffer already holds `capacity` journeys; the journey was not queued.
    #[error("cannot add new journey, saver buffer is full")]
    BufferFull,

    /// The saver has been closed and cannot be used anymore.
    #[error("saver is closed and cannot be used anymore")]
    Closed,

    /// The final flush on close left journeys unpersisted. They are handed back
    /// here because the closed saver no longer exposes its buffer.
    #[error("{} journeys were not flushed", .unflushed.len())]
    PartialFlush { unflushed: Vec<Journey> },

    /// A saver needs room for at least one journey.
    #[error("saver capacity must be greater than zero")]
    InvalidCapacity,

    /// The periodic flush interval must be non-zero.
    #[error("flush interval must be greater than zero")]
    InvalidFlushInterval,
}

impl SaverError {
    /// Whether the caller may re-submit the same journey later.
    pub fn is_retriable(&self) -> bool {
        matches!(self, SaverError::BufferFull)
    }
}

/// Errors on the in-process task queue.
#[derive(Error, Debug)]
pub enum QueueError {
    /// The consuming side has shut down.
    #[error("task queue is closed")]
    Closed,

    /// A message could not be serialized.
    #[error("failed to encode task message: {0}")]
    Encode(#[source] serde_json::Error),

    /// A payload could not be deserialized into a task message.
    #[error("failed to decode task message: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Errors surfaced by the journey service operations.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The request failed validation.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The storage layer rejected the operation.
    #[error(transparent)]
    Database(#[from] DatabaseError),

    /// The task could not be queued.
    #[error(transparent)]
    Queue(#[from] QueueError),

    /// The batch could not be split into chunks.
    #[error(transparent)]
    Chunk(#[from] ChunkError),

    /// Some chunks of a multi-create were committed before one failed.
    #[error("multi-create stopped after {} journeys: {source}", .created.len())]
    PartialCreate {
        created: Vec<u64>,
        #[source]
        source: DatabaseError,
    },
}

/// Outcomes counted while ingesting journey records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum IngestEvent {
    /// Input line that was not a valid journey document.
    MalformedLine,
    /// Journey that failed request validation.
    InvalidJourney,
    /// Journey written synchronously by the service.
    Created,
    /// Journey handed to the task queue.
    Queued,
    /// Journey accepted into the saver buffer.
    Buffered,
    /// `save` rejected a journey because the buffer was full.
    BufferFullRejection,
    /// Journey dropped after the buffer stayed full for every retry.
    DroppedBufferFull,
    /// Journey dropped because the saver was already closed.
    DroppedClosed,
    /// Synchronous write or queued update/delete that storage rejected.
    StorageFailed,
    /// Queue payload that could not be decoded.
    UndecodableTask,
}

impl IngestEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            IngestEvent::MalformedLine => "Malformed input line",
            IngestEvent::InvalidJourney => "Invalid journey",
            IngestEvent::Created => "Created synchronously",
            IngestEvent::Queued => "Queued as task",
            IngestEvent::Buffered => "Accepted by saver",
            IngestEvent::BufferFullRejection => "Saver buffer full (rejections)",
            IngestEvent::DroppedBufferFull => "Dropped: saver buffer full",
            IngestEvent::DroppedClosed => "Dropped: saver closed",
            IngestEvent::StorageFailed => "Storage failure",
            IngestEvent::UndecodableTask => "Undecodable task message",
        }
    }

    /// Whether the event means a journey never made it into storage or the saver.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            IngestEvent::MalformedLine
                | IngestEvent::InvalidJourney
                | IngestEvent::DroppedBufferFull
                | IngestEvent::DroppedClosed
                | IngestEvent::StorageFailed
                | IngestEvent::UndecodableTask
        )
    }
}

impl std::fmt::Display for IngestEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
