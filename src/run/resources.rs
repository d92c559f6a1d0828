//! Ingestion resources and state management.

use std::sync::Arc;

use tokio::io::Lines;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::error_handling::IngestStats;
use crate::saver::Saver;
use crate::service::JourneyService;
use crate::storage::SqliteJourneyRepo;

/// The write-behind half of an async run.
pub struct WriteBehind {
    pub saver: Arc<Saver>,
    /// Queue consumer; resolves to the number of payloads it took off the queue.
    pub consumer_task: JoinHandle<usize>,
}

/// All resources initialized for an ingestion run.
pub struct IngestResources {
    pub pool: Arc<sqlx::SqlitePool>,
    pub repo: SqliteJourneyRepo,
    /// Holds the only task producer; dropping it lets the consumer drain and exit.
    pub service: JourneyService,
    /// Present in async mode only.
    pub write_behind: Option<WriteBehind>,
    pub stats: Arc<IngestStats>,
    pub start_time: std::time::Instant,
    pub config: Config,
}

/// Source of journey lines: a file or stdin.
pub enum LineSource {
    File(Lines<tokio::io::BufReader<tokio::fs::File>>),
    Stdin(Lines<tokio::io::BufReader<tokio::io::Stdin>>),
}

impl LineSource {
    /// Returns `Ok(None)` at end of input.
    pub async fn next_line(&mut self) -> std::io::Result<Option<String>> {
        match self {
            LineSource::File(lines) => lines.next_line().await,
            LineSource::Stdin(lines) => lines.next_line().await,
        }
    }
}

/// What the read loop hands to finalization.
pub struct IngestLoopResult {
    pub lines_read: usize,
    pub interrupted: bool,
    /// Stops the interrupt watcher.
    pub cancel: CancellationToken,
    pub watcher: Option<JoinHandle<()>>,
}
