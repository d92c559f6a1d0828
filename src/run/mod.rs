//! Ingestion run orchestration.
//!
//! A run is three phases: `init_ingest_resources` opens the input and storage
//! and, in async mode, starts the saver and queue consumer; `run_ingest_loop`
//! reads the input; `finalize_ingest` shuts everything down in order and
//! builds the report.

mod finalize;
mod ingest;
mod init;
mod resources;

use std::path::PathBuf;

use anyhow::Result;

use crate::config::{Config, WriteMode};
use crate::models::Journey;

use finalize::finalize_ingest;
use ingest::run_ingest_loop;
use init::init_ingest_resources;

/// Results of an ingestion run.
#[derive(Debug, Clone)]
pub struct IngestReport {
    /// Write mode the run used
    pub mode: WriteMode,
    /// Input lines read, including blank and comment lines
    pub lines_read: usize,
    /// Journeys stored synchronously (sync mode)
    pub created: usize,
    /// Journeys handed to the task queue (async mode)
    pub queued: usize,
    /// Journeys accepted by the saver (async mode)
    pub buffered: usize,
    /// Records that never reached the saver or storage
    pub rejected: usize,
    /// Rows in the journeys table once the run finished
    pub stored: u64,
    /// Journeys still unwritten after the saver's final flush
    pub unflushed: Vec<Journey>,
    /// True if Ctrl-C ended reading early
    pub interrupted: bool,
    /// Path to the SQLite database
    pub db_path: PathBuf,
    /// Elapsed time in seconds
    pub elapsed_seconds: f64,
}

impl IngestReport {
    /// Whether buffered journeys were lost at shutdown.
    pub fn has_unflushed(&self) -> bool {
        !self.unflushed.is_empty()
    }
}

/// Ingests a JSON-lines file of journeys into SQLite.
///
/// Every non-blank, non-comment line must be one journey object. In
/// `WriteMode::Sync` each journey is inserted on the spot; in
/// `WriteMode::Async` it is queued as a task and written behind by a `Saver`
/// in chunks. Malformed and invalid records are counted and skipped.
///
/// A report with unflushed journeys is still `Ok`; callers decide how to
/// escalate it.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the input cannot be
/// read, or storage cannot be initialized.
///
/// # Example
///
/// ```no_run
/// use journey_store::{run_ingest, Config};
/// use std::path::PathBuf;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config {
///     file: PathBuf::from("journeys.jsonl"),
///     ..Default::default()
/// };
/// let report = run_ingest(config).await?;
/// println!("{} journeys stored", report.stored);
/// # Ok(())
/// # }
/// ```
pub async fn run_ingest(config: Config) -> Result<IngestReport> {
    let (resources, source) = init_ingest_resources(config).await?;
    let loop_result = match run_ingest_loop(&resources, source).await {
        Ok(loop_result) => loop_result,
        Err(e) => {
            // Stop the write-behind pipeline before surfacing the read error.
            shutdown_on_error(resources).await;
            return Err(e);
        }
    };
    finalize_ingest(resources, loop_result).await
}

async fn shutdown_on_error(resources: resources::IngestResources) {
    let resources::IngestResources {
        pool,
        service,
        write_behind,
        ..
    } = resources;
    drop(service);
    if let Some(resources::WriteBehind {
        saver,
        consumer_task,
    }) = write_behind
    {
        if let Err(e) = consumer_task.await {
            log::error!("Task consumer terminated abnormally: {e}");
        }
        if let Err(e) = saver.close().await {
            log::error!("Saver close failed during error shutdown: {e}");
        }
    }
    pool.close().await;
}
