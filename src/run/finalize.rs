//! Ingestion finalization and cleanup.

use anyhow::{Context, Result};

use crate::app::{log_progress, print_ingest_statistics, shutdown_gracefully};
use crate::error_handling::{IngestEvent, SaverError};

use super::resources::{IngestLoopResult, IngestResources, WriteBehind};
use super::IngestReport;

/// Finalize a run and produce the report.
///
/// 1. Stop the interrupt watcher
/// 2. Drop the task producer and wait for the consumer to drain the queue
/// 3. Close the saver, collecting anything its final flush could not write
/// 4. Checkpoint WAL and close the pool
/// 5. Print statistics
///
/// # Errors
///
/// Returns an error if the consumer task panicked or the stored row count
/// cannot be read.
pub async fn finalize_ingest(
    resources: IngestResources,
    loop_result: IngestLoopResult,
) -> Result<IngestReport> {
    let IngestLoopResult {
        lines_read,
        interrupted,
        cancel,
        watcher,
    } = loop_result;
    let IngestResources {
        pool,
        repo,
        service,
        write_behind,
        stats,
        start_time,
        config,
    } = resources;

    shutdown_gracefully(cancel, watcher).await;
    log_progress(start_time, lines_read);

    // Last producer handle; the consumer sees the end of the queue after this.
    drop(service);

    let unflushed = match write_behind {
        Some(WriteBehind {
            saver,
            consumer_task,
        }) => {
            let consumed = consumer_task
                .await
                .context("Task consumer terminated abnormally")?;
            log::debug!("Task consumer drained {consumed} payloads");

            match saver.close().await {
                Ok(()) => Vec::new(),
                Err(SaverError::PartialFlush { unflushed }) => {
                    log::error!(
                        "{} journeys could not be flushed before shutdown",
                        unflushed.len()
                    );
                    unflushed
                }
                Err(e) => {
                    log::error!("Saver close failed: {e}");
                    Vec::new()
                }
            }
        }
        None => Vec::new(),
    };

    let stored = repo
        .count()
        .await
        .context("Failed to count stored journeys")?;

    if let Err(e) = sqlx::query("PRAGMA wal_checkpoint(TRUNCATE)")
        .execute(pool.as_ref())
        .await
    {
        log::warn!("Failed to checkpoint WAL file (this is non-critical): {}", e);
    }
    pool.close().await;
    log::debug!("Database pool closed");

    print_ingest_statistics(&stats);

    Ok(IngestReport {
        mode: config.mode,
        lines_read,
        created: stats.get(IngestEvent::Created),
        queued: stats.get(IngestEvent::Queued),
        buffered: stats.get(IngestEvent::Buffered),
        rejected: stats.total_rejected(),
        stored,
        unflushed,
        interrupted,
        db_path: config.db_path,
        elapsed_seconds: start_time.elapsed().as_secs_f64(),
    })
}
