//! The read loop: one journey per input line, routed through the service.

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;

use crate::app::{log_progress, parse_journey_line, shutdown_gracefully, spawn_interrupt_watcher};
use crate::config::{WriteMode, LOGGING_INTERVAL};
use crate::error_handling::{IngestEvent, IngestStats, ServiceError};
use crate::models::Journey;
use crate::service::JourneyService;

use super::resources::{IngestLoopResult, IngestResources, LineSource};

/// Whether the read loop should keep going after a line.
enum LineOutcome {
    Continue,
    Stop,
}

/// Reads `source` to the end, or until Ctrl-C.
///
/// # Errors
///
/// Returns an error if reading the input fails.
pub async fn run_ingest_loop(
    resources: &IngestResources,
    mut source: LineSource,
) -> Result<IngestLoopResult> {
    let interrupt = CancellationToken::new();
    let cancel = CancellationToken::new();
    let watcher = spawn_interrupt_watcher(interrupt.clone(), cancel.clone());

    let mode = resources.config.mode;
    let mut lines_read = 0usize;
    let mut interrupted = false;

    loop {
        let line = tokio::select! {
            biased;
            _ = interrupt.cancelled() => {
                interrupted = true;
                break;
            }
            line = source.next_line() => match line {
                Ok(line) => line,
                Err(e) => {
                    shutdown_gracefully(cancel, Some(watcher)).await;
                    return Err(e).context(format!("Failed to read input after line {lines_read}"));
                }
            },
        };
        let Some(line) = line else { break };
        lines_read += 1;

        let outcome = match parse_journey_line(&line) {
            None => LineOutcome::Continue,
            Some(Err(e)) => {
                log::warn!("Skipping malformed line {lines_read}: {e}");
                resources.stats.increment(IngestEvent::MalformedLine);
                LineOutcome::Continue
            }
            Some(Ok(journey)) => {
                submit_journey(&resources.service, mode, journey, lines_read, &resources.stats)
                    .await
            }
        };
        if matches!(outcome, LineOutcome::Stop) {
            break;
        }

        if lines_read % LOGGING_INTERVAL == 0 {
            log_progress(resources.start_time, lines_read);
        }
    }

    Ok(IngestLoopResult {
        lines_read,
        interrupted,
        cancel,
        watcher: Some(watcher),
    })
}

async fn submit_journey(
    service: &JourneyService,
    mode: WriteMode,
    journey: Journey,
    line_number: usize,
    stats: &IngestStats,
) -> LineOutcome {
    let result = match mode {
        WriteMode::Sync => service
            .create_journey(journey)
            .await
            .map(|_| IngestEvent::Created),
        WriteMode::Async => service
            .create_journey_task(journey)
            .await
            .map(|()| IngestEvent::Queued),
    };

    match result {
        Ok(event) => {
            stats.increment(event);
            LineOutcome::Continue
        }
        Err(ServiceError::InvalidArgument(reason)) => {
            log::warn!("Skipping invalid journey on line {line_number}: {reason}");
            stats.increment(IngestEvent::InvalidJourney);
            LineOutcome::Continue
        }
        Err(ServiceError::Queue(e)) => {
            log::error!("Task queue unavailable, stopping input at line {line_number}: {e}");
            stats.increment(IngestEvent::StorageFailed);
            LineOutcome::Stop
        }
        Err(e) => {
            log::error!("Failed to store journey on line {line_number}: {e}");
            stats.increment(IngestEvent::StorageFailed);
            LineOutcome::Continue
        }
    }
}
