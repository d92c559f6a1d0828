//! Task consumer feeding the write-behind saver.

use std::sync::Arc;

use tokio_retry::RetryIf;

use crate::error_handling::{get_save_retry_strategy, IngestEvent, IngestStats, SaverError};
use crate::models::Journey;
use crate::saver::Saver;
use crate::storage::JourneyRepo;

use super::channel::TaskConsumer;
use super::message::TaskMessage;

/// Processes task messages until every producer is dropped.
///
/// Creates go through `saver`, re-submitting on `BufferFull` with exponential
/// backoff; updates and deletes are applied to `repo` directly. Payloads that
/// do not decode are logged and skipped. Returns the number of payloads taken
/// off the queue.
pub async fn run_consumer(
    mut consumer: TaskConsumer,
    saver: Arc<Saver>,
    repo: Arc<dyn JourneyRepo>,
    stats: Arc<IngestStats>,
) -> usize {
    let mut received = 0usize;

    while let Some(payload) = consumer.recv().await {
        received += 1;
        let message = match TaskMessage::decode(&payload) {
            Ok(message) => message,
            Err(e) => {
                log::warn!("Skipping task payload: {e}");
                stats.increment(IngestEvent::UndecodableTask);
                continue;
            }
        };
        log::trace!("Consuming {} task", message.kind());

        match message {
            TaskMessage::Create(journey) => {
                buffer_journey(&saver, journey, &stats).await;
            }
            TaskMessage::MultiCreate(journeys) => {
                for journey in journeys {
                    buffer_journey(&saver, journey, &stats).await;
                }
            }
            TaskMessage::Update(journey) => {
                if let Err(e) = repo.update_journey(&journey).await {
                    log::error!("Queued update of journey {} failed: {e}", journey.id);
                    stats.increment(IngestEvent::StorageFailed);
                }
            }
            TaskMessage::Delete(id) => {
                if let Err(e) = repo.remove_journey(id).await {
                    log::error!("Queued removal of journey {id} failed: {e}");
                    stats.increment(IngestEvent::StorageFailed);
                }
            }
        }
    }

    log::debug!("Task queue closed after {received} payloads");
    received
}

async fn buffer_journey(saver: &Saver, journey: Journey, stats: &IngestStats) {
    let user_id = journey.user_id;
    match save_with_retry(saver, journey, stats).await {
        Ok(()) => stats.increment(IngestEvent::Buffered),
        Err(SaverError::BufferFull) => {
            log::warn!("Dropping journey of user {user_id}: saver buffer stayed full");
            stats.increment(IngestEvent::DroppedBufferFull);
        }
        Err(SaverError::Closed) => {
            log::error!("Dropping journey of user {user_id}: saver is closed");
            stats.increment(IngestEvent::DroppedClosed);
        }
        Err(e) => {
            log::error!("Unexpected saver error for journey of user {user_id}: {e}");
            stats.increment(IngestEvent::StorageFailed);
        }
    }
}

/// `Saver::save` retried while the buffer is full.
async fn save_with_retry(
    saver: &Saver,
    journey: Journey,
    stats: &IngestStats,
) -> Result<(), SaverError> {
    RetryIf::start(
        get_save_retry_strategy(),
        move || saver.save(journey.clone()),
        |e: &SaverError| {
            if e.is_retriable() {
                stats.increment(IngestEvent::BufferFullRejection);
                true
            } else {
                false
            }
        },
    )
    .await
}
