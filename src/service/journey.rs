//! Journey service operations.

use std::sync::Arc;

use crate::error_handling::ServiceError;
use crate::models::Journey;
use crate::queue::{TaskMessage, TaskProducer};
use crate::storage::JourneyRepo;
use crate::utils::split_to_chunks;

use super::validation::{
    validate_batch, validate_existing_journey, validate_id, validate_limit, validate_new_journey,
};

/// Validates requests and routes them to storage, either directly or as
/// queued tasks.
#[derive(Clone)]
pub struct JourneyService {
    repo: Arc<dyn JourneyRepo>,
    producer: TaskProducer,
    chunk_size: usize,
}

impl JourneyService {
    pub fn new(repo: Arc<dyn JourneyRepo>, producer: TaskProducer, chunk_size: usize) -> Self {
        JourneyService {
            repo,
            producer,
            chunk_size,
        }
    }

    /// Stores one journey and returns its id.
    pub async fn create_journey(&self, journey: Journey) -> Result<u64, ServiceError> {
        validate_new_journey(&journey)?;
        let id = self.repo.add_journey(&journey).await.map_err(|e| {
            log::error!("create_journey failed for {journey}: {e}");
            ServiceError::from(e)
        })?;
        log::debug!("create_journey: stored journey {id}");
        Ok(id)
    }

    /// Stores a batch, one atomic storage call per `chunk_size` journeys.
    ///
    /// # Errors
    ///
    /// If a chunk fails after earlier chunks were committed, the ids of the
    /// committed journeys are returned in `ServiceError::PartialCreate`. Later
    /// chunks are not attempted.
    pub async fn multi_create_journey(
        &self,
        journeys: Vec<Journey>,
    ) -> Result<Vec<u64>, ServiceError> {
        validate_batch(&journeys)?;
        let chunks = split_to_chunks(Some(&journeys[..]), self.chunk_size)?;

        let mut created = Vec::with_capacity(journeys.len());
        for chunk in chunks {
            match self.repo.add_journeys(chunk).await {
                Ok(ids) => created.extend(ids),
                Err(e) if created.is_empty() => {
                    log::error!("multi_create_journey failed: {e}");
                    return Err(e.into());
                }
                Err(source) => {
                    log::error!(
                        "multi_create_journey stopped after {} of {} journeys: {source}",
                        created.len(),
                        journeys.len()
                    );
                    return Err(ServiceError::PartialCreate { created, source });
                }
            }
        }

        log::debug!("multi_create_journey: stored {} journeys", created.len());
        Ok(created)
    }

    pub async fn describe_journey(&self, id: u64) -> Result<Journey, ServiceError> {
        validate_id(id)?;
        Ok(self.repo.describe_journey(id).await?)
    }

    pub async fn list_journeys(&self, limit: u64, offset: u64) -> Result<Vec<Journey>, ServiceError> {
        validate_limit(limit)?;
        Ok(self.repo.list_journeys(limit, offset).await?)
    }

    pub async fn update_journey(&self, journey: Journey) -> Result<(), ServiceError> {
        validate_existing_journey(&journey)?;
        self.repo.update_journey(&journey).await?;
        log::debug!("update_journey: updated journey {}", journey.id);
        Ok(())
    }

    pub async fn remove_journey(&self, id: u64) -> Result<(), ServiceError> {
        validate_id(id)?;
        self.repo.remove_journey(id).await?;
        log::debug!("remove_journey: removed journey {id}");
        Ok(())
    }

    /// Queues a journey for write-behind creation.
    pub async fn create_journey_task(&self, journey: Journey) -> Result<(), ServiceError> {
        validate_new_journey(&journey)?;
        self.publish(TaskMessage::Create(journey)).await
    }

    /// Queues a batch as one `MultiCreate` task per chunk.
    pub async fn multi_create_journey_task(
        &self,
        journeys: Vec<Journey>,
    ) -> Result<(), ServiceError> {
        validate_batch(&journeys)?;
        for chunk in split_to_chunks(Some(&journeys[..]), self.chunk_size)? {
            self.publish(TaskMessage::MultiCreate(chunk.to_vec())).await?;
        }
        Ok(())
    }

    pub async fn update_journey_task(&self, journey: Journey) -> Result<(), ServiceError> {
        validate_existing_journey(&journey)?;
        self.publish(TaskMessage::Update(journey)).await
    }

    pub async fn remove_journey_task(&self, id: u64) -> Result<(), ServiceError> {
        validate_id(id)?;
        self.publish(TaskMessage::Delete(id)).await
    }

    async fn publish(&self, message: TaskMessage) -> Result<(), ServiceError> {
        self.producer.send(&message).await.map_err(|e| {
            log::error!("Failed to queue {} task: {e}", message.kind());
            ServiceError::from(e)
        })
    }
}
