//! Chunked batch writer.
//!
//! A `Flusher` persists an arbitrary number of journeys and hands back
//! exactly the ones that did not reach storage. `ChunkFlusher` does this by
//! splitting the batch into fixed-size chunks and writing them one storage
//! call at a time, in order.

use std::sync::Arc;

use async_trait::async_trait;

use crate::models::Journey;
use crate::storage::JourneyRepo;
use crate::utils::split_to_chunks;

/// Writes batches of journeys to storage.
#[async_trait]
pub trait Flusher: Send + Sync {
    /// Persists `journeys` and returns those that were not saved, in their
    /// original relative order. An empty result means everything was stored.
    async fn flush(&self, journeys: Vec<Journey>) -> Vec<Journey>;
}

/// `Flusher` that writes `chunk_size` journeys per `JourneyRepo::add_journeys` call.
pub struct ChunkFlusher {
    chunk_size: usize,
    repo: Arc<dyn JourneyRepo>,
}

impl ChunkFlusher {
    pub fn new(chunk_size: usize, repo: Arc<dyn JourneyRepo>) -> Self {
        ChunkFlusher { chunk_size, repo }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }
}

#[async_trait]
impl Flusher for ChunkFlusher {
    /// Chunks are written sequentially; a failed chunk is returned whole since
    /// each storage call is all-or-nothing. Nothing is retried here.
    async fn flush(&self, journeys: Vec<Journey>) -> Vec<Journey> {
        let chunks = match split_to_chunks(Some(&journeys[..]), self.chunk_size) {
            Ok(chunks) => chunks,
            Err(e) => {
                log::warn!(
                    "Cannot split {} journeys into chunks of {}: {e}; nothing was written",
                    journeys.len(),
                    self.chunk_size
                );
                return journeys;
            }
        };

        let chunk_count = chunks.len();
        let mut failed: Vec<Journey> = Vec::new();
        for (index, chunk) in chunks.into_iter().enumerate() {
            if let Err(e) = self.repo.add_journeys(chunk).await {
                log::warn!(
                    "Failed to write chunk {}/{} ({} journeys): {e}",
                    index + 1,
                    chunk_count,
                    chunk.len()
                );
                failed.extend_from_slice(chunk);
            }
        }

        if failed.is_empty() {
            log::debug!(
                "Flushed {} journeys in {} chunks",
                journeys.len(),
                chunk_count
            );
        } else {
            log::warn!(
                "Flush completed: {} of {} journeys not written",
                failed.len(),
                journeys.len()
            );
        }

        failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_helpers::{create_test_pool, sample_journeys, RecordingRepo};
    use crate::storage::SqliteJourneyRepo;

    fn flusher_with(chunk_size: usize, repo: &Arc<RecordingRepo>) -> ChunkFlusher {
        ChunkFlusher::new(chunk_size, Arc::clone(repo) as Arc<dyn JourneyRepo>)
    }

    #[tokio::test]
    async fn test_flush_empty_batch_makes_no_calls() {
        let repo = Arc::new(RecordingRepo::new());
        let flusher = flusher_with(1, &repo);

        let failed = flusher.flush(Vec::new()).await;

        assert!(failed.is_empty());
        assert!(repo.calls().is_empty());
    }

    #[tokio::test]
    async fn test_flush_zero_chunk_size_returns_input_unchanged() {
        let repo = Arc::new(RecordingRepo::new());
        let flusher = flusher_with(0, &repo);
        let journeys = sample_journeys(3);

        let failed = flusher.flush(journeys.clone()).await;

        assert_eq!(failed, journeys);
        assert!(repo.calls().is_empty());
    }

    #[tokio::test]
    async fn test_flush_all_chunks_succeed() {
        let repo = Arc::new(RecordingRepo::new());
        let flusher = flusher_with(2, &repo);
        let journeys = sample_journeys(5);
        assert_eq!(flusher.chunk_size(), 2);

        let failed = flusher.flush(journeys.clone()).await;

        assert!(failed.is_empty());
        let calls = repo.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0], journeys[0..2].to_vec());
        assert_eq!(calls[1], journeys[2..4].to_vec());
        assert_eq!(calls[2], journeys[4..5].to_vec());
        assert_eq!(repo.stored().len(), 5);
    }

    #[tokio::test]
    async fn test_flush_isolates_failed_middle_chunk() {
        // [A,B] ok, [C,D] fails, [E] ok
        let repo = Arc::new(RecordingRepo::failing_on([1]));
        let flusher = flusher_with(2, &repo);
        let journeys = sample_journeys(5);

        let failed = flusher.flush(journeys.clone()).await;

        assert_eq!(failed, journeys[2..4].to_vec());
        assert_eq!(repo.calls().len(), 3, "later chunks must still be attempted");
        let stored: Vec<u64> = repo.stored().iter().map(|j| j.user_id).collect();
        assert_eq!(stored, vec![1, 2, 5]);
    }

    #[tokio::test]
    async fn test_flush_failures_keep_relative_order_across_chunks() {
        let repo = Arc::new(RecordingRepo::failing_on([0, 2]));
        let flusher = flusher_with(2, &repo);
        let journeys = sample_journeys(6);

        let failed = flusher.flush(journeys.clone()).await;

        let mut expected = journeys[0..2].to_vec();
        expected.extend_from_slice(&journeys[4..6]);
        assert_eq!(failed, expected);
    }

    #[tokio::test]
    async fn test_flush_every_chunk_fails() {
        let repo = Arc::new(RecordingRepo::failing_on(0..10));
        let flusher = flusher_with(3, &repo);
        let journeys = sample_journeys(7);

        let failed = flusher.flush(journeys.clone()).await;

        assert_eq!(failed, journeys);
        assert_eq!(repo.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_flush_against_sqlite() {
        let sqlite = SqliteJourneyRepo::new(create_test_pool().await);
        let flusher = ChunkFlusher::new(2, Arc::new(sqlite.clone()));

        let failed = flusher.flush(sample_journeys(5)).await;

        assert!(failed.is_empty());
        assert_eq!(sqlite.count().await.unwrap(), 5);
    }
}
