//! Saver, flusher and SQLite working together.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use journey_store::{ChunkFlusher, JourneyRepo, Saver, SaverError, SqliteJourneyRepo};

use helpers::{create_test_pool, sample_journeys, FlakyRepo};

#[tokio::test]
async fn test_close_persists_everything_in_order() {
    let repo = SqliteJourneyRepo::new(create_test_pool().await);
    let flusher = Arc::new(ChunkFlusher::new(3, Arc::new(repo.clone())));
    let saver = Saver::new(20, flusher, Duration::from_secs(3600)).unwrap();
    let journeys = sample_journeys(8);

    for journey in journeys.clone() {
        saver.save(journey).await.unwrap();
    }
    saver.close().await.unwrap();

    let stored = repo.list_journeys(100, 0).await.unwrap();
    let users: Vec<u64> = stored.iter().map(|j| j.user_id).collect();
    assert_eq!(users, (1..=8).collect::<Vec<u64>>());
    assert!(stored.iter().all(|j| j.is_persisted()));
}

/// Polls `condition` every 10ms for up to two seconds.
async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not met within 2s");
}

#[tokio::test]
async fn test_periodic_flush_retries_failed_round() {
    let sqlite = SqliteJourneyRepo::new(create_test_pool().await);
    let repo = Arc::new(FlakyRepo::new(sqlite.clone(), 1));
    let flusher = Arc::new(ChunkFlusher::new(10, Arc::clone(&repo) as Arc<dyn JourneyRepo>));
    let saver = Saver::new(10, flusher, Duration::from_millis(50)).unwrap();

    for journey in sample_journeys(4) {
        saver.save(journey).await.unwrap();
    }

    // The first round fails and keeps the batch; the second writes it.
    wait_until(|| repo.calls() >= 2).await;
    // Waits for the second round to release the lock.
    assert!(saver.is_empty().await);
    assert_eq!(sqlite.count().await.unwrap(), 4);

    saver.close().await.unwrap();
    assert_eq!(sqlite.count().await.unwrap(), 4);
}

#[tokio::test]
async fn test_close_reports_unflushed_journeys() {
    let sqlite = SqliteJourneyRepo::new(create_test_pool().await);
    let repo = Arc::new(FlakyRepo::new(sqlite.clone(), usize::MAX));
    let flusher = Arc::new(ChunkFlusher::new(2, repo as Arc<dyn JourneyRepo>));
    let saver = Saver::new(10, flusher, Duration::from_secs(3600)).unwrap();
    let journeys = sample_journeys(3);

    for journey in journeys.clone() {
        saver.save(journey).await.unwrap();
    }

    match saver.close().await {
        Err(SaverError::PartialFlush { unflushed }) => assert_eq!(unflushed, journeys),
        other => panic!("expected PartialFlush, got {other:?}"),
    }
    assert_eq!(sqlite.count().await.unwrap(), 0);
    assert_eq!(
        saver.save(sample_journeys(1).remove(0)).await,
        Err(SaverError::Closed)
    );
}

#[tokio::test]
async fn test_capacity_is_enforced_until_flush() {
    let repo = SqliteJourneyRepo::new(create_test_pool().await);
    let flusher = Arc::new(ChunkFlusher::new(5, Arc::new(repo.clone())));
    let saver = Saver::new(2, flusher, Duration::from_secs(3600)).unwrap();
    let journeys = sample_journeys(3);

    saver.save(journeys[0].clone()).await.unwrap();
    saver.save(journeys[1].clone()).await.unwrap();
    assert_eq!(
        saver.save(journeys[2].clone()).await,
        Err(SaverError::BufferFull)
    );
    assert_eq!(saver.len().await, saver.capacity());

    saver.close().await.unwrap();
    assert_eq!(repo.count().await.unwrap(), 2);
}
