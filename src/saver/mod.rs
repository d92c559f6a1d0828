//! Write-behind journey saver.
//!
//! A `Saver` accepts single journeys into a bounded in-memory buffer and
//! drains that buffer through a `Flusher` on a fixed interval and once more on
//! `close`. Journeys a flush round could not write stay buffered, ahead of
//! anything saved afterwards, and are retried on the next round.
//!
//! The buffer and the running/closed flag share one lock, held for the whole
//! flush round. `save` can therefore wait for up to one flush, but it never
//! observes a half-flushed buffer and the capacity check cannot race a flush.

mod worker;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::error_handling::SaverError;
use crate::flusher::Flusher;
use crate::models::Journey;

use worker::{flush_buffer, Worker};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SaverState {
    Running,
    Closed,
}

/// State guarded by the saver lock.
struct SaverInner {
    buffer: Vec<Journey>,
    state: SaverState,
}

/// Bounded write-behind buffer with periodic flushing.
///
/// ```no_run
/// # use std::sync::Arc;
/// # use std::time::Duration;
/// # use journey_store::{ChunkFlusher, Journey, Saver, SaverError, SqliteJourneyRepo};
/// # async fn example(repo: SqliteJourneyRepo, journey: Journey) -> Result<(), SaverError> {
/// let flusher = Arc::new(ChunkFlusher::new(100, Arc::new(repo)));
/// let saver = Saver::new(1000, flusher, Duration::from_secs(1))?;
///
/// saver.save(journey).await?;
///
/// if let Err(SaverError::PartialFlush { unflushed }) = saver.close().await {
///     eprintln!("{} journeys were lost", unflushed.len());
/// }
/// # Ok(())
/// # }
/// ```
pub struct Saver {
    inner: Arc<Mutex<SaverInner>>,
    flusher: Arc<dyn Flusher>,
    worker: Mutex<Option<Worker>>,
    capacity: usize,
}

impl Saver {
    /// Creates a saver and starts its flush loop on the current Tokio runtime.
    ///
    /// # Errors
    ///
    /// - `SaverError::InvalidCapacity` if `capacity` is zero
    /// - `SaverError::InvalidFlushInterval` if `flush_interval` is zero
    pub fn new(
        capacity: usize,
        flusher: Arc<dyn Flusher>,
        flush_interval: Duration,
    ) -> Result<Self, SaverError> {
        if capacity == 0 {
            return Err(SaverError::InvalidCapacity);
        }
        if flush_interval.is_zero() {
            return Err(SaverError::InvalidFlushInterval);
        }

        let inner = Arc::new(Mutex::new(SaverInner {
            buffer: Vec::with_capacity(capacity),
            state: SaverState::Running,
        }));
        let worker = Worker::spawn(Arc::clone(&inner), Arc::clone(&flusher), flush_interval);

        log::debug!(
            "Saver started (capacity={}, flush_interval={}ms)",
            capacity,
            flush_interval.as_millis()
        );

        Ok(Saver {
            inner,
            flusher,
            worker: Mutex::new(Some(worker)),
            capacity,
        })
    }

    /// Appends a journey to the tail of the buffer.
    ///
    /// # Errors
    ///
    /// - `SaverError::Closed` once `close` has been called
    /// - `SaverError::BufferFull` if the buffer already holds `capacity`
    ///   journeys; the journey is not queued
    pub async fn save(&self, journey: Journey) -> Result<(), SaverError> {
        let mut inner = self.inner.lock().await;

        if inner.state == SaverState::Closed {
            return Err(SaverError::Closed);
        }
        if inner.buffer.len() >= self.capacity {
            return Err(SaverError::BufferFull);
        }

        inner.buffer.push(journey);
        Ok(())
    }

    /// Stops accepting journeys, flushes what is buffered one last time and
    /// stops the flush loop. Returns only after that final flush has run.
    ///
    /// # Errors
    ///
    /// - `SaverError::Closed` if the saver was already closed
    /// - `SaverError::PartialFlush` carrying the journeys the final flush could
    ///   not write; the closed saver keeps no copy of them
    pub async fn close(&self) -> Result<(), SaverError> {
        {
            let mut inner = self.inner.lock().await;
            if inner.state == SaverState::Closed {
                return Err(SaverError::Closed);
            }
            inner.state = SaverState::Closed;
        }

        let worker = self.worker.lock().await.take();
        let unflushed = match worker {
            Some(worker) => match worker.stop().await {
                Some(unflushed) => unflushed,
                None => self.drain().await,
            },
            None => self.drain().await,
        };

        if unflushed.is_empty() {
            log::debug!("Saver closed, buffer fully flushed");
            Ok(())
        } else {
            log::warn!(
                "Saver closed with {} journeys not flushed",
                unflushed.len()
            );
            Err(SaverError::PartialFlush { unflushed })
        }
    }

    /// Final flush performed by `close` itself when the flush loop is gone.
    async fn drain(&self) -> Vec<Journey> {
        let mut inner = self.inner.lock().await;
        flush_buffer(&mut inner.buffer, self.flusher.as_ref()).await;
        std::mem::take(&mut inner.buffer)
    }

    /// Maximum number of journeys the buffer holds.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of journeys currently buffered.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.buffer.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn is_closed(&self) -> bool {
        self.inner.lock().await.state == SaverState::Closed
    }

    /// Copy of the buffered journeys, oldest first.
    pub async fn snapshot(&self) -> Vec<Journey> {
        self.inner.lock().await.buffer.clone()
    }
}
