//! Background flush loop.
//!
//! One task per saver. It flushes the whole buffer on every tick of the flush
//! interval and, when asked to stop, runs one last flush and replies with
//! whatever could not be written before exiting.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::flusher::Flusher;
use crate::models::Journey;

use super::SaverInner;

/// Reply channel for the final flush: carries the journeys left unwritten.
pub(super) type StopReply = oneshot::Sender<Vec<Journey>>;

/// Handle to a running flush loop.
pub(super) struct Worker {
    stop_tx: oneshot::Sender<StopReply>,
    handle: JoinHandle<()>,
}

impl Worker {
    pub(super) fn spawn(
        inner: Arc<Mutex<SaverInner>>,
        flusher: Arc<dyn Flusher>,
        interval: Duration,
    ) -> Self {
        let (stop_tx, stop_rx) = oneshot::channel();
        let handle = tokio::spawn(run_flush_loop(inner, flusher, interval, stop_rx));
        Worker { stop_tx, handle }
    }

    /// Asks the loop to run its final flush and waits until it has exited.
    ///
    /// Returns `None` if the loop is gone without replying (it panicked), in
    /// which case the caller has to drain the buffer itself.
    pub(super) async fn stop(self) -> Option<Vec<Journey>> {
        let (reply_tx, reply_rx) = oneshot::channel();
        if self.stop_tx.send(reply_tx).is_err() {
            log::error!("Saver flush loop exited before close was requested");
            return None;
        }

        let unflushed = reply_rx.await.ok();
        if let Err(e) = self.handle.await {
            log::error!("Saver flush loop terminated abnormally: {e}");
        }
        unflushed
    }
}

/// Runs one flush round over `buffer`, leaving only the journeys that failed.
///
/// The caller holds the saver lock for the whole round, so nothing is appended
/// while the flusher runs and the failures end up ahead of any later `save`.
pub(super) async fn flush_buffer(buffer: &mut Vec<Journey>, flusher: &dyn Flusher) {
    if buffer.is_empty() {
        return;
    }

    let pending = std::mem::take(buffer);
    let attempted = pending.len();
    let failed = flusher.flush(pending).await;

    if failed.is_empty() {
        log::debug!("Flush round wrote all {} buffered journeys", attempted);
    } else {
        log::warn!(
            "Flush round left {} of {} journeys in the buffer for the next round",
            failed.len(),
            attempted
        );
    }
    *buffer = failed;
}

async fn run_flush_loop(
    inner: Arc<Mutex<SaverInner>>,
    flusher: Arc<dyn Flusher>,
    interval: Duration,
    mut stop_rx: oneshot::Receiver<StopReply>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    ticker.tick().await;

    loop {
        tokio::select! {
            request = &mut stop_rx => {
                let mut guard = inner.lock().await;
                flush_buffer(&mut guard.buffer, flusher.as_ref()).await;
                let unflushed = std::mem::take(&mut guard.buffer);
                drop(guard);

                match request {
                    Ok(reply) => {
                        if let Err(unflushed) = reply.send(unflushed) {
                            log::error!(
                                "Close stopped waiting; {} journeys were not flushed",
                                unflushed.len()
                            );
                        }
                    }
                    // Saver dropped without close.
                    Err(_) if !unflushed.is_empty() => {
                        log::error!(
                            "Saver dropped without close; {} journeys were not flushed",
                            unflushed.len()
                        );
                    }
                    Err(_) => {}
                }
                return;
            }
            _ = ticker.tick() => {
                let mut guard = inner.lock().await;
                flush_buffer(&mut guard.buffer, flusher.as_ref()).await;
            }
        }
    }
}
