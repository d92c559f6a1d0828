//! In-process task channel.
//!
//! Messages travel as JSON strings so that the consumer handles exactly what
//! an out-of-process broker would deliver, including payloads it cannot decode.

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::error_handling::QueueError;

use super::message::TaskMessage;

/// Creates a bounded task channel holding at most `capacity` pending messages.
///
/// A zero capacity is raised to one.
pub fn task_channel(capacity: usize) -> (TaskProducer, TaskConsumer) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (TaskProducer { tx }, TaskConsumer { rx })
}

/// Sending half of the task channel. Cloning shares the same queue.
#[derive(Debug, Clone)]
pub struct TaskProducer {
    tx: mpsc::Sender<String>,
}

impl TaskProducer {
    /// Encodes and enqueues a message, waiting for room when the queue is full.
    ///
    /// # Errors
    ///
    /// - `QueueError::Encode` if the message cannot be serialized
    /// - `QueueError::Closed` if the consumer has been dropped
    pub async fn send(&self, message: &TaskMessage) -> Result<(), QueueError> {
        let payload = message.encode()?;
        self.send_raw(payload).await
    }

    /// Enqueues an already encoded payload.
    pub async fn send_raw(&self, payload: String) -> Result<(), QueueError> {
        match self.tx.try_send(payload) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(payload)) => {
                // Backpressure: wait for the consumer to catch up.
                log::debug!("Task queue full, waiting for the consumer");
                self.tx
                    .send(payload)
                    .await
                    .map_err(|_| QueueError::Closed)
            }
            Err(TrySendError::Closed(_)) => Err(QueueError::Closed),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Receiving half of the task channel.
#[derive(Debug)]
pub struct TaskConsumer {
    rx: mpsc::Receiver<String>,
}

impl TaskConsumer {
    /// Next raw payload, or `None` once every producer is dropped and the
    /// queue is drained.
    pub async fn recv(&mut self) -> Option<String> {
        self.rx.recv().await
    }
}
