//! Deferred journey writes.
//!
//! The service publishes `TaskMessage`s on a bounded channel; `run_consumer`
//! drains it, feeding creates into a `Saver` and applying updates and deletes
//! to the repository.

mod channel;
mod consumer;
mod message;

pub use channel::{task_channel, TaskConsumer, TaskProducer};
pub use consumer::run_consumer;
pub use message::TaskMessage;
