//! Retry strategy for re-submitting journeys to a full saver.

use std::time::Duration;
use tokio_retry::strategy::ExponentialBackoff;

use crate::config::{
    SAVE_RETRY_FACTOR, SAVE_RETRY_BASE_MS, SAVE_RETRY_MAX_ATTEMPTS, SAVE_RETRY_MAX_DELAY_MS,
};

/// Creates an exponential backoff retry strategy for `BufferFull` rejections.
///
/// Delays are `SAVE_RETRY_BASE_MS^n * SAVE_RETRY_FACTOR` milliseconds,
/// capped at `SAVE_RETRY_MAX_DELAY_MS`, for at most `SAVE_RETRY_MAX_ATTEMPTS`
/// retries. A saver that stays full longer than that sheds the journey.
pub fn get_save_retry_strategy() -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(SAVE_RETRY_BASE_MS)
        .factor(SAVE_RETRY_FACTOR)
        .max_delay(Duration::from_millis(SAVE_RETRY_MAX_DELAY_MS))
        .take(SAVE_RETRY_MAX_ATTEMPTS)
}
