//! Batch splitting helpers.

use std::collections::HashMap;

use crate::error_handling::ChunkError;
use crate::models::Journey;

/// Splits `items` into contiguous chunks of `chunk_size` elements.
///
/// Every chunk except possibly the last holds exactly `chunk_size` elements,
/// and concatenating the chunks yields `items` in its original order. An empty
/// slice yields no chunks; `None` stands for an absent batch and is rejected.
///
/// # Errors
///
/// - `ChunkError::InvalidChunkSize` if `chunk_size` is zero
/// - `ChunkError::NilSequence` if `items` is `None`
pub fn split_to_chunks<T>(
    items: Option<&[T]>,
    chunk_size: usize,
) -> Result<Vec<&[T]>, ChunkError> {
    let items = items.ok_or(ChunkError::NilSequence)?;
    if chunk_size == 0 {
        return Err(ChunkError::InvalidChunkSize);
    }
    Ok(items.chunks(chunk_size).collect())
}

/// Indexes journeys by id. Later duplicates win.
pub fn slice_to_map(journeys: &[Journey]) -> Result<HashMap<u64, Journey>, ChunkError> {
    if journeys.is_empty() {
        return Err(ChunkError::EmptySequence);
    }
    Ok(journeys.iter().map(|j| (j.id, j.clone())).collect())
}
