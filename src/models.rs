//! Journey record moved through the write pipeline.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single journey (trip description).
///
/// `id` is `0` until the storage layer assigns one on first successful
/// persistence. Nothing in the write pipeline changes it; a journey that fails
/// to flush is re-submitted as the same value on the next round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Journey {
    #[serde(default)]
    pub id: u64,
    pub user_id: u64,
    pub location: String,
    #[serde(default)]
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl Journey {
    /// Creates a journey that has not been persisted yet (`id == 0`).
    pub fn new(
        user_id: u64,
        location: impl Into<String>,
        description: impl Into<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        Journey {
            id: 0,
            user_id,
            location: location.into(),
            description: description.into(),
            start_time,
            end_time,
        }
    }

    /// Returns a copy carrying the identifier assigned by storage.
    pub fn with_id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }

    /// True once storage has assigned an identifier.
    pub fn is_persisted(&self) -> bool {
        self.id != 0
    }
}

impl fmt::Display for Journey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Journey: id = {}, user_id = {}, location = {}, description = {}, start_time = {}, end_time = {}",
            self.id,
            self.user_id,
            self.location,
            self.description,
            self.start_time.to_rfc2822(),
            self.end_time.to_rfc2822(),
        )
    }
}
