//! Shared test helpers for storage, flusher and saver tests.
//!
//! This module provides an in-memory database with migrations applied, sample
//! journeys, and a `JourneyRepo` fake that records every batch it receives.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use crate::error_handling::DatabaseError;
use crate::models::Journey;
use crate::storage::{run_migrations, JourneyRepo};

const LOCATIONS: [&str; 5] = ["Voronezh", "Ufa", "Moscow", "London", "Novosibirsk"];

/// Creates a test database pool with migrations applied.
///
/// A single connection that never expires, since every connection to
/// `sqlite::memory:` opens a separate database.
pub async fn create_test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test database pool");
    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// `n` unsaved journeys with distinct users, locations and whole-second times.
pub fn sample_journeys(n: usize) -> Vec<Journey> {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
    (0..n)
        .map(|i| {
            let start = base + Duration::days(i as i64);
            Journey::new(
                i as u64 + 1,
                LOCATIONS[i % LOCATIONS.len()],
                format!("journey #{i}"),
                start,
                start + Duration::hours(6),
            )
        })
        .collect()
}

/// `JourneyRepo` fake recording the batches passed to `add_journeys`.
///
/// Calls whose zero-based index is in `failing_calls` fail without storing
/// anything, mirroring the all-or-nothing batch contract.
#[derive(Default)]
pub struct RecordingRepo {
    failing_calls: HashSet<usize>,
    calls: Mutex<Vec<Vec<Journey>>>,
    stored: Mutex<Vec<Journey>>,
    last_id: AtomicU64,
}

impl RecordingRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(calls: impl IntoIterator<Item = usize>) -> Self {
        RecordingRepo {
            failing_calls: calls.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Every batch received by `add_journeys`, in call order.
    pub fn calls(&self) -> Vec<Vec<Journey>> {
        self.calls.lock().unwrap().clone()
    }

    /// Journeys that were "committed", ids assigned.
    pub fn stored(&self) -> Vec<Journey> {
        self.stored.lock().unwrap().clone()
    }

    fn commit(&self, journeys: &[Journey]) -> Vec<u64> {
        let mut stored = self.stored.lock().unwrap();
        journeys
            .iter()
            .map(|j| {
                let id = self.last_id.fetch_add(1, Ordering::SeqCst) + 1;
                stored.push(j.clone().with_id(id));
                id
            })
            .collect()
    }
}

#[async_trait]
impl JourneyRepo for RecordingRepo {
    async fn add_journey(&self, journey: &Journey) -> Result<u64, DatabaseError> {
        Ok(self.commit(std::slice::from_ref(journey))[0])
    }

    async fn add_journeys(&self, journeys: &[Journey]) -> Result<Vec<u64>, DatabaseError> {
        let call_index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(journeys.to_vec());
            calls.len() - 1
        };
        if self.failing_calls.contains(&call_index) {
            return Err(DatabaseError::SqlError(sqlx::Error::PoolTimedOut));
        }
        Ok(self.commit(journeys))
    }

    async fn describe_journey(&self, id: u64) -> Result<Journey, DatabaseError> {
        self.stored
            .lock()
            .unwrap()
            .iter()
            .find(|j| j.id == id)
            .cloned()
            .ok_or(DatabaseError::NotFound(id))
    }

    async fn list_journeys(&self, limit: u64, offset: u64) -> Result<Vec<Journey>, DatabaseError> {
        Ok(self
            .stored
            .lock()
            .unwrap()
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn update_journey(&self, journey: &Journey) -> Result<(), DatabaseError> {
        let mut stored = self.stored.lock().unwrap();
        match stored.iter_mut().find(|j| j.id == journey.id) {
            Some(existing) => {
                *existing = journey.clone();
                Ok(())
            }
            None => Err(DatabaseError::NotFound(journey.id)),
        }
    }

    async fn remove_journey(&self, id: u64) -> Result<(), DatabaseError> {
        let mut stored = self.stored.lock().unwrap();
        let before = stored.len();
        stored.retain(|j| j.id != id);
        if stored.len() == before {
            return Err(DatabaseError::NotFound(id));
        }
        Ok(())
    }
}
