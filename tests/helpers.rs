// Shared test helpers for database setup and test data creation.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use journey_store::{run_migrations, DatabaseError, Journey, JourneyRepo, SqliteJourneyRepo};

/// Creates a test database pool with migrations applied.
/// Uses a single never-expiring in-memory connection.
#[allow(dead_code)] // Used by other test files
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

/// `n` valid, unsaved journeys; user ids start at 1.
#[allow(dead_code)]
pub fn sample_journeys(n: usize) -> Vec<Journey> {
    let base = Utc.with_ymd_and_hms(2024, 6, 1, 7, 30, 0).unwrap();
    (0..n)
        .map(|i| {
            let start = base + Duration::hours(i as i64);
            Journey::new(
                i as u64 + 1,
                format!("City {i}"),
                "",
                start,
                start + Duration::minutes(45),
            )
        })
        .collect()
}

/// One JSON-lines record for `user_id`.
#[allow(dead_code)]
pub fn journey_line(user_id: u64, location: &str) -> String {
    format!(
        r#"{{"user_id": {user_id}, "location": "{location}", "description": "", "start_time": "2024-06-01T08:00:00Z", "end_time": "2024-06-01T09:30:00Z"}}"#
    )
}

/// Writes `lines` to `name` inside `dir` and returns the path.
#[allow(dead_code)]
pub fn write_input(dir: &Path, name: &str, lines: &[String]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, lines.join("\n")).expect("Failed to write input file");
    path
}

/// SQLite repo whose `add_journeys` fails for the first `failures` calls.
#[allow(dead_code)]
pub struct FlakyRepo {
    inner: SqliteJourneyRepo,
    failures: usize,
    calls: AtomicUsize,
}

#[allow(dead_code)]
impl FlakyRepo {
    pub fn new(inner: SqliteJourneyRepo, failures: usize) -> Self {
        FlakyRepo {
            inner,
            failures,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl JourneyRepo for FlakyRepo {
    async fn add_journey(&self, journey: &Journey) -> Result<u64, DatabaseError> {
        self.inner.add_journey(journey).await
    }

    async fn add_journeys(&self, journeys: &[Journey]) -> Result<Vec<u64>, DatabaseError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            return Err(DatabaseError::SqlError(sqlx::Error::PoolTimedOut));
        }
        self.inner.add_journeys(journeys).await
    }

    async fn describe_journey(&self, id: u64) -> Result<Journey, DatabaseError> {
        self.inner.describe_journey(id).await
    }

    async fn list_journeys(&self, limit: u64, offset: u64) -> Result<Vec<Journey>, DatabaseError> {
        self.inner.list_journeys(limit, offset).await
    }

    async fn update_journey(&self, journey: &Journey) -> Result<(), DatabaseError> {
        self.inner.update_journey(journey).await
    }

    async fn remove_journey(&self, id: u64) -> Result<(), DatabaseError> {
        self.inner.remove_journey(id).await
    }
}
