//! Journey storage gateway.
//!
//! `JourneyRepo` is the boundary the write pipeline depends on. Its
//! `add_journeys` is atomic per call: every journey in the slice is committed
//! or none is. `SqliteJourneyRepo` implements it on a SQLite pool, one
//! transaction per batch.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, SqlitePool};

use crate::error_handling::DatabaseError;
use crate::models::Journey;

/// Storage operations on journeys.
#[async_trait]
pub trait JourneyRepo: Send + Sync {
    /// Inserts one journey and returns its assigned id.
    async fn add_journey(&self, journey: &Journey) -> Result<u64, DatabaseError>;

    /// Inserts all journeys in one atomic unit and returns their ids in input order.
    async fn add_journeys(&self, journeys: &[Journey]) -> Result<Vec<u64>, DatabaseError>;

    /// Fetches a journey by id.
    async fn describe_journey(&self, id: u64) -> Result<Journey, DatabaseError>;

    /// Lists journeys ordered by id.
    async fn list_journeys(&self, limit: u64, offset: u64) -> Result<Vec<Journey>, DatabaseError>;

    /// Replaces every field except `id` of an existing journey.
    async fn update_journey(&self, journey: &Journey) -> Result<(), DatabaseError>;

    /// Deletes a journey by id.
    async fn remove_journey(&self, id: u64) -> Result<(), DatabaseError>;
}

/// SQLite-backed `JourneyRepo`.
#[derive(Clone)]
pub struct SqliteJourneyRepo {
    pool: SqlitePool,
}

impl SqliteJourneyRepo {
    pub fn new(pool: SqlitePool) -> Self {
        SqliteJourneyRepo { pool }
    }

    /// Number of stored journeys.
    pub async fn count(&self) -> Result<u64, DatabaseError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM journeys")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }
}

fn to_db_int(value: u64) -> Result<i64, DatabaseError> {
    i64::try_from(value).map_err(|_| DatabaseError::OutOfRange(value))
}

/// Lossless text form of a timestamp.
fn to_db_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn from_db_time(text: &str) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::parse_from_rfc3339(text)
        .map(|time| time.with_timezone(&Utc))
        .map_err(|_| DatabaseError::InvalidTimestamp(text.to_string()))
}

fn journey_from_row(row: &SqliteRow) -> Result<Journey, DatabaseError> {
    let id: i64 = row.try_get("id")?;
    let user_id: i64 = row.try_get("user_id")?;
    Ok(Journey {
        id: id as u64,
        user_id: user_id as u64,
        location: row.try_get("location")?,
        description: row.try_get("description")?,
        start_time: from_db_time(row.try_get::<&str, _>("start_time")?)?,
        end_time: from_db_time(row.try_get::<&str, _>("end_time")?)?,
    })
}

async fn insert_journey<'e, E>(
    executor: E,
    journey: &Journey,
    created_at: &str,
) -> Result<u64, DatabaseError>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO journeys (user_id, location, description, start_time, end_time, created_at)
         VALUES (?, ?, ?, ?, ?, ?)
         RETURNING id",
    )
    .bind(to_db_int(journey.user_id)?)
    .bind(&journey.location)
    .bind(&journey.description)
    .bind(to_db_time(&journey.start_time))
    .bind(to_db_time(&journey.end_time))
    .bind(created_at)
    .fetch_one(executor)
    .await?;
    Ok(id as u64)
}

#[async_trait]
impl JourneyRepo for SqliteJourneyRepo {
    async fn add_journey(&self, journey: &Journey) -> Result<u64, DatabaseError> {
        let created_at = to_db_time(&Utc::now());
        insert_journey(&self.pool, journey, &created_at).await
    }

    async fn add_journeys(&self, journeys: &[Journey]) -> Result<Vec<u64>, DatabaseError> {
        if journeys.is_empty() {
            return Ok(Vec::new());
        }

        let created_at = to_db_time(&Utc::now());
        let mut tx = self.pool.begin().await?;
        let mut ids = Vec::with_capacity(journeys.len());
        for journey in journeys {
            // Dropping `tx` on error rolls the whole batch back.
            ids.push(insert_journey(&mut *tx, journey, &created_at).await?);
        }
        tx.commit().await?;

        log::debug!("Inserted batch of {} journeys", ids.len());
        Ok(ids)
    }

    async fn describe_journey(&self, id: u64) -> Result<Journey, DatabaseError> {
        let row = sqlx::query(
            "SELECT id, user_id, location, description, start_time, end_time
             FROM journeys WHERE id = ?",
        )
        .bind(to_db_int(id)?)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => journey_from_row(&row),
            None => Err(DatabaseError::NotFound(id)),
        }
    }

    async fn list_journeys(&self, limit: u64, offset: u64) -> Result<Vec<Journey>, DatabaseError> {
        let rows = sqlx::query(
            "SELECT id, user_id, location, description, start_time, end_time
             FROM journeys ORDER BY id LIMIT ? OFFSET ?",
        )
        .bind(to_db_int(limit)?)
        .bind(to_db_int(offset)?)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(journey_from_row).collect()
    }

    async fn update_journey(&self, journey: &Journey) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            "UPDATE journeys
             SET user_id = ?, location = ?, description = ?, start_time = ?, end_time = ?
             WHERE id = ?",
        )
        .bind(to_db_int(journey.user_id)?)
        .bind(&journey.location)
        .bind(&journey.description)
        .bind(to_db_time(&journey.start_time))
        .bind(to_db_time(&journey.end_time))
        .bind(to_db_int(journey.id)?)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(journey.id));
        }
        Ok(())
    }

    async fn remove_journey(&self, id: u64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM journeys WHERE id = ?")
            .bind(to_db_int(id)?)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(id));
        }
        Ok(())
    }
}
