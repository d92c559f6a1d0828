//! Database connection pool management.
//!
//! This module initializes and configures the SQLite connection pool with:
//! - WAL mode enabled for concurrent access
//! - Connection limits and a fail-fast acquire timeout
//! - Automatic database file creation

use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

use log::{error, info};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use crate::config::DB_ACQUIRE_TIMEOUT;
use crate::error_handling::DatabaseError;

/// Initializes and returns a database connection pool for `db_path`.
///
/// Creates the database file if it doesn't exist and enables WAL mode so the
/// saver's flush rounds and synchronous writes don't block readers.
pub async fn init_db_pool_with_path(
    db_path: &Path,
    max_connections: u32,
) -> Result<Arc<SqlitePool>, DatabaseError> {
    let db_path_str = db_path.to_string_lossy().to_string();
    match OpenOptions::new()
        .read(true)
        .write(true)
        .create_new(true)
        .open(&db_path_str)
    {
        Ok(_) => info!("Database file created successfully."),
        Err(ref e) if e.kind() == ErrorKind::AlreadyExists => {
            info!("Database file already exists.")
        }
        Err(e) => {
            error!("Failed to create database file: {e}");
            return Err(DatabaseError::FileCreationError(e.to_string()));
        }
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(DB_ACQUIRE_TIMEOUT)
        .connect(&format!("sqlite:{}", db_path_str))
        .await
        .map_err(|e| {
            error!("Failed to connect to database: {e}");
            DatabaseError::SqlError(e)
        })?;

    sqlx::query("PRAGMA journal_mode=WAL")
        .execute(&pool)
        .await
        .map_err(|e| {
            error!("Failed to set WAL mode: {e}");
            DatabaseError::SqlError(e)
        })?;

    Ok(Arc::new(pool))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_init_pool_creates_missing_file() {
        let dir = tempdir().expect("Failed to create temp dir");
        let db_path = dir.path().join("journeys.db");
        assert!(!db_path.exists());

        let pool = init_db_pool_with_path(&db_path, 2)
            .await
            .expect("pool should initialize");
        assert!(db_path.exists());

        let mode: String = sqlx::query_scalar("PRAGMA journal_mode")
            .fetch_one(pool.as_ref())
            .await
            .expect("pragma should succeed");
        assert_eq!(mode.to_lowercase(), "wal");
    }

    #[tokio::test]
    async fn test_init_pool_reuses_existing_file() {
        let dir = tempdir().expect("Failed to create temp dir");
        let db_path = dir.path().join("journeys.db");

        let first = init_db_pool_with_path(&db_path, 1).await;
        assert!(first.is_ok());
        drop(first);

        let second = init_db_pool_with_path(&db_path, 1).await;
        assert!(second.is_ok());
    }

    #[tokio::test]
    async fn test_init_pool_fails_for_missing_directory() {
        let dir = tempdir().expect("Failed to create temp dir");
        let db_path = dir.path().join("missing").join("journeys.db");

        let result = init_db_pool_with_path(&db_path, 1).await;
        assert!(matches!(result, Err(DatabaseError::FileCreationError(_))));
    }
}
