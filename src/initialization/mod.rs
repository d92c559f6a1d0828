//! Application initialization and resource setup.
//!
//! This module provides functions to initialize shared resources:
//! - Logger
//! - Database connection pool with migrations applied
//!
//! All initialization functions return proper error types for error handling.

mod logger;

use std::path::Path;
use std::sync::Arc;

use sqlx::SqlitePool;

use crate::error_handling::DatabaseError;
use crate::storage::{init_db_pool_with_path, run_migrations};

// Re-export public API
pub use logger::init_logger_with;

/// Opens (creating if needed) the SQLite database and brings its schema up to date.
///
/// # Errors
///
/// Returns `DatabaseError` if the file cannot be created, the pool cannot
/// connect, or a migration fails.
pub async fn init_storage(
    db_path: &Path,
    max_connections: u32,
) -> Result<Arc<SqlitePool>, DatabaseError> {
    let pool = init_db_pool_with_path(db_path, max_connections).await?;
    run_migrations(pool.as_ref()).await?;
    Ok(pool)
}
