//! Ingestion resource initialization.

use std::sync::Arc;

use anyhow::{Context, Result};
use log::{debug, info};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::config::{Config, WriteMode};
use crate::error_handling::IngestStats;
use crate::flusher::ChunkFlusher;
use crate::initialization::init_storage;
use crate::queue::{run_consumer, task_channel};
use crate::saver::Saver;
use crate::service::JourneyService;
use crate::storage::{JourneyRepo, SqliteJourneyRepo};

use super::resources::{IngestResources, LineSource, WriteBehind};

/// Initialize everything an ingestion run needs.
///
/// 1. Validate the configuration
/// 2. Open the input (file or stdin)
/// 3. Open the database and apply migrations
/// 4. In async mode, start the saver and the queue consumer
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the input cannot be
/// opened, or storage cannot be initialized.
pub async fn init_ingest_resources(config: Config) -> Result<(IngestResources, LineSource)> {
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Configuration validation failed: {}", e))?;

    let source = if config.file.as_os_str() == "-" {
        info!("Reading journeys from stdin");
        LineSource::Stdin(BufReader::new(tokio::io::stdin()).lines())
    } else {
        let file = tokio::fs::File::open(&config.file)
            .await
            .with_context(|| format!("Failed to open input file {}", config.file.display()))?;
        info!("Reading journeys from {}", config.file.display());
        LineSource::File(BufReader::new(file).lines())
    };

    let pool = init_storage(&config.db_path, config.max_db_connections)
        .await
        .context("Failed to initialize database")?;
    let repo = SqliteJourneyRepo::new(pool.as_ref().clone());
    let shared_repo: Arc<dyn JourneyRepo> = Arc::new(repo.clone());
    let stats = Arc::new(IngestStats::new());

    let (producer, consumer) = task_channel(config.queue_capacity);
    let write_behind = match config.mode {
        WriteMode::Sync => {
            drop(consumer);
            None
        }
        WriteMode::Async => {
            let flusher = Arc::new(ChunkFlusher::new(
                config.chunk_size,
                Arc::clone(&shared_repo),
            ));
            debug!(
                "Write-behind flusher writes up to {} journeys per storage call",
                flusher.chunk_size()
            );
            let saver = Arc::new(
                Saver::new(config.capacity, flusher, config.flush_interval())
                    .context("Failed to start saver")?,
            );
            let consumer_task = tokio::spawn(run_consumer(
                consumer,
                Arc::clone(&saver),
                Arc::clone(&shared_repo),
                Arc::clone(&stats),
            ));
            Some(WriteBehind {
                saver,
                consumer_task,
            })
        }
    };

    info!(
        "Ingesting in {:?} mode (capacity={}, chunk_size={}, flush_interval={}ms)",
        config.mode, config.capacity, config.chunk_size, config.flush_interval_ms
    );

    let service = JourneyService::new(shared_repo, producer, config.chunk_size);

    Ok((
        IngestResources {
            pool,
            repo,
            service,
            write_behind,
            stats,
            start_time: std::time::Instant::now(),
            config,
        },
        source,
    ))
}
