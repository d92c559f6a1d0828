//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `journey_store` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing output and exit codes
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use journey_store::config::EXIT_CODE_PARTIAL_FLUSH;
use journey_store::initialization::init_logger_with;
use journey_store::{run_ingest, Config, WriteMode};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env from the working directory, falling back to the executable's directory
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let config = Config::parse();

    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    match run_ingest(config).await {
        Ok(report) => {
            let accepted = match report.mode {
                WriteMode::Sync => report.created,
                WriteMode::Async => report.buffered,
            };
            println!(
                "Read {} line{}: {} journey{} accepted, {} rejected; {} stored in {:.1}s{}",
                report.lines_read,
                if report.lines_read == 1 { "" } else { "s" },
                accepted,
                if accepted == 1 { "" } else { "s" },
                report.rejected,
                report.stored,
                report.elapsed_seconds,
                if report.interrupted { " (interrupted)" } else { "" }
            );
            println!("Results saved in {}", report.db_path.display());

            if report.has_unflushed() {
                eprintln!(
                    "journey_store error: {} buffered journeys were not flushed",
                    report.unflushed.len()
                );
                for journey in &report.unflushed {
                    eprintln!("  {journey}");
                }
                process::exit(EXIT_CODE_PARTIAL_FLUSH);
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("journey_store error: {:#}", e);
            process::exit(1);
        }
    }
}
