//! Run command implementation
//!
//! This module implements the `run` command: one scheduled relay invocation.

use crate::adapters::transfer;
use crate::config::load_config_or_env;
use crate::core::relay::{RelayCoordinator, RelaySummary};
use crate::core::transform::Transformer;
use crate::domain::{RelayError, RunContext};
use clap::Args;
use tokio::sync::watch;

/// Arguments for the run command
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Fetch and transform but do not publish the CSV
    #[arg(long)]
    pub dry_run: bool,

    /// Copy the fetched XML and generated CSV into this directory
    #[arg(long, value_name = "DIR")]
    pub keep_artifacts: Option<String>,
}

impl RunArgs {
    /// Execute the run command
    pub async fn execute(
        &self,
        config_path: Option<&str>,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting run command");

        let mut config = match load_config_or_env(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("{e}");
                return Ok(e.exit_code());
            }
        };

        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }
        if let Some(dir) = &self.keep_artifacts {
            config.application.keep_artifacts_dir = Some(dir.clone());
        }

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        // Mapping errors must surface before any connection is opened
        let transformer = match Transformer::new(&config.transform, &config.csv) {
            Ok(t) => t,
            Err(e) => {
                tracing::error!(error = %e, "Invalid column mapping");
                eprintln!("{e}");
                return Ok(e.exit_code());
            }
        };

        // The coordinator stops between stages once the signal is raised; a
        // publish already under way is allowed to finish.
        let context = RunContext::start();
        let relay = tokio::task::spawn_blocking(move || -> Result<RelaySummary, RelayError> {
            let client = transfer::connect(&config.remote)?;
            let mut coordinator = RelayCoordinator::with_transformer(&config, transformer, client)?
                .with_shutdown(shutdown_signal);
            coordinator.run(&context)
        });

        let result = relay.await?;

        match result {
            Ok(summary) => {
                print_summary(&summary);
                Ok(0)
            }
            Err(e @ RelayError::Interrupted(_)) => {
                tracing::warn!(error = %e, "Relay interrupted, nothing published");
                eprintln!("{e}, nothing was published");
                Ok(e.exit_code())
            }
            Err(e) => {
                crate::log_error_with_context!(&e, "Relay run failed");
                eprintln!("Relay failed: {e}");
                Ok(e.exit_code())
            }
        }
    }
}

fn print_summary(summary: &RelaySummary) {
    println!("Relay summary:");
    println!("  Run ID: {}", summary.run_id);
    println!("  Source: {}", summary.source_path);
    println!("  Destination: {}", summary.destination_path);
    println!("  Downloaded: {} bytes", summary.bytes_downloaded);
    println!("  Records: {}", summary.record_count);
    println!("  CSV: {} bytes (sha256 {})", summary.csv_bytes, summary.csv_sha256);
    for path in &summary.kept_artifacts {
        println!("  Kept: {path}");
    }
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());

    if summary.published() {
        println!("Published {}", summary.destination_path);
    } else if summary.dry_run() {
        println!("Dry run, nothing published");
    } else {
        println!("No records, nothing published");
    }
}
