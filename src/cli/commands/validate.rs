//! Validate config command implementation
//!
//! This module implements the `validate-config` command. It loads the
//! configuration exactly as `run` would and prints a summary with the
//! password redacted.

use crate::config::{load_config_or_env, RelayConfig};
use crate::core::transform::Transformer;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: Option<&str>) -> anyhow::Result<i32> {
        let shown_path = config_path.unwrap_or("(defaults and environment)");
        tracing::info!(config_path = %shown_path, "Validating configuration");

        println!("Validating configuration: {shown_path}");
        println!();

        let config = match load_config_or_env(config_path) {
            Ok(c) => {
                println!("Configuration loaded");
                c
            }
            Err(e) => {
                println!("Failed to load configuration");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        if let Err(e) = config.validate() {
            println!("Configuration validation failed");
            println!("   Error: {e}");
            println!();
            return Ok(2);
        }

        // Compiling the mapping catches bad selector paths and timestamp formats
        let transformer = match Transformer::new(&config.transform, &config.csv) {
            Ok(t) => t,
            Err(e) => {
                println!("Column mapping is invalid");
                println!("   Error: {e}");
                println!();
                return Ok(2);
            }
        };

        println!("Configuration is valid");
        println!();
        print_summary(&config, &transformer.mapping().columns());
        Ok(0)
    }
}

fn print_summary(config: &RelayConfig, columns: &[String]) {
    println!("Configuration Summary:");
    println!("  Environment: {:?}", config.environment);
    println!("  Log Level: {}", config.application.log_level);
    println!("  Dry Run: {}", config.application.dry_run);
    println!(
        "  Remote: {}@{}:{}",
        config.remote.username, config.remote.host, config.remote.port
    );
    println!(
        "  Password: {}",
        if config.remote.password.is_some() { "***" } else { "(not set)" }
    );
    println!(
        "  Host Key Pin: {}",
        config
            .remote
            .expected_host_key_sha256
            .as_deref()
            .unwrap_or("(not pinned)")
    );
    println!("  Source: {}", config.source.remote_path);
    if !config.source.fallback_paths.is_empty() {
        println!("  Source Fallbacks: {:?}", config.source.fallback_paths);
    }
    if config.source.discover_depth > 0 {
        println!("  Source Discovery Depth: {}", config.source.discover_depth);
    }
    println!("  Destination: {}", config.destination.remote_path);
    println!("  Skip When Empty: {}", config.destination.skip_when_empty);
    println!(
        "  Records: <{}> under '{}'",
        config.transform.record_tag, config.transform.container_path
    );
    if config.transform.columns.is_empty() {
        println!("  Columns (built-in partner mapping): {}", columns.join(", "));
    } else {
        println!("  Columns: {}", columns.join(", "));
    }
    println!(
        "  CSV: delimiter {:?}, quoting {:?}, terminator {:?}",
        config.csv.delimiter, config.csv.quote_style, config.csv.line_terminator
    );
    println!();
}
