//! List remote command implementation
//!
//! Shows what the relay would see on the server: one line per entry of a
//! remote directory, with its type and size. Defaults to the directory of
//! `source.remote_path`.

use crate::adapters::transfer::{self, RemoteEntry, TransferClient};
use crate::config::load_config_or_env;
use crate::domain::RelayError;
use clap::Args;

/// Arguments for the list-remote command
#[derive(Args, Debug, Default)]
pub struct ListRemoteArgs {
    /// Remote directory (defaults to the directory of the source path)
    #[arg(value_name = "DIR")]
    pub dir: Option<String>,

    /// Only show XML files
    #[arg(long)]
    pub xml_only: bool,
}

impl ListRemoteArgs {
    /// Execute the list-remote command
    pub async fn execute(&self, config_path: Option<&str>) -> anyhow::Result<i32> {
        let config = match load_config_or_env(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("{e}");
                return Ok(e.exit_code());
            }
        };

        if let Err(e) = config.validate() {
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        let dir = self
            .dir
            .clone()
            .unwrap_or_else(|| source_dir(&config.source.remote_path));
        tracing::info!(dir = %dir, host = %config.remote.host, "Listing remote directory");

        let listed = dir.clone();
        let entries = tokio::task::spawn_blocking(move || -> Result<_, RelayError> {
            let mut client = transfer::connect(&config.remote)?;
            Ok(client.list_dir(&listed)?)
        })
        .await?;

        match entries {
            Ok(entries) => {
                println!("{dir}:");
                for line in render_listing(entries, self.xml_only) {
                    println!("{line}");
                }
                Ok(0)
            }
            Err(e) => {
                crate::log_error_with_context!(&e, "Remote listing failed");
                eprintln!("Listing failed: {e}");
                Ok(e.exit_code())
            }
        }
    }
}

/// Directory part of a remote file path
fn source_dir(path: &str) -> String {
    match path.trim().rsplit_once('/') {
        Some(("", _)) => "/".to_string(),
        Some((dir, _)) => dir.to_string(),
        None => ".".to_string(),
    }
}

/// Directories first, then files, each sorted by name
fn render_listing(mut entries: Vec<RemoteEntry>, xml_only: bool) -> Vec<String> {
    if xml_only {
        entries.retain(|e| !e.is_dir && e.name.to_ascii_lowercase().ends_with(".xml"));
    }
    entries.sort_by(|a, b| b.is_dir.cmp(&a.is_dir).then_with(|| a.name.cmp(&b.name)));

    let mut lines: Vec<String> = entries
        .iter()
        .map(|entry| {
            let size = match entry.size {
                Some(size) if !entry.is_dir => size.to_string(),
                _ => "-".to_string(),
            };
            let kind = if entry.is_dir { 'd' } else { 'f' };
            let suffix = if entry.is_dir { "/" } else { "" };
            format!("  {kind} {size:>12}  {}{suffix}", entry.name)
        })
        .collect();
    lines.push(format!("Total: {}", entries.len()));
    lines
}
