//! Relay coordinator - runs one fetch, transform and publish cycle
//!
//! Stages run strictly in order and any error aborts the run before publish,
//! so a failed fetch or transform never uploads a partial or empty CSV.

use super::locate::locate_source;
use super::staging::StagingArea;
use super::summary::{PublishOutcome, RelaySummary};
use crate::adapters::transfer::TransferClient;
use crate::config::{RelayConfig, SourceConfig};
use crate::core::transform::Transformer;
use crate::domain::context::RunContext;
use crate::domain::errors::RelayError;
use crate::domain::paths::RemotePath;
use crate::domain::Result;
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use std::time::Instant;
use tokio::sync::watch;

/// Run-level switches
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelayOptions {
    /// Transform but never publish
    pub dry_run: bool,

    /// Don't publish a header-only CSV
    pub skip_when_empty: bool,

    /// Copy staged files here after the transform
    pub keep_artifacts_dir: Option<PathBuf>,

    /// Parent of the staging directory; the system temp dir when `None`
    pub staging_dir: Option<PathBuf>,
}

impl RelayOptions {
    /// Options as configured
    pub fn from_config(config: &RelayConfig) -> Self {
        Self {
            dry_run: config.application.dry_run,
            skip_when_empty: config.destination.skip_when_empty,
            keep_artifacts_dir: config.application.keep_artifacts_dir.as_ref().map(PathBuf::from),
            staging_dir: config.application.staging_dir.as_ref().map(PathBuf::from),
        }
    }
}

/// Relay coordinator
pub struct RelayCoordinator<C: TransferClient> {
    client: C,
    transformer: Transformer,
    source: SourceConfig,
    destination: RemotePath,
    options: RelayOptions,
    shutdown: Option<watch::Receiver<bool>>,
}

impl<C: TransferClient> RelayCoordinator<C> {
    /// Create a coordinator for a connected client
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the destination path is invalid or
    /// the column mapping cannot be compiled.
    pub fn new(config: &RelayConfig, client: C) -> Result<Self> {
        let transformer = Transformer::new(&config.transform, &config.csv)?;
        Self::with_transformer(config, transformer, client)
    }

    /// Create a coordinator around an already compiled transformer
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the destination path is invalid.
    pub fn with_transformer(
        config: &RelayConfig,
        transformer: Transformer,
        client: C,
    ) -> Result<Self> {
        let destination =
            RemotePath::new(&config.destination.remote_path).map_err(RelayError::Configuration)?;

        Ok(Self {
            client,
            transformer,
            source: config.source.clone(),
            destination,
            options: RelayOptions::from_config(config),
            shutdown: None,
        })
    }

    /// Replace the configured options
    pub fn with_options(mut self, options: RelayOptions) -> Self {
        self.options = options;
        self
    }

    /// Stop before the next stage once `shutdown` turns true
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    /// Options in effect
    pub fn options(&self) -> &RelayOptions {
        &self.options
    }

    /// The transfer client
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Give back the transfer client
    pub fn into_client(self) -> C {
        self.client
    }

    /// Execute one relay run
    ///
    /// 1. Locate the source document
    /// 2. Fetch it and stage it locally
    /// 3. Extract records and render the CSV, staging it too
    /// 4. Publish the CSV unless this is a dry run, or the table is empty
    ///    and `skip_when_empty` is set
    ///
    /// # Errors
    ///
    /// Returns the first error raised by any stage. Nothing is published
    /// after an error.
    pub fn run(&mut self, context: &RunContext) -> Result<RelaySummary> {
        let span = tracing::info_span!("relay", run_id = %context.run_id);
        let _enter = span.enter();

        let start_time = Instant::now();
        tracing::info!(
            source = %self.source.remote_path,
            destination = %self.destination,
            dry_run = self.options.dry_run,
            "Starting relay"
        );

        let mut staging = match &self.options.staging_dir {
            Some(dir) => StagingArea::new_in(dir)?,
            None => StagingArea::new()?,
        };

        // Locate and fetch
        self.check_shutdown("fetch")?;
        let source_path = locate_source(&mut self.client, &self.source)?;
        crate::log_stage_start!("fetch", source_path);
        let stage_time = Instant::now();
        let xml = self.client.fetch(&source_path)?;
        crate::log_stage_complete!("fetch", xml.len(), stage_time.elapsed());
        staging.write(source_path.file_name(), &xml)?;

        // Transform
        self.check_shutdown("transform")?;
        crate::log_stage_start!("transform", source_path);
        let stage_time = Instant::now();
        let transformed = self.transformer.transform(&xml, context)?;
        crate::log_stage_complete!("transform", transformed.csv.len(), stage_time.elapsed());
        staging.write(&staged_csv_name(&self.destination, &source_path), &transformed.csv)?;

        let record_count = transformed.record_count();
        let csv_sha256 = format!("{:x}", Sha256::digest(&transformed.csv));
        tracing::info!(records = record_count, csv_sha256 = %csv_sha256, "Rendered CSV");

        let kept_artifacts = match &self.options.keep_artifacts_dir {
            Some(dir) => staging
                .keep_copies(dir)?
                .into_iter()
                .map(|p| p.display().to_string())
                .collect(),
            None => Vec::new(),
        };

        // Publish
        let outcome = if self.options.dry_run {
            tracing::info!(destination = %self.destination, "Dry run, not publishing");
            PublishOutcome::SkippedDryRun
        } else if record_count == 0 && self.options.skip_when_empty {
            tracing::warn!(destination = %self.destination, "No records extracted, not publishing");
            PublishOutcome::SkippedEmpty
        } else {
            self.check_shutdown("publish")?;
            crate::log_stage_start!("publish", self.destination);
            let stage_time = Instant::now();
            self.client.publish(&self.destination, &transformed.csv)?;
            crate::log_stage_complete!("publish", transformed.csv.len(), stage_time.elapsed());
            PublishOutcome::Published
        };

        let summary = RelaySummary {
            run_id: context.run_id,
            source_path: source_path.to_string(),
            destination_path: self.destination.to_string(),
            bytes_downloaded: xml.len(),
            record_count,
            csv_bytes: transformed.csv.len(),
            csv_sha256,
            outcome,
            kept_artifacts,
            duration: start_time.elapsed(),
        };
        summary.log_summary();

        Ok(summary)
    }

    fn check_shutdown(&self, stage: &str) -> Result<()> {
        match &self.shutdown {
            Some(shutdown) if *shutdown.borrow() => {
                tracing::warn!(stage, "Shutdown requested, stopping relay");
                Err(RelayError::Interrupted(stage.to_string()))
            }
            _ => Ok(()),
        }
    }
}

/// Local name of the staged CSV
///
/// Uses the destination file name, unless it collides with the staged source.
fn staged_csv_name(destination: &RemotePath, source: &RemotePath) -> String {
    let name = destination.file_name();
    if name == source.file_name() {
        format!("out-{name}")
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staged_csv_name() {
        let csv = RemotePath::new("/Import/feed.csv").unwrap();
        let xml = RemotePath::new("/import/feed.xml").unwrap();
        assert_eq!(staged_csv_name(&csv, &xml), "feed.csv");

        let same = RemotePath::new("/other/feed.xml").unwrap();
        assert_eq!(staged_csv_name(&same, &xml), "out-feed.xml");
    }

    #[test]
    fn test_options_from_config() {
        let mut config = RelayConfig::default();
        config.application.dry_run = true;
        config.application.keep_artifacts_dir = Some("/tmp/keep".to_string());
        config.destination.skip_when_empty = true;
        config.application.staging_dir = Some("/var/tmp/xmlrelay".to_string());

        let options = RelayOptions::from_config(&config);
        assert!(options.dry_run);
        assert!(options.skip_when_empty);
        assert_eq!(options.keep_artifacts_dir, Some(PathBuf::from("/tmp/keep")));
        assert_eq!(options.staging_dir, Some(PathBuf::from("/var/tmp/xmlrelay")));
    }
}
