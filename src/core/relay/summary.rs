//! Relay run summary

use serde::Serialize;
use std::time::Duration;
use uuid::Uuid;

/// Why the CSV was or wasn't uploaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishOutcome {
    /// Uploaded to the destination path
    Published,
    /// Dry run, nothing uploaded
    SkippedDryRun,
    /// No records and `skip_when_empty` is set
    SkippedEmpty,
}

/// Outcome of one relay run
#[derive(Debug, Clone, Serialize)]
pub struct RelaySummary {
    /// Run identifier
    pub run_id: Uuid,

    /// Remote path the XML was read from
    pub source_path: String,

    /// Remote path of the CSV
    pub destination_path: String,

    /// Size of the downloaded XML
    pub bytes_downloaded: usize,

    /// Data rows in the CSV
    pub record_count: usize,

    /// Size of the rendered CSV
    pub csv_bytes: usize,

    /// Hex SHA-256 of the rendered CSV
    pub csv_sha256: String,

    /// Publish decision
    pub outcome: PublishOutcome,

    /// Local copies of the staged files, when kept
    pub kept_artifacts: Vec<String>,

    /// Wall-clock duration of the run
    #[serde(serialize_with = "serialize_duration_ms")]
    pub duration: Duration,
}

impl RelaySummary {
    /// Whether the CSV was uploaded
    pub fn published(&self) -> bool {
        self.outcome == PublishOutcome::Published
    }

    /// Whether this was a dry run
    pub fn dry_run(&self) -> bool {
        self.outcome == PublishOutcome::SkippedDryRun
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            run_id = %self.run_id,
            source = %self.source_path,
            destination = %self.destination_path,
            bytes_downloaded = self.bytes_downloaded,
            records = self.record_count,
            csv_bytes = self.csv_bytes,
            csv_sha256 = %self.csv_sha256,
            outcome = ?self.outcome,
            duration_ms = self.duration.as_millis() as u64,
            "Relay completed"
        );
    }
}

fn serialize_duration_ms<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_u64(duration.as_millis() as u64)
}
