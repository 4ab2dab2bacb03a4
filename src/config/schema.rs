//! Configuration schema types
//!
//! This module defines the configuration structure for xmlrelay. Every section
//! has defaults, so a run can be configured from environment variables alone.

use crate::config::SecretString;
use crate::domain::paths::RemotePath;
use serde::{Deserialize, Serialize};

/// Runtime environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment
    #[default]
    Development,
    /// Staging environment
    Staging,
    /// Production environment
    Production,
}

/// Main xmlrelay configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: Environment,

    /// Remote store connection settings
    #[serde(default)]
    pub remote: RemoteConfig,

    /// Where the partner XML lives
    #[serde(default)]
    pub source: SourceConfig,

    /// Where the CSV is published
    #[serde(default)]
    pub destination: DestinationConfig,

    /// XML to record extraction rules
    #[serde(default)]
    pub transform: TransformConfig,

    /// CSV output format
    #[serde(default)]
    pub csv: CsvConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl RelayConfig {
    /// Validates every section, including the remote connection
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.validate_local()?;
        self.remote.validate(&self.environment)?;
        self.source.validate()?;
        self.destination.validate()?;

        if self.source.remote_path.trim() == self.destination.remote_path.trim() {
            return Err(
                "source.remote_path and destination.remote_path must differ".to_string(),
            );
        }
        Ok(())
    }

    /// Validates the sections needed for a purely local conversion
    ///
    /// # Errors
    ///
    /// Returns an error if application, transform, csv or logging settings are invalid
    pub fn validate_local(&self) -> Result<(), String> {
        self.application.validate()?;
        self.transform.validate()?;
        self.csv.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Dry run mode (fetch and transform, but don't publish)
    #[serde(default)]
    pub dry_run: bool,

    /// Copy the staged XML and CSV into this directory after the transform
    #[serde(default)]
    pub keep_artifacts_dir: Option<String>,

    /// Parent of the per-run staging directory (system temp dir when unset)
    #[serde(default)]
    pub staging_dir: Option<String>,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }

        if let Some(dir) = &self.keep_artifacts_dir {
            if dir.trim().is_empty() {
                return Err("application.keep_artifacts_dir cannot be empty".to_string());
            }
        }
        if let Some(dir) = &self.staging_dir {
            if dir.trim().is_empty() {
                return Err("application.staging_dir cannot be empty".to_string());
            }
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
            keep_artifacts_dir: None,
            staging_dir: None,
        }
    }
}

/// Remote store (SFTP) connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Host name or address of the SFTP server
    #[serde(default)]
    pub host: String,

    /// SSH port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Login name
    #[serde(default)]
    pub username: String,

    /// Password for authentication
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub password: Option<SecretString>,

    /// Hex SHA-256 of the server host key
    ///
    /// When set, the connection is refused if the server presents a different key.
    /// Required in production.
    #[serde(default)]
    pub expected_host_key_sha256: Option<String>,
}

impl RemoteConfig {
    fn validate(&self, environment: &Environment) -> Result<(), String> {
        use secrecy::ExposeSecret;

        if self.host.trim().is_empty() {
            return Err("remote.host cannot be empty".to_string());
        }

        if self.port == 0 {
            return Err("remote.port must be > 0".to_string());
        }

        if self.username.trim().is_empty() {
            return Err("remote.username cannot be empty".to_string());
        }

        if self
            .password
            .as_ref()
            .map(|p| p.expose_secret().is_empty())
            .unwrap_or(true)
        {
            return Err("remote.password cannot be empty".to_string());
        }

        if let Some(fingerprint) = &self.expected_host_key_sha256 {
            let normalized = normalize_fingerprint(fingerprint);
            if normalized.len() != 64 || !normalized.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(format!(
                    "remote.expected_host_key_sha256 must be 64 hex characters, got '{fingerprint}'"
                ));
            }
        } else if *environment == Environment::Production {
            return Err(
                "remote.expected_host_key_sha256 is required in production environments"
                    .to_string(),
            );
        }

        Ok(())
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: default_port(),
            username: String::new(),
            password: None,
            expected_host_key_sha256: None,
        }
    }
}

/// Lowercases a host key fingerprint and drops `:` separators
pub fn normalize_fingerprint(fingerprint: &str) -> String {
    fingerprint
        .trim()
        .chars()
        .filter(|c| *c != ':')
        .collect::<String>()
        .to_ascii_lowercase()
}

/// Source document location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Remote path of the partner XML
    #[serde(default = "default_source_remote_path")]
    pub remote_path: String,

    /// Alternative paths tried in order when `remote_path` doesn't exist
    #[serde(default)]
    pub fallback_paths: Vec<String>,

    /// Directory depth to search for the file name when no path matches (0 disables)
    #[serde(default)]
    pub discover_depth: usize,
}

impl SourceConfig {
    fn validate(&self) -> Result<(), String> {
        RemotePath::new(self.remote_path.as_str())
            .map_err(|e| format!("source.remote_path: {e}"))?;

        for path in &self.fallback_paths {
            RemotePath::new(path.as_str())
                .map_err(|e| format!("source.fallback_paths: {e}"))?;
        }

        if self.discover_depth > 5 {
            return Err(format!(
                "source.discover_depth must be between 0 and 5, got {}",
                self.discover_depth
            ));
        }
        Ok(())
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            remote_path: default_source_remote_path(),
            fallback_paths: Vec::new(),
            discover_depth: 0,
        }
    }
}

/// Publish target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DestinationConfig {
    /// Remote path the CSV is written to (overwritten every run)
    #[serde(default = "default_destination_remote_path")]
    pub remote_path: String,

    /// Don't publish a header-only CSV when the source has no records
    #[serde(default)]
    pub skip_when_empty: bool,
}

impl DestinationConfig {
    fn validate(&self) -> Result<(), String> {
        RemotePath::new(self.remote_path.as_str())
            .map_err(|e| format!("destination.remote_path: {e}"))?;
        Ok(())
    }
}

impl Default for DestinationConfig {
    fn default() -> Self {
        Self {
            remote_path: default_destination_remote_path(),
            skip_when_empty: false,
        }
    }
}

/// Record extraction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformConfig {
    /// Slash-separated element path from the root to the record container
    ///
    /// Empty means records are matched anywhere in the document.
    #[serde(default = "default_container_path")]
    pub container_path: String,

    /// Element name of the repeating record
    #[serde(default = "default_record_tag")]
    pub record_tag: String,

    /// Output columns in order (empty = built-in partner mapping)
    #[serde(default)]
    pub columns: Vec<ColumnConfig>,
}

impl TransformConfig {
    fn validate(&self) -> Result<(), String> {
        let tag = self.record_tag.trim();
        if tag.is_empty() {
            return Err("transform.record_tag cannot be empty".to_string());
        }
        if tag.contains('/') || tag.contains(char::is_whitespace) {
            return Err(format!(
                "transform.record_tag must be a single element name, got '{tag}'"
            ));
        }

        let mut seen: Vec<&str> = Vec::new();
        for column in &self.columns {
            column.validate()?;
            if seen.contains(&column.name.as_str()) {
                return Err(format!("duplicate column name '{}'", column.name));
            }
            seen.push(column.name.as_str());
        }
        Ok(())
    }
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            container_path: default_container_path(),
            record_tag: default_record_tag(),
            columns: Vec::new(),
        }
    }
}

/// Text normalization applied to an extracted value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Normalize {
    /// Trim leading and trailing whitespace
    #[default]
    Trim,
    /// Trim and collapse internal whitespace runs to a single space
    Collapse,
    /// Remove `<...>` markup, then collapse
    StripMarkup,
}

/// One output column
///
/// Exactly one of `sources`, `constant` or `timestamp` must be set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnConfig {
    /// Header name
    pub name: String,

    /// Candidate selectors, first non-empty wins
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<SelectorConfig>,

    /// Literal value for every row
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constant: Option<String>,

    /// Run start time rendered with this chrono format
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    /// Value used when nothing was extracted
    #[serde(default)]
    pub default: String,

    /// Normalization applied before defaulting
    #[serde(default)]
    pub normalize: Normalize,

    /// Maximum length in characters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
}

impl ColumnConfig {
    /// Column filled from a single child element or attribute path
    pub fn field(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sources: vec![SelectorConfig::path(path)],
            constant: None,
            timestamp: None,
            default: String::new(),
            normalize: Normalize::default(),
            max_length: None,
        }
    }

    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("column name cannot be empty".to_string());
        }

        let rules = [
            !self.sources.is_empty(),
            self.constant.is_some(),
            self.timestamp.is_some(),
        ];
        if rules.iter().filter(|set| **set).count() != 1 {
            return Err(format!(
                "column '{}' must set exactly one of: sources, constant, timestamp",
                self.name
            ));
        }

        for selector in &self.sources {
            if selector.path.trim().is_empty() {
                return Err(format!("column '{}' has a source with an empty path", self.name));
            }
            if selector.join.is_some() && selector.contains.is_some() {
                return Err(format!(
                    "column '{}': a source cannot set both join and contains",
                    self.name
                ));
            }
        }

        if self.max_length == Some(0) {
            return Err(format!("column '{}': max_length must be > 0", self.name));
        }
        Ok(())
    }
}

/// Where to read a value inside a record element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Path relative to the record (`A/B`, `@attr`, `A//B`, `//B`)
    pub path: String,

    /// Join all matches with this separator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join: Option<String>,

    /// Take the first match containing this text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contains: Option<String>,
}

impl SelectorConfig {
    /// Plain first-match selector
    pub fn path(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            join: None,
            contains: None,
        }
    }
}

/// Quoting policy for CSV fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStyle {
    /// Quote only fields containing the delimiter, a quote or a line break
    #[default]
    Necessary,
    /// Quote every field, header included
    Always,
}

/// Record terminator for CSV output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LineTerminator {
    /// `\n`
    #[default]
    Lf,
    /// `\r\n`
    Crlf,
}

/// CSV output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsvConfig {
    /// Field delimiter (single ASCII character)
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// Quoting policy
    #[serde(default)]
    pub quote_style: QuoteStyle,

    /// Line terminator
    #[serde(default)]
    pub line_terminator: LineTerminator,
}

impl CsvConfig {
    fn validate(&self) -> Result<(), String> {
        if !self.delimiter.is_ascii() || matches!(self.delimiter, '"' | '\r' | '\n') {
            return Err(format!(
                "csv.delimiter must be an ASCII character other than a quote or line break, got {:?}",
                self.delimiter
            ));
        }
        Ok(())
    }
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            quote_style: QuoteStyle::default(),
            line_terminator: LineTerminator::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err(
                "logging.local_path cannot be empty when local logging is enabled".to_string(),
            );
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_port() -> u16 {
    22
}

fn default_source_remote_path() -> String {
    "/import/bi/PartenaireBI.xml".to_string()
}

fn default_destination_remote_path() -> String {
    "/Import/PartenaireBI.csv".to_string()
}

fn default_container_path() -> String {
    "REPONSE".to_string()
}

fn default_record_tag() -> String {
    "PROGRAMME".to_string()
}

fn default_delimiter() -> char {
    ','
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
