//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use crate::config::loader::DEFAULT_CONFIG_FILE;
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        if Path::new(&self.output).exists() && !self.force {
            println!("Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        match fs::write(&self.output, Self::sample_config()) {
            Ok(_) => {
                println!("Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your SFTP host and paths", self.output);
                println!("  2. Put XMLRELAY_REMOTE_PASSWORD in the environment or a .env file");
                println!("  3. Pin the server key with remote.expected_host_key_sha256");
                println!("  4. Validate configuration: xmlrelay validate-config");
                println!("  5. Try the mapping locally: xmlrelay convert --input sample.xml");
                println!("  6. Run: xmlrelay run --dry-run");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5)
            }
        }
    }

    /// Sample configuration with every section and its defaults
    pub fn sample_config() -> String {
        r#"# xmlrelay configuration
#
# Every key can be overridden with XMLRELAY_<SECTION>_<KEY>, for example
# XMLRELAY_REMOTE_HOST or XMLRELAY_SOURCE_REMOTE_PATH. ${VAR} references are
# replaced from the environment when the file is loaded.

# development | staging | production (production requires a pinned host key)
environment = "development"

[application]
# trace, debug, info, warn, error
log_level = "info"
# Transform but never publish
dry_run = false
# Copy the fetched XML and generated CSV here after each run
# keep_artifacts_dir = "./artifacts"
# Parent of the per-run staging directory (system temp dir by default)
# staging_dir = "/var/tmp/xmlrelay"

[remote]
host = "sftp.example.com"
port = 22
username = "relay"
password = "${XMLRELAY_REMOTE_PASSWORD}"
# Hex SHA-256 of the server host key (colons allowed)
# expected_host_key_sha256 = "..."

[source]
remote_path = "/import/bi/PartenaireBI.xml"
# Tried in order when remote_path is missing
fallback_paths = []
# Search this many directory levels for a file with the same name (0 = off)
discover_depth = 0

[destination]
remote_path = "/Import/PartenaireBI.csv"
# Don't upload a header-only CSV
skip_when_empty = false

[transform]
# Element names from the document root to the record container ("" = anywhere)
container_path = "REPONSE"
record_tag = "PROGRAMME"
# No [[transform.columns]] = built-in partner mapping. Custom example:
#
# [[transform.columns]]
# name = "Program_Ref"
# sources = [{ path = "//REF_OPERATION" }, { path = "//NUMERO" }]
# max_length = 50
#
# [[transform.columns]]
# name = "Program_Arguments"
# sources = [{ path = "//POINTS_FORTS//PF", join = " | " }, { path = "//DESCRIPTIF_COURT" }]
# normalize = "strip_markup"
# default = "N/A"
#
# [[transform.columns]]
# name = "Scraping_Date"
# timestamp = "%Y-%m-%d %H:%M:%S"

[csv]
delimiter = ","
# necessary | always
quote_style = "necessary"
# lf | crlf
line_terminator = "lf"

[logging]
local_enabled = false
local_path = "./logs"
# daily | hourly | never
local_rotation = "daily"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RelayConfig;

    #[test]
    fn test_sample_config_parses_with_defaults() {
        let config: RelayConfig = toml::from_str(&InitArgs::sample_config()).unwrap();
        assert!(config.validate_local().is_ok());
        assert_eq!(config.source.remote_path, "/import/bi/PartenaireBI.xml");
        assert!(config.transform.columns.is_empty());
        assert!(config.remote.password.is_some());
    }

    #[tokio::test]
    async fn test_refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("xmlrelay.toml");
        fs::write(&path, "# existing").unwrap();

        let mut args = InitArgs {
            output: path.to_string_lossy().to_string(),
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), 2);
        assert_eq!(fs::read_to_string(&path).unwrap(), "# existing");

        args.force = true;
        assert_eq!(args.execute().await.unwrap(), 0);
        assert!(fs::read_to_string(&path).unwrap().contains("[transform]"));
    }
}
