//! Convert command implementation
//!
//! This module implements the `convert` command: the XML to CSV transform on
//! local files, with no remote access. Useful for checking a mapping against a
//! partner sample before scheduling it.

use crate::config::load_config_or_env;
use crate::core::transform::Transformer;
use crate::domain::{RelayError, Result, RunContext};
use clap::Args;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// Arguments for the convert command
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// XML document to convert
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Where to write the CSV (stdout when omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl ConvertArgs {
    /// Execute the convert command
    pub async fn execute(&self, config_path: Option<&str>) -> anyhow::Result<i32> {
        tracing::info!(input = %self.input.display(), "Converting local file");

        match self.convert(config_path) {
            Ok(records) => {
                tracing::info!(records, "Conversion complete");
                if let Some(output) = &self.output {
                    eprintln!("Wrote {records} records to {}", output.display());
                }
                Ok(0)
            }
            Err(e) => {
                crate::log_error_with_context!(&e, "Conversion failed");
                eprintln!("Conversion failed: {e}");
                Ok(e.exit_code())
            }
        }
    }

    fn convert(&self, config_path: Option<&str>) -> Result<usize> {
        let config = load_config_or_env(config_path)?;
        let transformer = Transformer::new(&config.transform, &config.csv)?;

        let xml = fs::read(&self.input).map_err(|e| {
            RelayError::Io(format!("Failed to read {}: {e}", self.input.display()))
        })?;
        let transformed = transformer.transform(&xml, &RunContext::start())?;

        match &self.output {
            Some(path) => fs::write(path, &transformed.csv).map_err(|e| {
                RelayError::Io(format!("Failed to write {}: {e}", path.display()))
            })?,
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(&transformed.csv)?;
                stdout.flush()?;
            }
        }

        Ok(transformed.record_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(dir: &std::path::Path) -> PathBuf {
        let path = dir.join("relay.toml");
        fs::write(
            &path,
            r#"
[transform]
container_path = "orders"
record_tag = "order"

[[transform.columns]]
name = "id"
sources = [{ path = "@id" }]

[[transform.columns]]
name = "amount"
sources = [{ path = "amount" }]
"#,
        )
        .unwrap();
        path
    }

    #[tokio::test]
    async fn test_convert_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_config(dir.path());
        let input = dir.path().join("orders.xml");
        let output = dir.path().join("orders.csv");
        fs::write(
            &input,
            r#"<orders><order id="1"><amount>10,50</amount></order><order id="2"/></orders>"#,
        )
        .unwrap();

        let args = ConvertArgs {
            input,
            output: Some(output.clone()),
        };
        let code = args.execute(config.to_str()).await.unwrap();

        assert_eq!(code, 0);
        assert_eq!(fs::read_to_string(output).unwrap(), "id,amount\n1,\"10,50\"\n2,\n");
    }

    #[tokio::test]
    async fn test_malformed_input_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_config(dir.path());
        let input = dir.path().join("broken.xml");
        let output = dir.path().join("broken.csv");
        fs::write(&input, "<orders><order id=\"1\">").unwrap();

        let args = ConvertArgs {
            input,
            output: Some(output.clone()),
        };
        let code = args.execute(config.to_str()).await.unwrap();

        assert_eq!(code, 3);
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_missing_input_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_config(dir.path());
        let args = ConvertArgs {
            input: dir.path().join("missing.xml"),
            output: None,
        };
        assert_eq!(args.execute(config.to_str()).await.unwrap(), 5);
    }
}
