//! Integration tests for logging functionality

use tempfile::TempDir;
use xmlrelay::config::LoggingConfig;
use xmlrelay::logging::init_logging;
use xmlrelay::logging::structured::LOG_FILE_NAME;

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert!(!config.local_enabled);
    assert_eq!(config.local_rotation, "daily");
    assert!(!config.local_path.is_empty());
}

#[test]
fn test_logging_config_from_toml() {
    let config: LoggingConfig = toml::from_str(
        r#"
local_enabled = true
local_path = "/var/log/xmlrelay"
"#,
    )
    .unwrap();
    assert!(config.local_enabled);
    assert_eq!(config.local_path, "/var/log/xmlrelay");
    assert_eq!(config.local_rotation, "daily");
}

#[test]
fn test_invalid_level_is_rejected_before_init() {
    let result = init_logging("verbose", &LoggingConfig::default());
    assert!(result.is_err());
}

// The only test in this binary that installs the global subscriber
#[test]
fn test_json_file_logging() {
    std::env::remove_var("RUST_LOG");

    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("logs");
    assert!(!log_path.exists());

    let config = LoggingConfig {
        local_enabled: true,
        local_path: log_path.to_string_lossy().to_string(),
        local_rotation: "never".to_string(),
    };

    let guard = init_logging("info", &config).unwrap();
    assert!(log_path.is_dir());

    tracing::info!(target: "xmlrelay::test", records = 2, "Relay finished");
    tracing::debug!(target: "xmlrelay::test", "Below the configured level");
    drop(guard);

    let contents = std::fs::read_to_string(log_path.join(LOG_FILE_NAME)).unwrap();
    let line = contents
        .lines()
        .find(|line| line.contains("Relay finished"))
        .unwrap();
    let entry: serde_json::Value = serde_json::from_str(line).unwrap();
    assert_eq!(entry["level"], "INFO");
    assert_eq!(entry["target"], "xmlrelay::test");
    assert_eq!(entry["fields"]["records"], 2);
    assert!(!contents.contains("Below the configured level"));

    // A second subscriber cannot be installed
    let second = init_logging("info", &LoggingConfig::default());
    assert!(second.is_err());
}
