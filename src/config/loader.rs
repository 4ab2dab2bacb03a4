//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::RelayConfig;
use super::secret::secret_string;
use crate::domain::errors::RelayError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "xmlrelay.toml";

/// Prefix of every environment override
pub const ENV_PREFIX: &str = "XMLRELAY_";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into RelayConfig
/// 4. Applies environment variable overrides (XMLRELAY_* prefix)
/// 5. Validates the settings needed by every command
///
/// Remote connection settings are checked later by [`RelayConfig::validate`],
/// so a local `convert` works without credentials.
///
/// # Errors
///
/// Returns an error if the file is missing or unreadable, a referenced
/// environment variable is unset, the TOML is invalid, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use xmlrelay::config::loader::load_config;
///
/// let config = load_config("xmlrelay.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<RelayConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(RelayError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        RelayError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let config: RelayConfig = toml::from_str(&contents)
        .map_err(|e| RelayError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    finish(config)
}

/// Loads configuration for a scheduled run
///
/// An explicit path must exist. Without one, [`DEFAULT_CONFIG_FILE`] is used
/// when present; otherwise the built-in defaults are overlaid with
/// `XMLRELAY_*` environment variables, which is how a scheduler that only
/// injects credentials runs the relay.
///
/// # Errors
///
/// Same as [`load_config`].
pub fn load_config_or_env(path: Option<&str>) -> Result<RelayConfig> {
    match path {
        Some(path) => load_config(path),
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => load_config(DEFAULT_CONFIG_FILE),
        None => {
            tracing::debug!("No configuration file, using defaults and environment");
            finish(RelayConfig::default())
        }
    }
}

fn finish(mut config: RelayConfig) -> Result<RelayConfig> {
    apply_env_overrides(&mut config)?;

    config.validate_local().map_err(|e| {
        RelayError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied unchanged.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| RelayError::Other(format!("invalid substitution pattern: {e}")))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let processed = re.replace_all(line, |cap: &regex::Captures<'_>| {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    String::new()
                }
            }
        });
        result.push_str(&processed);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(RelayError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}{key}")).ok()
}

fn env_bool(key: &str) -> Result<Option<bool>> {
    env_var(key)
        .map(|val| {
            val.trim().parse::<bool>().map_err(|_| {
                RelayError::Configuration(format!(
                    "{ENV_PREFIX}{key} must be 'true' or 'false', got '{val}'"
                ))
            })
        })
        .transpose()
}

/// Applies environment variable overrides using the XMLRELAY_* prefix
///
/// Environment variables follow the pattern: XMLRELAY_<SECTION>_<KEY>
/// For example: XMLRELAY_REMOTE_HOST, XMLRELAY_SOURCE_REMOTE_PATH
fn apply_env_overrides(config: &mut RelayConfig) -> Result<()> {
    // Application overrides
    if let Some(val) = env_var("APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Some(val) = env_bool("APPLICATION_DRY_RUN")? {
        config.application.dry_run = val;
    }

    // Remote overrides
    if let Some(val) = env_var("REMOTE_HOST") {
        config.remote.host = val;
    }
    if let Some(val) = env_var("REMOTE_PORT") {
        config.remote.port = val.trim().parse().map_err(|_| {
            RelayError::Configuration(format!(
                "{ENV_PREFIX}REMOTE_PORT must be a port number, got '{val}'"
            ))
        })?;
    }
    if let Some(val) = env_var("REMOTE_USERNAME") {
        config.remote.username = val;
    }
    if let Some(val) = env_var("REMOTE_PASSWORD") {
        config.remote.password = Some(secret_string(val));
    }
    if let Some(val) = env_var("REMOTE_EXPECTED_HOST_KEY_SHA256") {
        config.remote.expected_host_key_sha256 = Some(val);
    }

    // Source and destination overrides
    if let Some(val) = env_var("SOURCE_REMOTE_PATH") {
        config.source.remote_path = val;
    }
    if let Some(val) = env_var("DESTINATION_REMOTE_PATH") {
        config.destination.remote_path = val;
    }
    if let Some(val) = env_bool("DESTINATION_SKIP_WHEN_EMPTY")? {
        config.destination.skip_when_empty = val;
    }

    // Logging overrides
    if let Some(val) = env_bool("LOGGING_LOCAL_ENABLED")? {
        config.logging.local_enabled = val;
    }
    if let Some(val) = env_var("LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}
