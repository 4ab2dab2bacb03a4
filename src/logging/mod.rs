//! Logging and observability
//!
//! Structured logging through `tracing`:
//! - Human-readable console output on stderr
//! - Optional JSON log files with rotation
//! - `RUST_LOG` or `--log-level` filtering
//!
//! # Example
//!
//! ```no_run
//! use xmlrelay::logging::init_logging;
//! use xmlrelay::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Relay started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of a relay stage
///
/// # Example
///
/// ```no_run
/// use xmlrelay::log_stage_start;
///
/// log_stage_start!("fetch", "/import/bi/PartenaireBI.xml");
/// ```
#[macro_export]
macro_rules! log_stage_start {
    ($stage:expr, $path:expr) => {
        tracing::info!(stage = $stage, path = %$path, "Stage started");
    };
}

/// Log the completion of a relay stage
///
/// # Example
///
/// ```no_run
/// use xmlrelay::log_stage_complete;
/// use std::time::Duration;
///
/// log_stage_complete!("fetch", 2048, Duration::from_millis(350));
/// ```
#[macro_export]
macro_rules! log_stage_complete {
    ($stage:expr, $bytes:expr, $duration:expr) => {
        tracing::info!(
            stage = $stage,
            bytes = $bytes,
            duration_ms = $duration.as_millis() as u64,
            "Stage completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use xmlrelay::log_error_with_context;
/// use xmlrelay::domain::RelayError;
///
/// let error = RelayError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

#[cfg(test)]
mod tests {
    use crate::domain::RelayError;
    use std::time::Duration;

    #[test]
    fn test_macros_expand_without_subscriber() {
        log_stage_start!("fetch", "/in/feed.xml");
        log_stage_complete!("fetch", 10usize, Duration::from_millis(5));
        log_error_with_context!(&RelayError::Other("boom".to_string()), "test");
    }
}
