//! Configuration management for xmlrelay.
//!
//! Configuration is assembled once at startup from, in order of precedence:
//!
//! 1. `XMLRELAY_<SECTION>_<KEY>` environment variables (a `.env` file is loaded first)
//! 2. An optional TOML file, with `${VAR_NAME}` substitution
//! 3. Built-in defaults
//!
//! A scheduler that only injects credentials can run the relay with no file at all:
//!
//! ```bash
//! export XMLRELAY_REMOTE_HOST="sftp.example.com"
//! export XMLRELAY_REMOTE_USERNAME="relay"
//! export XMLRELAY_REMOTE_PASSWORD="secret-password"
//! export XMLRELAY_SOURCE_REMOTE_PATH="/import/bi/PartenaireBI.xml"
//! export XMLRELAY_DESTINATION_REMOTE_PATH="/Import/PartenaireBI.csv"
//! xmlrelay run
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level, dry run, artifact retention
//! - [`RemoteConfig`] - SFTP host, port, credentials, host key pin
//! - [`SourceConfig`] - Partner XML location and fallbacks
//! - [`DestinationConfig`] - CSV publish location
//! - [`TransformConfig`] - Record tag, container path and column mapping
//! - [`CsvConfig`] - Delimiter, quoting, line terminator
//! - [`LoggingConfig`] - Local JSON log files
//!
//! # Example Configuration
//!
//! ```toml
//! [remote]
//! host = "sftp.example.com"
//! username = "relay"
//! password = "${XMLRELAY_REMOTE_PASSWORD}"
//!
//! [source]
//! remote_path = "/inbound/orders.xml"
//!
//! [destination]
//! remote_path = "/Import/orders.csv"
//!
//! [transform]
//! container_path = "orders"
//! record_tag = "order"
//!
//! [[transform.columns]]
//! name = "id"
//! sources = [{ path = "@id" }]
//!
//! [[transform.columns]]
//! name = "amount"
//! sources = [{ path = "total/amount" }]
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, load_config_or_env};
pub use schema::{
    ApplicationConfig, ColumnConfig, CsvConfig, DestinationConfig, Environment, LineTerminator,
    LoggingConfig, Normalize, QuoteStyle, RelayConfig, RemoteConfig, SelectorConfig,
    SourceConfig, TransformConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
