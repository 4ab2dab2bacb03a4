// xmlrelay - Partner XML feed to CSV relay over SFTP
// Copyright (c) 2025 xmlrelay Contributors
// Licensed under the MIT License

//! # xmlrelay - Partner XML feed to CSV relay
//!
//! xmlrelay runs once per scheduled period. It fetches a partner XML feed from
//! an SFTP store, flattens its repeating records into a fixed-column CSV, and
//! publishes the CSV where a file-drop import picks it up.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Transform (extract + serialize) and relay orchestration
//! - [`adapters`] - Remote file transfer (SFTP)
//! - [`domain`] - Records, remote paths, run context and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Transform without a network
//!
//! ```rust
//! use xmlrelay::config::{ColumnConfig, CsvConfig, TransformConfig};
//! use xmlrelay::core::transform::Transformer;
//! use xmlrelay::domain::RunContext;
//!
//! # fn main() -> Result<(), xmlrelay::domain::RelayError> {
//! let transform = TransformConfig {
//!     container_path: "partners".to_string(),
//!     record_tag: "partner".to_string(),
//!     columns: vec![ColumnConfig::field("name", "name")],
//! };
//! let transformer = Transformer::new(&transform, &CsvConfig::default())?;
//!
//! let xml = b"<partners><partner><name>Acme, Inc</name></partner></partners>";
//! let output = transformer.transform(xml, &RunContext::start())?;
//! assert_eq!(output.csv, b"name\n\"Acme, Inc\"\n");
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All library errors are [`domain::RelayError`]. Each variant maps to a
//! process exit code through [`domain::RelayError::exit_code`].

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
