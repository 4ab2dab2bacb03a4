//! Core business logic for xmlrelay.
//!
//! # Modules
//!
//! - [`transform`] - XML record extraction and CSV rendering (no I/O)
//! - [`relay`] - Locate, fetch, stage, transform and publish orchestration
//!
//! # Relay Workflow
//!
//! 1. **Locate**: Resolve the partner XML on the remote store
//! 2. **Fetch**: Download it into the staging area
//! 3. **Extract**: Parse the document into an output table
//! 4. **Serialize**: Render the table as CSV
//! 5. **Publish**: Overwrite the destination CSV
//! 6. **Report**: Log the run summary
//!
//! # Example
//!
//! ```rust,no_run
//! use xmlrelay::adapters::transfer::SftpTransferClient;
//! use xmlrelay::config::load_config;
//! use xmlrelay::core::relay::RelayCoordinator;
//! use xmlrelay::domain::RunContext;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("xmlrelay.toml")?;
//! config.validate()?;
//!
//! let client = SftpTransferClient::connect(&config.remote)?;
//! let mut coordinator = RelayCoordinator::new(&config, client)?;
//!
//! let summary = coordinator.run(&RunContext::start())?;
//! println!("Published {} records", summary.record_count);
//! # Ok(())
//! # }
//! ```

pub mod relay;
pub mod transform;
