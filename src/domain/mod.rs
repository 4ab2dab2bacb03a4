//! Domain models and types for xmlrelay.
//!
//! This module contains the core domain types shared by the transform, the
//! transfer adapters and the relay coordinator.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Records** ([`Record`], [`OutputTable`]) produced by the extractor
//! - **Run context** ([`RunContext`]) carrying the run id and start time
//! - **Remote paths** ([`RemotePath`]) validated at configuration time
//! - **Error types** ([`RelayError`], [`TransferError`], [`MalformedInputError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, RelayError>`]:
//!
//! ```rust
//! use xmlrelay::domain::{RelayError, Result, TransferError};
//!
//! fn fetch_feed() -> Result<Vec<u8>> {
//!     Err(TransferError::NotFound("/import/feed.xml".to_string()))?
//! }
//!
//! assert!(matches!(fetch_feed(), Err(RelayError::Transfer(_))));
//! ```

pub mod context;
pub mod errors;
pub mod paths;
pub mod record;
pub mod result;

// Re-export commonly used types for convenience
pub use context::RunContext;
pub use errors::{MalformedInputError, RelayError, TransferError};
pub use paths::RemotePath;
pub use record::{OutputTable, Record};
pub use result::Result;
