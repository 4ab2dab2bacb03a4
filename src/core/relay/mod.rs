//! Relay orchestration
//!
//! - [`coordinator`]: runs one relay invocation end to end
//! - [`locate`]: resolves the remote source path
//! - [`staging`]: scoped local working storage
//! - [`summary`]: run outcome reporting

pub mod coordinator;
pub mod locate;
pub mod staging;
pub mod summary;

pub use coordinator::{RelayCoordinator, RelayOptions};
pub use locate::locate_source;
pub use staging::StagingArea;
pub use summary::{PublishOutcome, RelaySummary};
