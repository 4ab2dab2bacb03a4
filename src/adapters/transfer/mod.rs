//! Remote file transfer
//!
//! - [`traits`]: the [`TransferClient`] seam used by the relay core
//! - [`sftp`]: the production SFTP implementation

pub mod sftp;
pub mod traits;

pub use sftp::SftpTransferClient;
pub use traits::{RemoteEntry, TransferClient, TransferResult};

use crate::config::schema::RemoteConfig;

/// Opens the configured transfer client
///
/// # Errors
///
/// Returns a [`crate::domain::TransferError`] if the connection cannot be
/// established.
pub fn connect(config: &RemoteConfig) -> TransferResult<Box<dyn TransferClient>> {
    let client = SftpTransferClient::connect(config)?;
    Ok(Box::new(client))
}
