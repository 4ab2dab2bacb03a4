//! Transfer client trait
//!
//! The relay core only ever talks to the remote store through
//! [`TransferClient`], so the pipeline can be exercised against an in-memory
//! implementation.

use crate::domain::errors::TransferError;
use crate::domain::paths::RemotePath;

/// Result type for transfer operations
pub type TransferResult<T> = std::result::Result<T, TransferError>;

/// One entry of a remote directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEntry {
    /// Entry name, without the directory part
    pub name: String,

    /// Whether the entry is a directory
    pub is_dir: bool,

    /// Size in bytes, if the server reported one
    pub size: Option<u64>,
}

/// Authenticated access to the remote file store
///
/// All operations are blocking and single-attempt. Retrying is the caller's
/// decision.
pub trait TransferClient: Send {
    /// Downloads a whole remote file
    ///
    /// # Errors
    ///
    /// Returns [`TransferError::NotFound`] if the file does not exist, or
    /// another [`TransferError`] if the connection or read fails.
    fn fetch(&mut self, path: &RemotePath) -> TransferResult<Vec<u8>>;

    /// Writes a remote file, replacing any existing file at that path
    ///
    /// Missing parent directories are created first.
    ///
    /// # Errors
    ///
    /// Returns a [`TransferError`] if a directory cannot be created or the
    /// write fails.
    fn publish(&mut self, path: &RemotePath, contents: &[u8]) -> TransferResult<()>;

    /// Size of a remote file, or `None` if nothing exists at `path`
    ///
    /// # Errors
    ///
    /// Returns a [`TransferError`] for failures other than a missing file.
    fn stat(&mut self, path: &str) -> TransferResult<Option<u64>>;

    /// Lists a remote directory
    ///
    /// # Errors
    ///
    /// Returns a [`TransferError`] if the directory cannot be read.
    fn list_dir(&mut self, path: &str) -> TransferResult<Vec<RemoteEntry>>;
}

impl<T: TransferClient + ?Sized> TransferClient for Box<T> {
    fn fetch(&mut self, path: &RemotePath) -> TransferResult<Vec<u8>> {
        (**self).fetch(path)
    }

    fn publish(&mut self, path: &RemotePath, contents: &[u8]) -> TransferResult<()> {
        (**self).publish(path, contents)
    }

    fn stat(&mut self, path: &str) -> TransferResult<Option<u64>> {
        (**self).stat(path)
    }

    fn list_dir(&mut self, path: &str) -> TransferResult<Vec<RemoteEntry>> {
        (**self).list_dir(path)
    }
}
