//! Domain error types
//!
//! This module defines the error hierarchy for xmlrelay.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main xmlrelay error type
///
/// This is the primary error type used throughout the application.
/// Every variant is fatal to a relay run.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Remote transfer errors (connectivity, authentication, missing file)
    #[error("Transfer error: {0}")]
    Transfer(#[from] TransferError),

    /// The source document is not well-formed XML
    #[error("Malformed input: {0}")]
    MalformedInput(#[from] MalformedInputError),

    /// CSV serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Local I/O errors (staging area, local files)
    #[error("I/O error: {0}")]
    Io(String),

    /// The run was stopped by a shutdown signal before publishing
    #[error("Interrupted before {0}")]
    Interrupted(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl RelayError {
    /// Process exit code for this error
    ///
    /// 2 = configuration, 3 = malformed input, 4 = transfer, 130 = interrupted,
    /// 5 = anything else.
    pub fn exit_code(&self) -> i32 {
        match self {
            RelayError::Configuration(_) => 2,
            RelayError::MalformedInput(_) => 3,
            RelayError::Transfer(_) => 4,
            RelayError::Interrupted(_) => 130,
            RelayError::Serialization(_) | RelayError::Io(_) | RelayError::Other(_) => 5,
        }
    }
}

/// Remote transfer errors
///
/// Errors that occur while talking to the remote file store.
/// These errors don't expose the SSH library's types.
#[derive(Debug, Error)]
pub enum TransferError {
    /// TCP connection or SSH handshake failed
    #[error("Failed to connect to {host}: {message}")]
    ConnectionFailed { host: String, message: String },

    /// Authentication was rejected
    #[error("Authentication failed for user '{username}': {message}")]
    AuthenticationFailed { username: String, message: String },

    /// The server presented a host key that doesn't match the pinned one
    #[error("Host key mismatch: expected {expected}, got {actual}")]
    HostKeyMismatch { expected: String, actual: String },

    /// Remote file does not exist
    #[error("Remote file not found: {0}")]
    NotFound(String),

    /// Read/write failure on an open remote file or directory
    #[error("Remote I/O failed on {path}: {message}")]
    Io { path: String, message: String },
}

/// The input buffer is not a well-formed XML document
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}{}", .position.map(|p| format!(" (at byte {p})")).unwrap_or_default())]
pub struct MalformedInputError {
    /// What was wrong with the document
    pub message: String,

    /// Byte offset in the input where the problem was detected, if known
    pub position: Option<u64>,
}

impl MalformedInputError {
    /// Creates a new error without position information
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            position: None,
        }
    }

    /// Attaches the byte offset where parsing stopped
    pub fn at(mut self, position: u64) -> Self {
        self.position = Some(position);
        self
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for RelayError {
    fn from(err: std::io::Error) -> Self {
        RelayError::Io(err.to_string())
    }
}

// Conversion from csv writer errors
impl From<csv::Error> for RelayError {
    fn from(err: csv::Error) -> Self {
        RelayError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for RelayError {
    fn from(err: toml::de::Error) -> Self {
        RelayError::Configuration(format!("TOML parse error: {err}"))
    }
}
