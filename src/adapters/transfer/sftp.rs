//! SFTP transfer client
//!
//! Password-authenticated SFTP over `ssh2`. The server host key can be pinned
//! by its SHA-256 fingerprint. The session is disconnected when the client is
//! dropped.

use super::traits::{RemoteEntry, TransferClient, TransferResult};
use crate::config::schema::{normalize_fingerprint, RemoteConfig};
use crate::domain::errors::TransferError;
use crate::domain::paths::RemotePath;
use secrecy::ExposeSecret;
use ssh2::{ErrorCode, HashType, Session, Sftp};
use std::io::{Read, Write};
use std::net::TcpStream;
use std::path::Path;

/// `LIBSSH2_FX_NO_SUCH_FILE`
const SFTP_NO_SUCH_FILE: i32 = 2;

/// Permissions for directories created by `publish`
const DIR_MODE: i32 = 0o755;

/// SFTP implementation of [`TransferClient`]
pub struct SftpTransferClient {
    session: Session,
    sftp: Option<Sftp>,
    host: String,
}

impl SftpTransferClient {
    /// Opens an authenticated SFTP session
    ///
    /// # Errors
    ///
    /// Returns [`TransferError::ConnectionFailed`] if the TCP connection or
    /// SSH handshake fails, [`TransferError::HostKeyMismatch`] if a pinned
    /// fingerprint doesn't match, and [`TransferError::AuthenticationFailed`]
    /// if the credentials are rejected.
    pub fn connect(config: &RemoteConfig) -> TransferResult<Self> {
        let host = config.host.clone();
        let connection_failed = |message: String| TransferError::ConnectionFailed {
            host: host.clone(),
            message,
        };

        tracing::info!(host = %config.host, port = config.port, "Connecting to SFTP server");

        let tcp = TcpStream::connect((config.host.as_str(), config.port))
            .map_err(|e| connection_failed(e.to_string()))?;

        let mut session = Session::new().map_err(|e| connection_failed(e.to_string()))?;
        session.set_tcp_stream(tcp);
        session
            .handshake()
            .map_err(|e| connection_failed(format!("SSH handshake failed: {e}")))?;

        let actual = session
            .host_key_hash(HashType::Sha256)
            .map(hex)
            .ok_or_else(|| connection_failed("server did not present a host key".to_string()))?;

        match &config.expected_host_key_sha256 {
            Some(expected) => {
                let expected = normalize_fingerprint(expected);
                if expected != actual {
                    return Err(TransferError::HostKeyMismatch { expected, actual });
                }
            }
            None => {
                tracing::warn!(fingerprint = %actual, "Host key not pinned, accepting server key");
            }
        }

        let password = config
            .password
            .as_ref()
            .map(|p| p.expose_secret().as_ref().to_string())
            .unwrap_or_default();
        session
            .userauth_password(&config.username, &password)
            .map_err(|e| TransferError::AuthenticationFailed {
                username: config.username.clone(),
                message: e.message().to_string(),
            })?;
        if !session.authenticated() {
            return Err(TransferError::AuthenticationFailed {
                username: config.username.clone(),
                message: "server did not accept the credentials".to_string(),
            });
        }

        let sftp = session
            .sftp()
            .map_err(|e| connection_failed(format!("SFTP subsystem unavailable: {e}")))?;

        tracing::info!(
            host = %config.host,
            username = %config.username,
            "SFTP session established"
        );

        Ok(Self {
            session,
            sftp: Some(sftp),
            host: config.host.clone(),
        })
    }

    fn sftp(&self) -> TransferResult<&Sftp> {
        self.sftp.as_ref().ok_or_else(|| TransferError::ConnectionFailed {
            host: self.host.clone(),
            message: "session already closed".to_string(),
        })
    }

    fn ensure_dir(&self, dir: &str) -> TransferResult<()> {
        let sftp = self.sftp()?;
        match sftp.stat(Path::new(dir)) {
            Ok(stat) if stat.is_dir() => Ok(()),
            Ok(_) => Err(TransferError::Io {
                path: dir.to_string(),
                message: "exists and is not a directory".to_string(),
            }),
            Err(e) if is_not_found(&e) => {
                tracing::debug!(dir, "Creating remote directory");
                sftp.mkdir(Path::new(dir), DIR_MODE)
                    .map_err(|e| io_error(dir, &e))
            }
            Err(e) => Err(io_error(dir, &e)),
        }
    }
}

impl TransferClient for SftpTransferClient {
    fn fetch(&mut self, path: &RemotePath) -> TransferResult<Vec<u8>> {
        let mut file = self.sftp()?.open(Path::new(path.as_str())).map_err(|e| {
            if is_not_found(&e) {
                TransferError::NotFound(path.to_string())
            } else {
                io_error(path.as_str(), &e)
            }
        })?;

        let mut contents = Vec::new();
        file.read_to_end(&mut contents).map_err(|e| TransferError::Io {
            path: path.to_string(),
            message: e.to_string(),
        })?;

        tracing::debug!(path = %path, bytes = contents.len(), "Fetched remote file");
        Ok(contents)
    }

    fn publish(&mut self, path: &RemotePath, contents: &[u8]) -> TransferResult<()> {
        for dir in path.parent_dirs() {
            self.ensure_dir(&dir)?;
        }

        let write_failed = |e: std::io::Error| TransferError::Io {
            path: path.to_string(),
            message: e.to_string(),
        };

        let mut file = self
            .sftp()?
            .create(Path::new(path.as_str()))
            .map_err(|e| io_error(path.as_str(), &e))?;
        file.write_all(contents).map_err(write_failed)?;
        file.flush().map_err(write_failed)?;

        tracing::debug!(path = %path, bytes = contents.len(), "Published remote file");
        Ok(())
    }

    fn stat(&mut self, path: &str) -> TransferResult<Option<u64>> {
        match self.sftp()?.stat(Path::new(path)) {
            Ok(stat) => Ok(Some(stat.size.unwrap_or(0))),
            Err(e) if is_not_found(&e) => Ok(None),
            Err(e) => Err(io_error(path, &e)),
        }
    }

    fn list_dir(&mut self, path: &str) -> TransferResult<Vec<RemoteEntry>> {
        let entries = self
            .sftp()?
            .readdir(Path::new(path))
            .map_err(|e| io_error(path, &e))?;

        Ok(entries
            .into_iter()
            .filter_map(|(entry, stat)| {
                let name = entry.file_name()?.to_string_lossy().into_owned();
                Some(RemoteEntry {
                    name,
                    is_dir: stat.is_dir(),
                    size: stat.size,
                })
            })
            .filter(|entry| entry.name != "." && entry.name != "..")
            .collect())
    }
}

impl Drop for SftpTransferClient {
    fn drop(&mut self) {
        self.sftp.take();
        if let Err(e) = self.session.disconnect(None, "xmlrelay run finished", None) {
            tracing::debug!(error = %e, "SFTP disconnect failed");
        }
    }
}

fn is_not_found(error: &ssh2::Error) -> bool {
    matches!(error.code(), ErrorCode::SFTP(SFTP_NO_SUCH_FILE))
}

fn io_error(path: &str, error: &ssh2::Error) -> TransferError {
    TransferError::Io {
        path: path.to_string(),
        message: error.to_string(),
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_fingerprint() {
        assert_eq!(hex(&[0x00, 0xab, 0x10, 0xff]), "00ab10ff");
    }

    #[test]
    fn test_connect_refused_is_connection_error() {
        let config = RemoteConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
            username: "relay".to_string(),
            ..RemoteConfig::default()
        };
        let result = SftpTransferClient::connect(&config);
        assert!(matches!(result, Err(TransferError::ConnectionFailed { .. })));
    }
}
