//! External system integrations for xmlrelay.
//!
//! - [`transfer`] - Remote file store access (SFTP)
//!
//! The relay core depends only on the [`transfer::TransferClient`] trait, so
//! tests drive the whole pipeline against an in-memory store.
//!
//! ```rust,no_run
//! use xmlrelay::adapters::transfer::{SftpTransferClient, TransferClient};
//! use xmlrelay::config::{secret_string, RemoteConfig};
//! use xmlrelay::domain::RemotePath;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RemoteConfig {
//!     host: "sftp.example.com".to_string(),
//!     username: "relay".to_string(),
//!     password: Some(secret_string("secret".to_string())),
//!     ..RemoteConfig::default()
//! };
//!
//! let mut client = SftpTransferClient::connect(&config)?;
//! let xml = client.fetch(&RemotePath::new("/import/bi/PartenaireBI.xml")?)?;
//! # Ok(())
//! # }
//! ```

pub mod transfer;
