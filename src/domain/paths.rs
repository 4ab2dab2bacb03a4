//! Remote path newtype with validation
//!
//! Paths on the remote store are plain strings on the wire; wrapping them keeps
//! source and destination paths from being confused with local file paths.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Path of a file on the remote store
///
/// # Examples
///
/// ```
/// use xmlrelay::domain::paths::RemotePath;
/// use std::str::FromStr;
///
/// let path = RemotePath::from_str("/Import/PartenaireBI.csv").unwrap();
/// assert_eq!(path.file_name(), "PartenaireBI.csv");
/// assert_eq!(path.parent_dirs(), vec!["/Import".to_string()]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RemotePath(String);

impl RemotePath {
    /// Creates a new RemotePath
    ///
    /// # Returns
    ///
    /// Returns `Err` if the path is blank, ends with `/`, or contains a NUL byte
    pub fn new(path: impl Into<String>) -> Result<Self, String> {
        let path = path.into();
        let trimmed = path.trim();
        if trimmed.is_empty() {
            return Err("Remote path cannot be empty".to_string());
        }
        if trimmed.ends_with('/') {
            return Err(format!("Remote path must name a file, got: {trimmed}"));
        }
        if trimmed.contains('\0') {
            return Err("Remote path cannot contain NUL bytes".to_string());
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the path as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last path component
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Every ancestor directory, outermost first
    ///
    /// Absolute paths yield absolute ancestors; relative paths yield relative ones.
    pub fn parent_dirs(&self) -> Vec<String> {
        let absolute = self.0.starts_with('/');
        let parts: Vec<&str> = self.0.split('/').filter(|p| !p.is_empty()).collect();
        let prefix = if absolute { "/" } else { "" };

        (1..parts.len())
            .map(|n| format!("{prefix}{}", parts[..n].join("/")))
            .collect()
    }
}

impl fmt::Display for RemotePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RemotePath {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for RemotePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_path_valid() {
        let path = RemotePath::new("/import/bi/PartenaireBI.xml").unwrap();
        assert_eq!(path.as_str(), "/import/bi/PartenaireBI.xml");
        assert_eq!(path.file_name(), "PartenaireBI.xml");
        assert_eq!(path.to_string(), "/import/bi/PartenaireBI.xml");
    }

    #[test]
    fn test_remote_path_trims_whitespace() {
        let path = RemotePath::new("  /feed.xml ").unwrap();
        assert_eq!(path.as_str(), "/feed.xml");
    }

    #[test]
    fn test_remote_path_invalid() {
        assert!(RemotePath::new("").is_err());
        assert!(RemotePath::new("   ").is_err());
        assert!(RemotePath::new("/import/").is_err());
        assert!(RemotePath::new("bad\0path").is_err());
    }

    #[test]
    fn test_parent_dirs() {
        let absolute = RemotePath::new("/Import/bi/out.csv").unwrap();
        assert_eq!(
            absolute.parent_dirs(),
            vec!["/Import".to_string(), "/Import/bi".to_string()]
        );

        let relative = RemotePath::new("Import/out.csv").unwrap();
        assert_eq!(relative.parent_dirs(), vec!["Import".to_string()]);

        let top_level = RemotePath::new("/out.csv").unwrap();
        assert!(top_level.parent_dirs().is_empty());
    }
}
