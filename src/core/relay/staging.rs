//! Local staging area for one run
//!
//! The fetched XML and the rendered CSV are written to a private temporary
//! directory that is removed when the [`StagingArea`] is dropped, whatever way
//! the run ends.

use crate::domain::errors::RelayError;
use crate::domain::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Scoped temporary directory holding a run's intermediate files
#[derive(Debug)]
pub struct StagingArea {
    dir: TempDir,
    files: Vec<PathBuf>,
}

impl StagingArea {
    /// Creates a fresh staging directory under the system temp dir
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Io`] if the directory cannot be created.
    pub fn new() -> Result<Self> {
        Self::create(tempfile::Builder::new().prefix("xmlrelay-").tempdir())
    }

    /// Creates a fresh staging directory under `parent`
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Io`] if `parent` or the directory cannot be created.
    pub fn new_in(parent: &Path) -> Result<Self> {
        fs::create_dir_all(parent).map_err(|e| {
            RelayError::Io(format!("Failed to create {}: {e}", parent.display()))
        })?;
        Self::create(tempfile::Builder::new().prefix("xmlrelay-").tempdir_in(parent))
    }

    fn create(dir: std::io::Result<TempDir>) -> Result<Self> {
        let dir =
            dir.map_err(|e| RelayError::Io(format!("Failed to create staging directory: {e}")))?;

        tracing::debug!(path = %dir.path().display(), "Created staging directory");
        Ok(Self {
            dir,
            files: Vec::new(),
        })
    }

    /// Staging directory path
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Files written so far, in order
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Writes `contents` to `name` inside the staging directory
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Io`] if `name` is not a plain file name or the
    /// write fails.
    pub fn write(&mut self, name: &str, contents: &[u8]) -> Result<PathBuf> {
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(RelayError::Io(format!("Invalid staging file name: '{name}'")));
        }

        let path = self.dir.path().join(name);
        fs::write(&path, contents)
            .map_err(|e| RelayError::Io(format!("Failed to stage {}: {e}", path.display())))?;
        self.files.push(path.clone());
        Ok(path)
    }

    /// Copies every staged file into `target`, creating it if needed
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Io`] if the directory cannot be created or a copy
    /// fails.
    pub fn keep_copies(&self, target: &Path) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(target).map_err(|e| {
            RelayError::Io(format!("Failed to create {}: {e}", target.display()))
        })?;

        let mut kept = Vec::with_capacity(self.files.len());
        for file in &self.files {
            let Some(name) = file.file_name() else { continue };
            let destination = target.join(name);
            fs::copy(file, &destination).map_err(|e| {
                RelayError::Io(format!("Failed to keep {}: {e}", destination.display()))
            })?;
            kept.push(destination);
        }

        tracing::info!(dir = %target.display(), files = kept.len(), "Kept staged artifacts");
        Ok(kept)
    }
}
