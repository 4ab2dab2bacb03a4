//! Source file resolution
//!
//! The partner has moved the feed around over time, so the configured path is
//! tried first, then the configured fallbacks, then an optional bounded search
//! of the remote tree for a file with the same name.

use crate::adapters::transfer::TransferClient;
use crate::config::SourceConfig;
use crate::domain::errors::{RelayError, TransferError};
use crate::domain::paths::RemotePath;
use crate::domain::Result;
use std::collections::VecDeque;

/// Directory the discovery search starts from
const DISCOVERY_ROOT: &str = ".";

/// Resolves the remote path of the source document
///
/// # Errors
///
/// Returns [`TransferError::NotFound`] naming the configured path when no
/// candidate exists, or any other transfer error raised while probing.
pub fn locate_source<C>(client: &mut C, source: &SourceConfig) -> Result<RemotePath>
where
    C: TransferClient + ?Sized,
{
    let primary = remote_path(&source.remote_path)?;

    let candidates = std::iter::once(source.remote_path.as_str())
        .chain(source.fallback_paths.iter().map(String::as_str));
    for candidate in candidates {
        if client.stat(candidate)?.is_some() {
            if candidate != primary.as_str() {
                tracing::warn!(
                    configured = %primary,
                    found = candidate,
                    "Source not at configured path, using fallback"
                );
            }
            return remote_path(candidate);
        }
        tracing::debug!(path = candidate, "Source candidate not found");
    }

    if source.discover_depth > 0 {
        if let Some(found) = discover(client, primary.file_name(), source.discover_depth)? {
            tracing::warn!(configured = %primary, found = %found, "Source discovered by name");
            return Ok(found);
        }
    }

    Err(TransferError::NotFound(primary.to_string()).into())
}

/// Breadth-first search for `file_name` (case-insensitive)
///
/// `max_depth` counts directory levels: 1 lists only the search root.
/// Directories that cannot be listed are skipped.
fn discover<C>(client: &mut C, file_name: &str, max_depth: usize) -> Result<Option<RemotePath>>
where
    C: TransferClient + ?Sized,
{
    let wanted = file_name.to_lowercase();
    let mut queue = VecDeque::from([(DISCOVERY_ROOT.to_string(), 1usize)]);

    while let Some((dir, depth)) = queue.pop_front() {
        let entries = match client.list_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!(dir = %dir, error = %e, "Skipping unreadable directory");
                continue;
            }
        };

        for entry in entries {
            let path = join(&dir, &entry.name);
            if entry.is_dir {
                if depth < max_depth {
                    queue.push_back((path, depth + 1));
                }
            } else if entry.name.to_lowercase() == wanted {
                return remote_path(&path).map(Some);
            }
        }
    }

    Ok(None)
}

fn join(dir: &str, name: &str) -> String {
    if dir == DISCOVERY_ROOT {
        name.to_string()
    } else {
        format!("{}/{}", dir.trim_end_matches('/'), name)
    }
}

fn remote_path(path: &str) -> Result<RemotePath> {
    RemotePath::new(path).map_err(RelayError::Configuration)
}
