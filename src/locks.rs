//! Stale lock cleanup.
//!
//! An interrupted git process can leave its lock files behind, after which every
//! mutating command fails with "Another git process seems to be running". These
//! are removed before each mutating command. This assumes a single writer: a
//! lock that belongs to a live process is removed all the same.

use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;

use tracing::error;
use tracing::info;
use tracing::warn;

use crate::error::OpsError;

/// Lock files checked, relative to the repository metadata directory.
pub const LOCK_FILES: [&str; 2] = ["index.lock", "HEAD.lock"];

/// Remove known lock files under `<working_dir>/.git`.
///
/// Returns the paths that were removed. Nothing is done unless `.git` is a
/// directory: in linked worktrees and submodules it is a `gitdir:` file.
pub async fn remove_stale_locks(working_dir: &Path) -> Result<Vec<PathBuf>, OpsError> {
    let git_dir = working_dir.join(".git");
    let mut removed = Vec::new();

    match tokio::fs::metadata(&git_dir).await {
        Ok(metadata) if metadata.is_dir() => {}
        _ => return Ok(removed),
    }

    for name in LOCK_FILES {
        let lock = git_dir.join(name);
        match tokio::fs::try_exists(&lock).await {
            Ok(true) => {}
            Ok(false) => continue,
            Err(source) => return Err(OpsError::LockCleanup { path: lock, source }),
        }

        warn!(path = %lock.display(), "Found stale lock file");
        match tokio::fs::remove_file(&lock).await {
            Ok(()) => {
                info!(path = %lock.display(), "Removed stale lock file");
                removed.push(lock);
            }
            // Released by its owner in the meantime
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(source) => {
                error!(path = %lock.display(), "Failed to remove lock file");
                return Err(OpsError::LockCleanup { path: lock, source });
            }
        }
    }

    Ok(removed)
}
