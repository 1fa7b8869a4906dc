//! Single-slot rotation of backup artifacts on the destination medium.
//!
//! Artifacts are named `backup-obsidian_<YYYY-MM-DD_HH-MM-SS>.tar.gz`. Only
//! one is expected to live on the medium; when several match, the first
//! in sorted order is treated as the previous backup.

use crate::error::{Error, Result};
use chrono::NaiveDateTime;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File name prefix of every artifact
pub const ARTIFACT_PREFIX: &str = "backup-obsidian_";

/// File name suffix of every artifact
pub const ARTIFACT_EXTENSION: &str = ".tar.gz";

/// Timestamp layout embedded in artifact names
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Artifact file name for a given local time
pub fn artifact_file_name(timestamp: NaiveDateTime) -> String {
    format!(
        "{}{}{}",
        ARTIFACT_PREFIX,
        timestamp.format(TIMESTAMP_FORMAT),
        ARTIFACT_EXTENSION
    )
}

/// Full artifact path inside `destination`
pub fn artifact_path(destination: &Path, timestamp: NaiveDateTime) -> PathBuf {
    destination.join(artifact_file_name(timestamp))
}

/// Whether a file name looks like one of our artifacts
pub fn is_artifact_name(name: &str) -> bool {
    name.starts_with(ARTIFACT_PREFIX) && name.ends_with(ARTIFACT_EXTENSION)
}

/// Locate the previous artifact in `destination`.
///
/// Returns `Ok(None)` when the medium holds no backup.
pub fn find_previous(destination: &Path) -> Result<Option<PathBuf>> {
    let dest_str = destination.to_str().ok_or_else(|| {
        Error::backup_lookup_failed(destination, "destination path is not valid UTF-8")
    })?;

    let pattern = format!(
        "{}/{}*{}",
        glob::Pattern::escape(dest_str.trim_end_matches('/')),
        ARTIFACT_PREFIX,
        ARTIFACT_EXTENSION
    );
    debug!("Looking for previous backup with pattern {}", pattern);

    let paths = glob::glob(&pattern)
        .map_err(|e| Error::backup_lookup_failed(destination, e.to_string()))?;

    let mut matches = Vec::new();
    for entry in paths {
        let path = entry.map_err(|e| Error::backup_lookup_failed(destination, e.to_string()))?;
        if path.is_file() {
            matches.push(path);
        }
    }
    matches.sort();

    Ok(matches.into_iter().next())
}

/// Delete a previous artifact
pub fn remove_previous(path: &Path) -> Result<()> {
    fs::remove_file(path).map_err(|e| Error::removal_failed(path, e))?;
    info!("Removed previous backup {}", path.display());
    Ok(())
}
