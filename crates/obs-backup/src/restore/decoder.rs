//! Extraction of an artifact into a target directory.

use crate::error::{Error, Result};
use flate2::read::GzDecoder;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read};
use std::path::{Component, Path};
use tar::{Archive, EntryType};
use tracing::{debug, info, warn};

/// What was written during extraction.
#[derive(Debug, Clone, Default)]
pub struct DecodeSummary {
    pub directories: usize,
    pub files: usize,

    /// Entries of a type the archive model does not restore
    pub skipped: usize,

    /// Payload bytes written to disk
    pub payload_bytes: u64,
}

/// Restores `.tar.gz` artifacts.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchiveDecoder;

impl ArchiveDecoder {
    pub fn new() -> Self {
        Self
    }

    /// Extract every entry of `artifact` below `target`, in stream order.
    ///
    /// Existing files are overwritten; missing parents are created.
    pub fn decode(&self, artifact: &Path, target: &Path) -> Result<DecodeSummary> {
        info!("Extracting {} into {}", artifact.display(), target.display());

        let file = File::open(artifact).map_err(|e| Error::decode_failed(artifact, e))?;
        let mut archive = Archive::new(GzDecoder::new(file));
        let mut summary = DecodeSummary::default();

        for entry in archive
            .entries()
            .map_err(|e| Error::decode_failed(artifact, e))?
        {
            let mut entry = entry.map_err(|e| Error::decode_failed(artifact, e))?;
            let relative = entry
                .path()
                .map_err(|e| Error::decode_failed(artifact, e))?
                .into_owned();
            check_entry_path(&relative).map_err(|e| Error::decode_failed(&relative, e))?;

            let dest = target.join(&relative);
            match entry.header().entry_type() {
                EntryType::Directory => {
                    fs::create_dir_all(&dest).map_err(|e| Error::decode_failed(&dest, e))?;
                    summary.directories += 1;
                }
                EntryType::Regular => {
                    let mode = entry
                        .header()
                        .mode()
                        .map_err(|e| Error::decode_failed(&relative, e))?;
                    let written =
                        write_file(&mut entry, &dest, mode).map_err(|e| Error::decode_failed(&dest, e))?;
                    summary.files += 1;
                    summary.payload_bytes += written;
                    debug!("Restored {} ({} bytes)", dest.display(), written);
                }
                other => {
                    warn!("Skipping {}: unsupported entry type {:?}", relative.display(), other);
                    summary.skipped += 1;
                }
            }
        }

        info!(
            "Extracted {} files in {} directories",
            summary.files, summary.directories
        );
        Ok(summary)
    }
}

/// Entry paths must stay below the target directory
fn check_entry_path(path: &Path) -> io::Result<()> {
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "absolute path in archive",
                ))
            }
            Component::ParentDir => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "parent directory reference in archive",
                ))
            }
            Component::CurDir | Component::Normal(_) => {}
        }
    }
    Ok(())
}

fn write_file(payload: &mut impl Read, dest: &Path, mode: u32) -> io::Result<u64> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
    }

    let mut file = options.open(dest)?;
    let written = io::copy(payload, &mut file)?;

    // Creation mode is filtered by the umask; set it again explicitly
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(dest, fs::Permissions::from_mode(mode & 0o7777))?;
    }
    #[cfg(not(unix))]
    let _ = mode;

    Ok(written)
}
