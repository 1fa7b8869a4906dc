//! Streaming tar+gzip encoder.
//!
//! The source tree is written entry by entry, in traversal order, straight
//! into a gzip-compressed tar stream on the destination medium. Nothing is
//! staged in memory beyond the I/O buffers.

use crate::checksum::{EntryDigest, HashingReader};
use crate::error::{Error, Result};
use crate::sanitize::archive_entry_name;
use crate::walker::{EntryKind, TreeEntry, TreeWalker};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;
use std::time::UNIX_EPOCH;
use tar::{Builder as TarBuilder, EntryType, Header};
use tracing::{debug, info, warn};

/// Default compression level (6 = balanced speed/ratio).
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

#[cfg(not(unix))]
const DEFAULT_DIR_MODE: u32 = 0o755;
#[cfg(not(unix))]
const DEFAULT_FILE_MODE: u32 = 0o644;

/// What went into an archive.
#[derive(Debug, Clone, Default)]
pub struct EncodeSummary {
    /// Directory entries written, the root included
    pub directories: usize,

    /// Regular file entries written
    pub files: usize,

    /// Symbolic links and special files left out
    pub skipped: usize,

    /// Total payload bytes of the regular files
    pub payload_bytes: u64,

    /// Size of the finished artifact on disk
    pub archive_bytes: u64,

    /// Payload digests in archive order
    pub digests: Vec<EntryDigest>,
}

/// Writes a source tree into a `.tar.gz` artifact.
#[derive(Debug, Clone, Copy)]
pub struct ArchiveEncoder {
    compression_level: u32,
}

impl Default for ArchiveEncoder {
    fn default() -> Self {
        Self {
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }
}

type TarStream = TarBuilder<GzEncoder<BufWriter<File>>>;

impl ArchiveEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the compression level.
    pub fn with_compression_level(mut self, level: u32) -> Self {
        self.compression_level = level.clamp(1, 9);
        self
    }

    pub fn compression_level(&self) -> u32 {
        self.compression_level
    }

    /// Encode `source` into a new artifact at `artifact`.
    ///
    /// A failure leaves whatever was already written in place.
    pub fn encode(&self, source: &Path, artifact: &Path) -> Result<EncodeSummary> {
        let root = std::path::absolute(source).map_err(|e| Error::encode_failed(source, e))?;
        info!("Archiving {} into {}", root.display(), artifact.display());

        let file = File::create(artifact).map_err(|e| Error::encode_failed(artifact, e))?;
        let encoder = GzEncoder::new(
            BufWriter::new(file),
            Compression::new(self.compression_level),
        );
        let mut builder = TarBuilder::new(encoder);
        let mut summary = EncodeSummary::default();

        for entry in TreeWalker::new(&root).entries() {
            let entry = entry.map_err(|e| Error::encode_failed(&root, e))?;
            let name = archive_entry_name(&entry.relative);

            match entry.kind {
                EntryKind::Directory => {
                    append_directory(&mut builder, &entry, &name)?;
                    summary.directories += 1;
                }
                EntryKind::File => {
                    let digest = append_file(&mut builder, &entry, &name)?;
                    summary.files += 1;
                    summary.payload_bytes += entry.file_size();
                    summary.digests.push(digest);
                }
                EntryKind::Symlink | EntryKind::Other => {
                    warn!("Skipping {}: not a regular file or directory", entry.path.display());
                    summary.skipped += 1;
                }
            }
        }

        summary.archive_bytes = finish(builder, artifact)?;
        info!(
            "Archived {} files in {} directories ({} bytes compressed)",
            summary.files, summary.directories, summary.archive_bytes
        );
        Ok(summary)
    }
}

fn append_directory(builder: &mut TarStream, entry: &TreeEntry, name: &Path) -> Result<()> {
    let mut header = entry_header(entry, EntryType::Directory, 0);
    builder
        .append_data(&mut header, name, io::empty())
        .map_err(|e| Error::encode_failed(&entry.path, e))?;
    debug!("Added directory {}", name.display());
    Ok(())
}

fn append_file(builder: &mut TarStream, entry: &TreeEntry, name: &Path) -> Result<EntryDigest> {
    let size = entry.file_size();
    let file = File::open(&entry.path).map_err(|e| Error::encode_failed(&entry.path, e))?;
    let mut reader = HashingReader::new(file.take(size));

    let mut header = entry_header(entry, EntryType::Regular, size);
    builder
        .append_data(&mut header, name, &mut reader)
        .map_err(|e| Error::encode_failed(&entry.path, e))?;

    // The header already announced `size` bytes
    if reader.bytes_read() != size {
        return Err(Error::encode_failed(
            &entry.path,
            io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "file shrank while archiving ({} of {} bytes read)",
                    reader.bytes_read(),
                    size
                ),
            ),
        ));
    }

    debug!("Added file {} ({} bytes)", name.display(), size);
    Ok(EntryDigest {
        name: name.to_path_buf(),
        sha256: reader.finalize(),
    })
}

fn entry_header(entry: &TreeEntry, entry_type: EntryType, size: u64) -> Header {
    let mut header = Header::new_gnu();
    header.set_entry_type(entry_type);
    header.set_size(size);
    header.set_mode(entry_mode(entry));

    let mtime = entry
        .metadata
        .modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs())
        .unwrap_or(0);
    header.set_mtime(mtime);
    header
}

#[cfg(unix)]
fn entry_mode(entry: &TreeEntry) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    entry.metadata.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn entry_mode(entry: &TreeEntry) -> u32 {
    match entry.kind {
        EntryKind::Directory => DEFAULT_DIR_MODE,
        _ => DEFAULT_FILE_MODE,
    }
}

/// Write the end marker, the gzip trailer and flush everything to disk.
fn finish(builder: TarStream, artifact: &Path) -> Result<u64> {
    let encoder = builder
        .into_inner()
        .map_err(|e| Error::encode_failed(artifact, e))?;
    let mut writer = encoder
        .finish()
        .map_err(|e| Error::encode_failed(artifact, e))?;
    writer
        .flush()
        .map_err(|e| Error::encode_failed(artifact, e))?;
    let file = writer
        .into_inner()
        .map_err(|e| Error::encode_failed(artifact, e.into_error()))?;
    file.sync_all()
        .map_err(|e| Error::encode_failed(artifact, e))?;

    let size = file
        .metadata()
        .map_err(|e| Error::encode_failed(artifact, e))?
        .len();
    Ok(size)
}
