//! Read-back verification of a finished artifact.
//!
//! The structural pass decompresses the whole stream and walks every entry
//! header up to the end marker, then drains the decompressor so the gzip
//! trailer (CRC and length) is checked too. Nothing is written to disk.
//! The digest pass additionally hashes each regular-file payload and
//! compares it with what the encoder recorded.

use crate::checksum::{sha256_reader, EntryDigest, HashingReader};
use crate::error::{Error, Result};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io;
use std::path::Path;
use tar::{Archive, EntryType};
use tracing::{debug, info};

/// What a verification pass saw.
#[derive(Debug, Clone, Default)]
pub struct VerifySummary {
    /// Entries of any type
    pub entries: usize,
    pub directories: usize,
    pub files: usize,

    /// Payload bytes announced by regular-file headers
    pub payload_bytes: u64,

    /// SHA256 of the compressed artifact as stored on disk
    pub artifact_sha256: String,
}

/// Reads artifacts back without extracting them.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchiveVerifier;

impl ArchiveVerifier {
    pub fn new() -> Self {
        Self
    }

    /// Structural check of `artifact`
    pub fn verify(&self, artifact: &Path) -> Result<VerifySummary> {
        let (summary, _) = scan(artifact, false)?;
        info!("Verified {} ({} entries)", artifact.display(), summary.entries);
        Ok(summary)
    }

    /// Structural check plus payload digest comparison against `expected`
    pub fn verify_digests(&self, artifact: &Path, expected: &[EntryDigest]) -> Result<VerifySummary> {
        let (summary, actual) = scan(artifact, true)?;
        compare_digests(artifact, expected, &actual)?;
        info!(
            "Verified {} ({} entries, {} payload digests)",
            artifact.display(),
            summary.entries,
            actual.len()
        );
        Ok(summary)
    }
}

fn scan(artifact: &Path, hash_payloads: bool) -> Result<(VerifySummary, Vec<EntryDigest>)> {
    let fail = |e: io::Error| Error::verify_failed(artifact, e.to_string());

    let file = File::open(artifact).map_err(fail)?;
    let mut raw = HashingReader::new(file);
    let mut summary = VerifySummary::default();
    let mut digests = Vec::new();

    {
        let mut archive = Archive::new(GzDecoder::new(&mut raw));
        for entry in archive.entries().map_err(fail)? {
            let mut entry = entry.map_err(fail)?;
            summary.entries += 1;

            match entry.header().entry_type() {
                EntryType::Directory => summary.directories += 1,
                EntryType::Regular => {
                    summary.files += 1;
                    summary.payload_bytes += entry.size();
                    if hash_payloads {
                        let name = entry.path().map_err(fail)?.into_owned();
                        let sha256 = sha256_reader(&mut entry).map_err(fail)?;
                        digests.push(EntryDigest { name, sha256 });
                    }
                }
                other => debug!("Unexpected entry type {:?} in archive", other),
            }
        }

        // Past the end marker: let the decoder reach and check the trailer
        let mut decoder = archive.into_inner();
        io::copy(&mut decoder, &mut io::sink()).map_err(fail)?;
    }

    io::copy(&mut raw, &mut io::sink()).map_err(fail)?;
    summary.artifact_sha256 = raw.finalize();

    Ok((summary, digests))
}

fn compare_digests(artifact: &Path, expected: &[EntryDigest], actual: &[EntryDigest]) -> Result<()> {
    for (want, got) in expected.iter().zip(actual) {
        if want.name != got.name {
            return Err(Error::verify_failed(
                artifact,
                format!(
                    "expected entry {} but found {}",
                    want.name.display(),
                    got.name.display()
                ),
            ));
        }
        if want.sha256 != got.sha256 {
            return Err(Error::verify_failed(
                artifact,
                format!("checksum mismatch for {}", want.name.display()),
            ));
        }
    }

    if expected.len() != actual.len() {
        return Err(Error::verify_failed(
            artifact,
            format!(
                "archive holds {} files, {} were written",
                actual.len(),
                expected.len()
            ),
        ));
    }

    Ok(())
}
