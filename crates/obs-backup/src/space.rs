//! Space accounting for a backup run.
//!
//! The required size is the total size of the regular files in the source
//! tree plus a 10% margin, computed in integer arithmetic:
//! `raw + raw / 10`. Available space is whatever the filesystem holding
//! the destination reports as usable by an unprivileged process.

use crate::error::{Error, Result};
use crate::walker::TreeWalker;
use std::io;
use std::path::Path;
use tracing::debug;

/// Divisor of the safety margin added to the raw size (10%)
pub const SPACE_MARGIN_DIVISOR: u64 = 10;

/// Source of free-space figures for a destination path
pub trait SpaceProbe {
    fn available_space(&self, path: &Path) -> io::Result<u64>;
}

/// Free space as reported by the operating system
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSpaceProbe;

impl SpaceProbe for FsSpaceProbe {
    fn available_space(&self, path: &Path) -> io::Result<u64> {
        fs4::available_space(path)
    }
}

/// Required versus available bytes for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpaceBudget {
    /// Sum of regular file sizes in the source tree
    pub raw_bytes: u64,

    /// `raw_bytes` plus the margin
    pub required_bytes: u64,

    /// Free bytes at the destination
    pub available_bytes: u64,
}

impl SpaceBudget {
    /// Measure the source tree and query the destination
    pub fn measure(source: &Path, destination: &Path, probe: &dyn SpaceProbe) -> Result<Self> {
        let raw_bytes = tree_size(source)?;
        let available_bytes = available_space(probe, destination)?;

        Ok(Self {
            raw_bytes,
            required_bytes: with_margin(raw_bytes),
            available_bytes,
        })
    }

    pub fn is_sufficient(&self) -> bool {
        self.available_bytes >= self.required_bytes
    }
}

/// Apply the safety margin to a raw byte count
pub fn with_margin(raw: u64) -> u64 {
    raw.saturating_add(raw / SPACE_MARGIN_DIVISOR)
}

/// Sum of the sizes of every regular file under `source`
pub fn tree_size(source: &Path) -> Result<u64> {
    let mut total: u64 = 0;
    for entry in TreeWalker::new(source).entries() {
        let entry = entry.map_err(|e| Error::space_calculation_failed(source, e))?;
        total = total.saturating_add(entry.file_size());
    }
    debug!("Source tree {} holds {} bytes", source.display(), total);
    Ok(total)
}

/// Bytes needed to back up `source`, margin included
pub fn required_space(source: &Path) -> Result<u64> {
    Ok(with_margin(tree_size(source)?))
}

/// Free bytes at `destination`
pub fn available_space(probe: &dyn SpaceProbe, destination: &Path) -> Result<u64> {
    probe
        .available_space(destination)
        .map_err(|e| Error::space_calculation_failed(destination, e))
}

/// Render a byte count with binary units (`1.5 KB`, `3.0 GB`)
pub fn format_bytes(bytes: u64) -> String {
    const UNIT: u64 = 1024;
    const PREFIXES: &[char] = &['K', 'M', 'G', 'T', 'P', 'E'];

    if bytes < UNIT {
        return format!("{} B", bytes);
    }

    let mut div = UNIT;
    let mut exp = 0;
    let mut n = bytes / UNIT;
    while n >= UNIT {
        div *= UNIT;
        exp += 1;
        n /= UNIT;
    }

    format!("{:.1} {}B", bytes as f64 / div as f64, PREFIXES[exp])
}
