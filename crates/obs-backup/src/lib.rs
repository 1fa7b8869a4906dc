//! Obs Backup System
//!
//! This crate archives the vault root to removable media and restores it.
//! Backups are single-slot: every run replaces the previous artifact on the
//! medium with a freshly timestamped `tar.gz`.
//!
//! # Features
//!
//! - **Space accounting**: the medium must hold the raw tree size plus 10%
//! - **Streaming compression**: entries go straight from disk into tar+gzip
//! - **Portable names**: characters rejected by FAT/NTFS are replaced in base names
//! - **Read-back verification**: artifacts that do not decode cleanly are deleted
//! - **Optional payload digests**: SHA256 per file, compared after encoding
//!
//! # Examples
//!
//! ```no_run
//! use obs_backup::{BackupOrchestrator, BackupParams};
//!
//! fn main() -> Result<(), obs_backup::Error> {
//!     let params = BackupParams::new("/home/me/Obsidian", "/media/usb");
//!     let report = BackupOrchestrator::new(params).run()?;
//!
//!     println!("Backup created: {} bytes", report.artifact_bytes());
//!     Ok(())
//! }
//! ```

pub mod archive;
pub mod backup;
pub mod checksum;
pub mod error;
pub mod restore;
pub mod rotation;
pub mod sanitize;
pub mod space;
pub mod verify;
pub mod walker;

// Re-export commonly used types
pub use archive::{ArchiveEncoder, EncodeSummary, DEFAULT_COMPRESSION_LEVEL};
pub use backup::{
    BackupEvent, BackupObserver, BackupOrchestrator, BackupParams, BackupReport, BackupStage,
};
pub use checksum::EntryDigest;
pub use error::{Error, Result};
pub use restore::{
    ArchiveDecoder, DecodeSummary, RestoreOrchestrator, RestoreOutcome, RestoreParams,
    RestorePlan, RestoreReport,
};
pub use rotation::{artifact_file_name, find_previous, remove_previous, ARTIFACT_PREFIX};
pub use sanitize::{archive_entry_name, sanitize_file_name, sanitize_os_name};
pub use space::{
    available_space, format_bytes, required_space, FsSpaceProbe, SpaceBudget, SpaceProbe,
};
pub use verify::{ArchiveVerifier, VerifySummary};
pub use walker::{EntryKind, TreeEntry, TreeWalker};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
