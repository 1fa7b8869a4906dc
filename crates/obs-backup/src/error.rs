//! Error types for obs-backup

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias using obs-backup's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Failures of the backup and restore pipeline, one per step
#[derive(Error, Debug)]
pub enum Error {
    /// Backup medium missing or not a directory
    #[error("Backup medium not present at {}", .path.display())]
    DestinationUnavailable { path: PathBuf },

    /// Searching the medium for an existing backup failed
    #[error("Failed to look up previous backup in {}: {message}", .path.display())]
    BackupLookupFailed { path: PathBuf, message: String },

    /// The previous backup could not be deleted
    #[error("Failed to remove previous backup {}", .path.display())]
    PreviousBackupRemovalFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Walking the source or querying free space failed
    #[error("Failed to calculate space for {}", .path.display())]
    SpaceCalculationFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Medium too small for the backup
    #[error("Insufficient space: {required} bytes required, {available} bytes available")]
    InsufficientSpace { required: u64, available: u64 },

    /// Writing the archive failed
    #[error("Failed to create backup while processing {}", .path.display())]
    EncodeFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The produced archive did not read back cleanly
    #[error("Backup verification failed for {}: {reason}", .path.display())]
    VerifyFailed { path: PathBuf, reason: String },

    /// Extracting the archive failed
    #[error("Failed to extract backup at {}", .path.display())]
    DecodeFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// No backup on the medium to restore from
    #[error("No backup found in {}", .path.display())]
    NoBackupFound { path: PathBuf },

    /// Clearing or creating the extraction directory failed
    #[error("Failed to prepare extraction directory {}", .path.display())]
    TargetPreparationFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Create a destination unavailable error
    pub fn destination_unavailable(path: impl AsRef<Path>) -> Self {
        Self::DestinationUnavailable {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Create a backup lookup error
    pub fn backup_lookup_failed(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::BackupLookupFailed {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    /// Create a previous backup removal error
    pub fn removal_failed(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::PreviousBackupRemovalFailed {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a space calculation error
    pub fn space_calculation_failed(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::SpaceCalculationFailed {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create an insufficient space error
    pub fn insufficient_space(required: u64, available: u64) -> Self {
        Self::InsufficientSpace {
            required,
            available,
        }
    }

    /// Create an encode error
    pub fn encode_failed(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::EncodeFailed {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a verification error
    pub fn verify_failed(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        Self::VerifyFailed {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Create a decode error
    pub fn decode_failed(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::DecodeFailed {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a no backup found error
    pub fn no_backup_found(path: impl AsRef<Path>) -> Self {
        Self::NoBackupFound {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Create a target preparation error
    pub fn target_preparation_failed(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::TargetPreparationFailed {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}
