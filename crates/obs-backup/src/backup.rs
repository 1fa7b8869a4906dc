//! Backup creation from start to finish.
//!
//! A run walks through a fixed sequence of stages:
//!
//! ```text
//! CheckDestination -> Rotate -> CheckSpace -> Encode -> Verify -> Done
//! ```
//!
//! Any failure is terminal; there are no retries. The only cleanup is
//! deleting an artifact that failed verification.

use crate::archive::{ArchiveEncoder, EncodeSummary, DEFAULT_COMPRESSION_LEVEL};
use crate::error::{Error, Result};
use crate::rotation::{artifact_path, find_previous, remove_previous};
use crate::space::{FsSpaceProbe, SpaceBudget, SpaceProbe};
use crate::verify::{ArchiveVerifier, VerifySummary};
use chrono::{Local, NaiveDateTime};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Stages of a backup run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupStage {
    CheckDestination,
    Rotate,
    CheckSpace,
    Encode,
    Verify,
    Done,
}

impl fmt::Display for BackupStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BackupStage::CheckDestination => "Checking backup medium",
            BackupStage::Rotate => "Removing previous backup",
            BackupStage::CheckSpace => "Calculating required space",
            BackupStage::Encode => "Creating backup",
            BackupStage::Verify => "Verifying backup",
            BackupStage::Done => "Backup complete",
        };
        f.write_str(label)
    }
}

/// Progress notifications emitted during a run
#[derive(Debug, Clone)]
pub enum BackupEvent {
    StageStarted(BackupStage),
    PreviousRemoved(PathBuf),
    NoPreviousBackup,
    SpaceChecked(SpaceBudget),
    Encoded { artifact: PathBuf, files: usize, bytes: u64 },
    Verified { artifact: PathBuf, entries: usize },
    ArtifactDiscarded(PathBuf),
}

/// Callback receiving [`BackupEvent`]s
pub type BackupObserver = Box<dyn FnMut(&BackupEvent) + Send>;

/// Inputs of a backup run.
#[derive(Debug, Clone)]
pub struct BackupParams {
    /// Tree to archive
    pub source: PathBuf,

    /// Directory on the backup medium
    pub destination: PathBuf,

    /// Local time embedded in the artifact name
    pub timestamp: NaiveDateTime,

    /// Compare payload digests after the structural check
    pub verify_payloads: bool,

    /// Compression level (1-9)
    pub compression_level: u32,
}

impl BackupParams {
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            timestamp: Local::now().naive_local(),
            verify_payloads: false,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }

    pub fn with_timestamp(mut self, timestamp: NaiveDateTime) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_payload_verification(mut self, enabled: bool) -> Self {
        self.verify_payloads = enabled;
        self
    }

    /// Sets the compression level.
    pub fn with_compression_level(mut self, level: u32) -> Self {
        self.compression_level = level.clamp(1, 9);
        self
    }

    /// Path the artifact of this run will be written to
    pub fn artifact_path(&self) -> PathBuf {
        artifact_path(&self.destination, self.timestamp)
    }
}

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct BackupReport {
    pub artifact_path: PathBuf,
    pub removed_previous: Option<PathBuf>,
    pub budget: SpaceBudget,
    pub encode: EncodeSummary,
    pub verify: VerifySummary,
    pub duration: Duration,
}

impl BackupReport {
    /// Size of the artifact on disk
    pub fn artifact_bytes(&self) -> u64 {
        self.encode.archive_bytes
    }

    /// SHA256 of the artifact on disk
    pub fn artifact_sha256(&self) -> &str {
        &self.verify.artifact_sha256
    }
}

/// Drives a backup run.
pub struct BackupOrchestrator<P = FsSpaceProbe> {
    params: BackupParams,
    probe: P,
    encoder: ArchiveEncoder,
    verifier: ArchiveVerifier,
    observer: Option<BackupObserver>,
}

impl BackupOrchestrator {
    pub fn new(params: BackupParams) -> Self {
        let encoder = ArchiveEncoder::new().with_compression_level(params.compression_level);
        Self {
            params,
            probe: FsSpaceProbe,
            encoder,
            verifier: ArchiveVerifier::new(),
            observer: None,
        }
    }
}

impl<P: SpaceProbe> BackupOrchestrator<P> {
    /// Use another source of free-space figures
    pub fn with_probe<Q: SpaceProbe>(self, probe: Q) -> BackupOrchestrator<Q> {
        BackupOrchestrator {
            params: self.params,
            probe,
            encoder: self.encoder,
            verifier: self.verifier,
            observer: self.observer,
        }
    }

    /// Register a progress callback
    pub fn on_event<F>(mut self, observer: F) -> Self
    where
        F: FnMut(&BackupEvent) + Send + 'static,
    {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn params(&self) -> &BackupParams {
        &self.params
    }

    /// Run every stage in order
    pub fn run(&mut self) -> Result<BackupReport> {
        let started = Instant::now();
        let source = self.params.source.clone();
        let destination = self.params.destination.clone();

        self.enter(BackupStage::CheckDestination);
        if !destination.is_dir() {
            return Err(Error::destination_unavailable(&destination));
        }

        self.enter(BackupStage::Rotate);
        let removed_previous = self.rotate(&destination)?;

        self.enter(BackupStage::CheckSpace);
        let budget = SpaceBudget::measure(&source, &destination, &self.probe)?;
        info!(
            "Space required: {} bytes, available: {} bytes",
            budget.required_bytes, budget.available_bytes
        );
        self.emit(BackupEvent::SpaceChecked(budget));
        if !budget.is_sufficient() {
            return Err(Error::insufficient_space(
                budget.required_bytes,
                budget.available_bytes,
            ));
        }

        self.enter(BackupStage::Encode);
        let artifact = self.params.artifact_path();
        let encode = self.encoder.encode(&source, &artifact)?;
        self.emit(BackupEvent::Encoded {
            artifact: artifact.clone(),
            files: encode.files,
            bytes: encode.archive_bytes,
        });

        self.enter(BackupStage::Verify);
        let verified = if self.params.verify_payloads {
            self.verifier.verify_digests(&artifact, &encode.digests)
        } else {
            self.verifier.verify(&artifact)
        };
        let verify = match verified {
            Ok(summary) => summary,
            Err(e) => {
                self.discard(&artifact);
                return Err(e);
            }
        };
        self.emit(BackupEvent::Verified {
            artifact: artifact.clone(),
            entries: verify.entries,
        });

        self.enter(BackupStage::Done);
        info!("Backup written to {}", artifact.display());

        Ok(BackupReport {
            artifact_path: artifact,
            removed_previous,
            budget,
            encode,
            verify,
            duration: started.elapsed(),
        })
    }

    fn rotate(&mut self, destination: &Path) -> Result<Option<PathBuf>> {
        match find_previous(destination)? {
            Some(previous) => {
                remove_previous(&previous)?;
                self.emit(BackupEvent::PreviousRemoved(previous.clone()));
                Ok(Some(previous))
            }
            None => {
                debug!("No previous backup in {}", destination.display());
                self.emit(BackupEvent::NoPreviousBackup);
                Ok(None)
            }
        }
    }

    fn discard(&mut self, artifact: &Path) {
        match fs::remove_file(artifact) {
            Ok(()) => {
                warn!("Removed unverifiable backup {}", artifact.display());
                self.emit(BackupEvent::ArtifactDiscarded(artifact.to_path_buf()));
            }
            Err(e) => warn!(
                "Failed to remove unverifiable backup {}: {}",
                artifact.display(),
                e
            ),
        }
    }

    fn enter(&mut self, stage: BackupStage) {
        debug!("Backup stage: {:?}", stage);
        self.emit(BackupEvent::StageStarted(stage));
    }

    fn emit(&mut self, event: BackupEvent) {
        if let Some(observer) = self.observer.as_mut() {
            observer(&event);
        }
    }
}
