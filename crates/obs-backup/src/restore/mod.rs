//! Restoring the latest backup from the medium.
//!
//! The flow mirrors backup creation in reverse:
//!
//! 1. the medium must be present,
//! 2. the backup on it is located,
//! 3. an existing extraction directory is only replaced after confirmation,
//! 4. the directory is recreated and the artifact decoded into it.

pub mod decoder;

pub use decoder::{ArchiveDecoder, DecodeSummary};

use crate::error::{Error, Result};
use crate::rotation::find_previous;
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::info;

/// Where to restore from and to.
#[derive(Debug, Clone)]
pub struct RestoreParams {
    /// Directory on the medium holding the artifact
    pub destination: PathBuf,

    /// Extraction directory
    pub target: PathBuf,
}

impl RestoreParams {
    pub fn new(destination: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
            target: target.into(),
        }
    }
}

/// A located artifact, ready to be extracted.
#[derive(Debug, Clone)]
pub struct RestorePlan {
    pub artifact: PathBuf,
    pub target: PathBuf,

    /// Whether the extraction directory already exists and will be replaced
    pub target_exists: bool,
}

/// Result of a finished extraction.
#[derive(Debug, Clone)]
pub struct RestoreReport {
    pub artifact: PathBuf,
    pub target: PathBuf,
    pub replaced_existing: bool,
    pub decode: DecodeSummary,
    pub duration: Duration,
}

/// How a restore run ended.
#[derive(Debug, Clone)]
pub enum RestoreOutcome {
    Restored(RestoreReport),

    /// Overwriting the extraction directory was declined; nothing changed
    Cancelled,
}

/// Drives a restore from the medium.
#[derive(Debug, Clone)]
pub struct RestoreOrchestrator {
    params: RestoreParams,
    decoder: ArchiveDecoder,
}

impl RestoreOrchestrator {
    pub fn new(params: RestoreParams) -> Self {
        Self {
            params,
            decoder: ArchiveDecoder::new(),
        }
    }

    pub fn params(&self) -> &RestoreParams {
        &self.params
    }

    /// Find the artifact to restore
    pub fn locate(&self) -> Result<RestorePlan> {
        let destination = &self.params.destination;
        if !destination.is_dir() {
            return Err(Error::destination_unavailable(destination));
        }

        let artifact = find_previous(destination)?.ok_or_else(|| Error::no_backup_found(destination))?;
        info!("Found backup {}", artifact.display());

        Ok(RestorePlan {
            artifact,
            target: self.params.target.clone(),
            target_exists: self.params.target.exists(),
        })
    }

    /// Replace the extraction directory with the artifact's contents
    pub fn execute(&self, plan: &RestorePlan) -> Result<RestoreReport> {
        let started = Instant::now();
        let target = &plan.target;

        if target.exists() {
            fs::remove_dir_all(target).map_err(|e| Error::target_preparation_failed(target, e))?;
            info!("Removed existing extraction directory {}", target.display());
        }
        fs::create_dir_all(target).map_err(|e| Error::target_preparation_failed(target, e))?;

        let decode = self.decoder.decode(&plan.artifact, target)?;

        Ok(RestoreReport {
            artifact: plan.artifact.clone(),
            target: target.clone(),
            replaced_existing: plan.target_exists,
            decode,
            duration: started.elapsed(),
        })
    }

    /// Locate, confirm, then execute.
    ///
    /// `confirm` is only asked when the extraction directory already exists.
    pub fn run<F>(&self, confirm: F) -> Result<RestoreOutcome>
    where
        F: FnOnce(&RestorePlan) -> bool,
    {
        let plan = self.locate()?;
        if plan.target_exists && !confirm(&plan) {
            info!("Restore cancelled, {} left untouched", plan.target.display());
            return Ok(RestoreOutcome::Cancelled);
        }

        self.execute(&plan).map(RestoreOutcome::Restored)
    }
}
