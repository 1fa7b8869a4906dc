//! Placing files from anywhere on disk into a vault

use crate::config::ObsConfig;
use crate::error::{Error, Result};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Commands that place files into the vault
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultCommand {
    Copy,
    Move,
}

impl fmt::Display for VaultCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VaultCommand::Copy => write!(f, "cp"),
            VaultCommand::Move => write!(f, "mv"),
        }
    }
}

/// How the file reaches the vault
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferMode {
    Copy,
    Move,
}

impl From<VaultCommand> for TransferMode {
    fn from(command: VaultCommand) -> Self {
        match command {
            VaultCommand::Copy => TransferMode::Copy,
            VaultCommand::Move => TransferMode::Move,
        }
    }
}

/// A resolved target directory inside the default vault
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultPlacement {
    /// Absolute target directory
    pub directory: PathBuf,

    /// Whether the directory came from the vault's configured default
    pub from_default: bool,
}

impl VaultPlacement {
    /// Resolve `root/<vault_path>/<destination>` for the default vault.
    ///
    /// `explicit` wins over the command default configured for the vault.
    pub fn resolve(config: &ObsConfig, explicit: Option<&Path>, command: VaultCommand) -> Result<Self> {
        let (name, vault) = config.default_vault()?;
        let configured = match command {
            VaultCommand::Copy => vault.commands.cp.default_target_path.as_deref(),
            VaultCommand::Move => vault.commands.mv.default_target_path.as_deref(),
        };

        let explicit = explicit.filter(|p| !p.as_os_str().is_empty());
        let (relative, from_default) = match (explicit, configured) {
            (Some(dest), _) => (dest, false),
            (None, Some(dest)) if !dest.as_os_str().is_empty() => (dest, true),
            _ => return Err(Error::no_destination(command.to_string())),
        };

        let directory = config.vault_dir(name)?.join(relative);
        debug!("Resolved {} destination: {}", command, directory.display());

        Ok(Self {
            directory,
            from_default,
        })
    }

    /// Copy or move `source` into the placement directory, keeping its
    /// file name. Returns the final path.
    pub fn transfer(&self, source: &Path, mode: TransferMode) -> Result<PathBuf> {
        if !source.exists() {
            return Err(Error::source_not_found(source.display().to_string()));
        }

        let file_name = source
            .file_name()
            .ok_or_else(|| Error::source_not_found(source.display().to_string()))?;

        if !self.directory.exists() {
            info!("Creating destination directory: {}", self.directory.display());
            fs::create_dir_all(&self.directory)?;
        }

        let target = self.directory.join(file_name);
        if target.exists() {
            return Err(Error::destination_exists(target.display().to_string()));
        }

        match mode {
            TransferMode::Copy => {
                fs::copy(source, &target)?;
            }
            TransferMode::Move => move_file(source, &target)?,
        }

        Ok(target)
    }
}

/// Copy `source` into the vault
pub fn copy_into_vault(source: &Path, placement: &VaultPlacement) -> Result<PathBuf> {
    placement.transfer(source, TransferMode::Copy)
}

/// Move `source` into the vault
pub fn move_into_vault(source: &Path, placement: &VaultPlacement) -> Result<PathBuf> {
    placement.transfer(source, TransferMode::Move)
}

/// Rename, falling back to copy and delete across filesystems
fn move_file(source: &Path, target: &Path) -> io::Result<()> {
    match fs::rename(source, target) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            debug!("Rename crosses filesystems, copying {}", source.display());
            fs::copy(source, target)?;
            fs::remove_file(source)
        }
        Err(e) => Err(e),
    }
}
