//! Configuration types for config.yaml

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Default editor launched by `obs callouts`
pub const DEFAULT_EDITOR: &str = "code";

/// Default git remote
pub const DEFAULT_REMOTE: &str = "origin";

/// Default git branch
pub const DEFAULT_BRANCH: &str = "main";

/// Root config.yaml document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObsConfigFile {
    /// Global settings
    pub config: GlobalConfig,

    /// Vaults living under `config.root`, keyed by name
    #[serde(default)]
    pub vaults: BTreeMap<String, VaultConfig>,
}

/// Settings shared by every vault
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Directory holding all vaults; the git work tree and the archive source
    #[serde(default)]
    pub root: PathBuf,

    /// Vault used by cp, mv and callouts
    #[serde(default)]
    pub default_vault: String,

    /// Editor command for the callouts snippet
    #[serde(default = "default_editor")]
    pub default_editor: String,

    /// Git synchronization settings
    #[serde(default)]
    pub git: GitConfig,

    /// Removable-media backup settings
    #[serde(default)]
    pub archive: ArchiveConfig,
}

/// Git remote and branch used by push and pull
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitConfig {
    #[serde(default = "default_remote")]
    pub remote: String,

    #[serde(default = "default_branch")]
    pub branch: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            remote: default_remote(),
            branch: default_branch(),
        }
    }
}

/// Backup destination and restore target
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Mount point of the removable medium receiving backups
    #[serde(default)]
    pub usb_path: PathBuf,

    /// Directory a backup is extracted into
    #[serde(default)]
    pub extract_path: PathBuf,
}

/// A single vault
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Vault directory, relative to `config.root`
    pub vault_path: PathBuf,

    /// Per-command defaults
    #[serde(default)]
    pub commands: VaultCommands,
}

/// Per-command defaults of a vault
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VaultCommands {
    #[serde(default)]
    pub mv: CommandDefaults,

    #[serde(default)]
    pub cp: CommandDefaults,
}

/// Default target directory of a file placement command
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandDefaults {
    /// Directory inside the vault used when `--destination` is omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_target_path: Option<PathBuf>,
}

fn default_editor() -> String {
    DEFAULT_EDITOR.to_string()
}

fn default_remote() -> String {
    DEFAULT_REMOTE.to_string()
}

fn default_branch() -> String {
    DEFAULT_BRANCH.to_string()
}
