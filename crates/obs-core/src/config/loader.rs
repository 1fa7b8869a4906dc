//! Configuration file loading and parsing

use super::discovery::{find_obsidian_vault, VAULTS_PATH_ENV};
use crate::error::{Error, Result};
use crate::types::{
    ArchiveConfig, CommandDefaults, GitConfig, GlobalConfig, ObsConfigFile, VaultCommands,
    VaultConfig, DEFAULT_EDITOR,
};
use crate::utils::{default_config_path, get_home_dir};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Default directory for `obs mv`
const DEFAULT_MV_TARGET: &str = "Archives";

/// Default directory for `obs cp`
const DEFAULT_CP_TARGET: &str = "Assets";

/// Loaded obs configuration
#[derive(Debug, Clone)]
pub struct ObsConfig {
    /// The parsed configuration
    pub config: ObsConfigFile,

    /// Path to the configuration file
    pub config_path: PathBuf,
}

impl ObsConfig {
    /// Load configuration from the specified path or the default location.
    ///
    /// A missing file at the default location is created from
    /// [`generate_default_config`]; a missing explicit path is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load_from(p),
            None => {
                let default_path = default_config_path()
                    .map_err(|e| Error::invalid_config(e.to_string()))?;
                if default_path.exists() {
                    Self::load_from(&default_path)
                } else {
                    info!(
                        "No configuration found, creating default at {}",
                        default_path.display()
                    );
                    let config = Self {
                        config: generate_default_config(),
                        config_path: default_path,
                    };
                    config.save(&config.config_path)?;
                    Ok(config)
                }
            }
        }
    }

    /// Load and validate configuration
    pub fn load_and_validate(path: Option<&Path>) -> Result<Self> {
        let config = Self::load(path)?;
        config.validate()?;
        Ok(config)
    }

    fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::config_not_found(path.display().to_string())
            } else {
                Error::Io(e)
            }
        })?;

        debug!("Parsing configuration from {}", path.display());
        let config: ObsConfigFile = serde_yaml_ng::from_str(&content)?;

        Ok(Self {
            config,
            config_path: path.to_path_buf(),
        })
    }

    /// Write the configuration as YAML, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml_ng::to_string(&self.config)?;
        fs::write(path, yaml)?;
        debug!("Configuration written to {}", path.display());
        Ok(())
    }

    /// Check the vault root and the default vault
    pub fn validate(&self) -> Result<()> {
        let root = self.root();
        if root.as_os_str().is_empty() {
            return Err(Error::invalid_config(format!(
                "no Obsidian vault root configured. Set 'config.root' or the {} environment variable and run 'obs init --force'",
                VAULTS_PATH_ENV
            )));
        }
        if !root.is_dir() {
            return Err(Error::invalid_config(format!(
                "vault root directory not found: {}",
                root.display()
            )));
        }

        let (name, _) = self.default_vault()?;
        let vault_dir = self.vault_dir(name)?;
        if !vault_dir.is_dir() {
            return Err(Error::vault_not_found(format!(
                "{} ({})",
                name,
                vault_dir.display()
            )));
        }

        if self.config.config.default_editor.trim().is_empty() {
            warn!("No editor configured, falling back to '{}'", DEFAULT_EDITOR);
        }

        Ok(())
    }

    /// Get the inner configuration file
    pub fn inner(&self) -> &ObsConfigFile {
        &self.config
    }

    /// Directory holding all vaults
    pub fn root(&self) -> &Path {
        &self.config.config.root
    }

    /// Git remote and branch
    pub fn git(&self) -> &GitConfig {
        &self.config.config.git
    }

    /// Backup settings
    pub fn archive(&self) -> &ArchiveConfig {
        &self.config.config.archive
    }

    /// Editor command, never empty
    pub fn editor(&self) -> &str {
        let editor = self.config.config.default_editor.trim();
        if editor.is_empty() {
            DEFAULT_EDITOR
        } else {
            editor
        }
    }

    /// Look up a vault by name
    pub fn vault(&self, name: &str) -> Option<&VaultConfig> {
        self.config.vaults.get(name)
    }

    /// The configured default vault
    pub fn default_vault(&self) -> Result<(&str, &VaultConfig)> {
        let name = self.config.config.default_vault.as_str();
        if name.is_empty() {
            return Err(Error::missing_field("config.default_vault"));
        }
        self.config
            .vaults
            .get_key_value(name)
            .map(|(k, v)| (k.as_str(), v))
            .ok_or_else(|| Error::vault_not_found(name))
    }

    /// Absolute directory of a vault
    pub fn vault_dir(&self, name: &str) -> Result<PathBuf> {
        let vault = self.vault(name).ok_or_else(|| Error::vault_not_found(name))?;
        Ok(self.root().join(&vault.vault_path))
    }

    /// The `.obsidian` directory of the default vault
    pub fn obsidian_dir(&self) -> Result<PathBuf> {
        let (name, _) = self.default_vault()?;
        Ok(self.vault_dir(name)?.join(".obsidian"))
    }
}

/// Build the default configuration by discovering a vault under the home
/// directory, falling back to `OBSIDIAN_VAULTS_PATH`.
pub fn generate_default_config() -> ObsConfigFile {
    let discovered = get_home_dir()
        .ok()
        .and_then(|home| find_obsidian_vault(&home));

    let vault_dir = discovered.or_else(|| {
        std::env::var(VAULTS_PATH_ENV)
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    });

    if vault_dir.is_none() {
        warn!(
            "No Obsidian vault found; set {} or edit the configuration",
            VAULTS_PATH_ENV
        );
    }

    generate_config_for(vault_dir.as_deref())
}

/// Build a configuration around a known vault directory
pub fn generate_config_for(vault_dir: Option<&Path>) -> ObsConfigFile {
    let mut vaults = BTreeMap::new();
    let mut root = PathBuf::new();
    let mut default_vault = String::new();

    if let Some(dir) = vault_dir {
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "vault".to_string());
        root = dir.parent().map(Path::to_path_buf).unwrap_or_default();
        vaults.insert(
            name.clone(),
            VaultConfig {
                vault_path: PathBuf::from(&name),
                commands: VaultCommands {
                    mv: CommandDefaults {
                        default_target_path: Some(PathBuf::from(DEFAULT_MV_TARGET)),
                    },
                    cp: CommandDefaults {
                        default_target_path: Some(PathBuf::from(DEFAULT_CP_TARGET)),
                    },
                },
            },
        );
        default_vault = name;
    }

    ObsConfigFile {
        config: GlobalConfig {
            root,
            default_vault,
            default_editor: DEFAULT_EDITOR.to_string(),
            git: GitConfig::default(),
            archive: ArchiveConfig::default(),
        },
        vaults,
    }
}
