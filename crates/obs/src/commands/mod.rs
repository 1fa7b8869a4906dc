//! CLI command implementations

pub mod archive;
pub mod callouts;
pub mod init;
pub mod pull;
pub mod push;
pub mod transfer;

use anyhow::{anyhow, bail, Context, Result};
use camino::Utf8PathBuf;
use obs_core::ObsConfig;
use obs_git::GitCli;
use std::path::Path;
use tracing::debug;

/// Load and validate the configuration for commands that work inside a vault
pub(crate) fn load_config(config_path: Option<&Path>) -> Result<ObsConfig> {
    ObsConfig::load_and_validate(config_path).context("Failed to load configuration")
}

/// Load the configuration for commands that only need the vault root
pub(crate) fn load_root_config(config_path: Option<&Path>) -> Result<ObsConfig> {
    let config = ObsConfig::load(config_path).context("Failed to load configuration")?;

    let root = config.root();
    if root.as_os_str().is_empty() {
        bail!(
            "No vault root configured. Set 'config.root' in {}",
            config.config_path.display()
        );
    }
    if !root.is_dir() {
        bail!("Vault root directory not found: {}", root.display());
    }

    Ok(config)
}

/// Git client for the vault root
pub(crate) fn git_client(config: &ObsConfig) -> Result<GitCli> {
    let root = Utf8PathBuf::from_path_buf(config.root().to_path_buf())
        .map_err(|p| anyhow!("Vault root is not valid UTF-8: {}", p.display()))?;
    let git = config.git();
    debug!("Using {}/{} in {}", git.remote, git.branch, root);
    Ok(GitCli::new(root, git.remote.as_str(), git.branch.as_str())?)
}
