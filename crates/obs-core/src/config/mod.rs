//! Configuration loading and management

mod discovery;
mod loader;

pub use discovery::{find_obsidian_vault, VAULTS_PATH_ENV};
pub use loader::{generate_config_for, generate_default_config, ObsConfig};
