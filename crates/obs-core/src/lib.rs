//! # obs-core
//!
//! Core library for the obs CLI providing:
//! - Configuration file parsing (config.yaml)
//! - Vault layout resolution
//! - Copying and moving files into a vault
//! - The callouts CSS snippet

pub mod config;
pub mod error;
pub mod snippets;
pub mod types;
pub mod utils;
pub mod vault;

pub use config::{generate_default_config, ObsConfig};
pub use error::{Error, Result};
pub use utils::get_home_dir;
pub use vault::{TransferMode, VaultCommand, VaultPlacement};
