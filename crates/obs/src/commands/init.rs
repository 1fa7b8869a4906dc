//! Init command

use anyhow::{Context, Result};
use clap::Args;
use obs_core::utils::default_config_path;
use obs_core::{generate_default_config, ObsConfig};
use std::path::Path;

use crate::output;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing configuration file
    #[arg(short, long)]
    pub force: bool,
}

pub fn run(args: InitArgs, config_path: Option<&Path>) -> Result<()> {
    output::header("Initialize configuration");

    let path = match config_path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };
    let display = path.display().to_string();

    if path.exists() && !args.force {
        output::info(&format!("Configuration file already exists at: {}", display));
        output::info("Edit the file manually, or run 'obs init --force' to overwrite it");
        return Ok(());
    }

    let config = ObsConfig {
        config: generate_default_config(),
        config_path: path.clone(),
    };
    config
        .save(&path)
        .with_context(|| format!("Failed to save configuration to {}", display))?;

    output::success(&format!("Configuration file created at: {}", display));

    let settings = &config.config.config;
    output::kv("Vault root", &settings.root.display().to_string());
    output::kv("Default vault", &settings.default_vault);
    output::kv("Editor", &settings.default_editor);
    if settings.root.as_os_str().is_empty() {
        output::warning("No Obsidian vault found; set 'config.root' before using other commands");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("obs-cli").join("config.yaml");

        run(InitArgs { force: false }, Some(&path)).unwrap();
        assert!(path.exists());
        assert!(ObsConfig::load(Some(&path)).is_ok());
    }

    #[test]
    fn test_init_keeps_existing_file_without_force() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(&path, "# mine\n").unwrap();

        run(InitArgs { force: false }, Some(&path)).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "# mine\n");

        run(InitArgs { force: true }, Some(&path)).unwrap();
        assert_ne!(fs::read_to_string(&path).unwrap(), "# mine\n");
    }
}
