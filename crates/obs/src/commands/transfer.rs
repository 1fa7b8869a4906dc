//! Cp and mv commands

use anyhow::Result;
use clap::Args;
use obs_core::{VaultCommand, VaultPlacement};
use std::path::{Path, PathBuf};

use super::load_config;
use crate::output;

#[derive(Args, Debug)]
pub struct TransferArgs {
    /// File to place in the vault
    pub source: PathBuf,

    /// Destination directory in the vault (defaults to the configured path)
    #[arg(short, long)]
    pub destination: Option<PathBuf>,
}

pub fn run(args: TransferArgs, command: VaultCommand, config_path: Option<&Path>) -> Result<()> {
    let (title, done) = match command {
        VaultCommand::Copy => ("Copy file to Obsidian vault", "File copied to"),
        VaultCommand::Move => ("Move file to Obsidian vault", "File moved to"),
    };
    output::header(title);

    let config = load_config(config_path)?;
    let placement = VaultPlacement::resolve(&config, args.destination.as_deref(), command)?;
    if placement.from_default {
        output::info(&format!(
            "Using default destination: {}",
            placement.directory.display()
        ));
    }

    let target = placement.transfer(&args.source, command.into())?;
    output::success(&format!("{} {}", done, target.display()));
    Ok(())
}
