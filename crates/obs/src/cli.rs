//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

// Re-export command types for convenience
pub use crate::commands::archive::{CreateArgs, ExtractArgs};
pub use crate::commands::init::InitArgs;
pub use crate::commands::push::PushArgs;
pub use crate::commands::transfer::TransferArgs;

/// obs - Manage your Obsidian vault from the terminal
#[derive(Parser, Debug)]
#[command(name = "obs")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress log output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to config.yaml (defaults to ~/.config/obs-cli/config.yaml)
    #[arg(short, long, global = true, env = "OBS_CLI_CONFIG")]
    pub config: Option<Utf8PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the configuration file
    Init(InitArgs),

    /// Copy a file into the vault
    Cp(TransferArgs),

    /// Move a file into the vault
    Mv(TransferArgs),

    /// Commit and push vault changes
    Push(PushArgs),

    /// Pull remote changes into the vault
    Pull,

    /// Edit the callouts CSS snippet
    Callouts,

    /// Back up the vault to removable media and restore it
    #[command(subcommand)]
    Archive(ArchiveCommands),
}

#[derive(Subcommand, Debug)]
pub enum ArchiveCommands {
    /// Create a backup on the USB medium, replacing the previous one
    Create(CreateArgs),

    /// Extract the backup from the USB medium
    Extract(ExtractArgs),
}
