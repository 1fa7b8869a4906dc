//! obs - Obsidian vault manager
//!
//! This is the main entry point for the obs command-line interface.

mod cli;
mod commands;
mod output;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{ArchiveCommands, Cli, Commands};
use obs_core::VaultCommand;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI args
    let cli = Cli::parse();

    // Initialize tracing
    init_tracing(cli.verbose, cli.quiet);

    let config = cli.config.as_deref().map(|p| p.as_std_path());

    // Run command
    match cli.command {
        Commands::Init(args) => commands::init::run(args, config),
        Commands::Cp(args) => commands::transfer::run(args, VaultCommand::Copy, config),
        Commands::Mv(args) => commands::transfer::run(args, VaultCommand::Move, config),
        Commands::Push(args) => commands::push::run(args, config).await,
        Commands::Pull => commands::pull::run(config).await,
        Commands::Callouts => commands::callouts::run(config),
        Commands::Archive(ArchiveCommands::Create(args)) => {
            commands::archive::create(args, config).await
        }
        Commands::Archive(ArchiveCommands::Extract(args)) => {
            commands::archive::extract(args, config).await
        }
    }
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            // User-facing progress goes through `output`; logs stay quiet by default
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
