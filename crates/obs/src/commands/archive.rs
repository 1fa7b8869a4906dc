//! Archive commands: USB backup creation and extraction

use anyhow::{bail, Context, Result};
use clap::Args;
use dialoguer::Confirm;
use obs_backup::{
    format_bytes, BackupEvent, BackupOrchestrator, BackupParams, Error as BackupError,
    RestoreOrchestrator, RestoreParams, DEFAULT_COMPRESSION_LEVEL,
};
use obs_core::ObsConfig;
use std::path::{Path, PathBuf};

use super::load_root_config;
use crate::output;

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Also compare every file's SHA256 after writing the backup
    #[arg(long)]
    pub deep_verify: bool,

    /// Compression level (1-9)
    #[arg(
        long,
        default_value_t = DEFAULT_COMPRESSION_LEVEL,
        value_parser = clap::value_parser!(u32).range(1..=9)
    )]
    pub compression: u32,
}

#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Replace an existing extraction directory without asking
    #[arg(short, long)]
    pub yes: bool,
}

pub async fn create(args: CreateArgs, config_path: Option<&Path>) -> Result<()> {
    output::header("Backup Obsidian to USB");

    let config = load_root_config(config_path)?;
    let source = config.root().to_path_buf();
    let destination = archive_path(&config, &config.archive().usb_path, "usb_path")?;

    output::kv("Source", &source.display().to_string());
    output::kv("Destination", &destination.display().to_string());
    if args.deep_verify {
        output::kv("Verification", "structure and file checksums");
    }
    println!();

    let params = BackupParams::new(source, destination)
        .with_payload_verification(args.deep_verify)
        .with_compression_level(args.compression);

    let spinner = output::spinner("Checking backup medium...");
    let progress = spinner.clone();
    let result = tokio::task::spawn_blocking(move || {
        BackupOrchestrator::new(params)
            .on_event(move |event| match event {
                BackupEvent::StageStarted(stage) => progress.set_message(format!("{}...", stage)),
                BackupEvent::PreviousRemoved(path) => {
                    progress.println(format!("  Removed previous backup {}", path.display()))
                }
                BackupEvent::SpaceChecked(budget) => progress.println(format!(
                    "  Space required: {}, available: {}",
                    format_bytes(budget.required_bytes),
                    format_bytes(budget.available_bytes)
                )),
                _ => {}
            })
            .run()
    })
    .await
    .context("Backup task failed")?;
    spinner.finish_and_clear();

    let report = match result {
        Ok(report) => report,
        Err(BackupError::DestinationUnavailable { path }) => {
            output::error("USB drive not detected");
            bail!("Backup medium not present at {}", path.display());
        }
        Err(BackupError::InsufficientSpace {
            required,
            available,
        }) => {
            output::error(&format!(
                "Not enough space on the USB drive: {} required, {} available",
                format_bytes(required),
                format_bytes(available)
            ));
            return Err(BackupError::insufficient_space(required, available).into());
        }
        Err(e) => return Err(e.into()),
    };

    output::success("Backup created successfully!");
    output::kv("Archive", &report.artifact_path.display().to_string());
    output::kv(
        "Contents",
        &format!(
            "{} files, {} directories",
            report.encode.files, report.encode.directories
        ),
    );
    output::kv("Size", &format_bytes(report.artifact_bytes()));
    output::kv("SHA256", report.artifact_sha256());
    output::kv("Duration", &format!("{:.1}s", report.duration.as_secs_f64()));
    if report.encode.skipped > 0 {
        output::warning(&format!(
            "{} symbolic links or special files were not archived",
            report.encode.skipped
        ));
    }

    Ok(())
}

pub async fn extract(args: ExtractArgs, config_path: Option<&Path>) -> Result<()> {
    output::header("Extract Obsidian backup");

    let config = ObsConfig::load(config_path).context("Failed to load configuration")?;
    let destination = archive_path(&config, &config.archive().usb_path, "usb_path")?;
    let target = archive_path(&config, &config.archive().extract_path, "extract_path")?;

    let orchestrator = RestoreOrchestrator::new(RestoreParams::new(destination, target));
    let plan = match orchestrator.locate() {
        Ok(plan) => plan,
        Err(BackupError::DestinationUnavailable { path }) => {
            output::error("USB drive not detected");
            bail!("Backup medium not present at {}", path.display());
        }
        Err(e) => return Err(e.into()),
    };

    output::kv("Backup", &plan.artifact.display().to_string());
    output::kv("Target", &plan.target.display().to_string());
    println!();

    if plan.target_exists && !args.yes {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "{} already exists and will be replaced. Continue?",
                plan.target.display()
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            output::info("Extraction cancelled");
            return Ok(());
        }
    }

    let spinner = output::spinner("Extracting backup...");
    let result = tokio::task::spawn_blocking(move || orchestrator.execute(&plan))
        .await
        .context("Extraction task failed")?;
    spinner.finish_and_clear();
    let report = result?;

    output::success("Backup extracted successfully!");
    output::kv("Location", &report.target.display().to_string());
    output::kv(
        "Contents",
        &format!(
            "{} files, {} directories ({})",
            report.decode.files,
            report.decode.directories,
            format_bytes(report.decode.payload_bytes)
        ),
    );

    Ok(())
}

/// A required, non-empty path from the `config.archive` section
fn archive_path(config: &ObsConfig, value: &Path, key: &str) -> Result<PathBuf> {
    if value.as_os_str().is_empty() {
        bail!(
            "No 'config.archive.{}' configured in {}",
            key,
            config.config_path.display()
        );
    }
    Ok(value.to_path_buf())
}
