//! Push command

use anyhow::Result;
use clap::Args;
use obs_git::{push_changes, PushOutcome};
use std::path::Path;

use super::{git_client, load_root_config};
use crate::output;

#[derive(Args, Debug)]
pub struct PushArgs {
    /// Commit and push even when no changes are detected
    #[arg(short, long)]
    pub force: bool,
}

pub async fn run(args: PushArgs, config_path: Option<&Path>) -> Result<()> {
    output::header("Push vault to remote");

    let config = load_root_config(config_path)?;
    let git = git_client(&config)?;
    output::kv("Repository", git.repo_path().as_str());
    output::kv("Remote", &format!("{}/{}", git.remote(), git.branch()));

    let spinner = output::spinner("Synchronizing changes...");
    let result = push_changes(&git, args.force).await;
    spinner.finish_and_clear();

    match result {
        Ok(PushOutcome::NoChanges) => output::info("No changes to add"),
        Ok(PushOutcome::NothingToCommit) => output::info("No changes to commit"),
        Ok(PushOutcome::Pushed) => output::success("Push successful!"),
        Err(e) => {
            output::error("Unable to push to the remote");
            output::error("Check your internet connection and try again");
            return Err(e.into());
        }
    }

    Ok(())
}
