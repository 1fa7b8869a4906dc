//! Pull command

use anyhow::Result;
use obs_git::{pull_changes, GitError, PullOutcome};
use std::path::Path;

use super::{git_client, load_root_config};
use crate::output;

pub async fn run(config_path: Option<&Path>) -> Result<()> {
    output::header("Pull vault from remote");

    let config = load_root_config(config_path)?;
    let git = git_client(&config)?;
    output::kv("Repository", git.repo_path().as_str());

    let spinner = output::spinner("Fetching remote changes...");
    let result = pull_changes(&git, git.branch()).await;
    spinner.finish_and_clear();

    match result {
        Ok(PullOutcome::Pulled) => {
            output::success("Pull successful!");
            Ok(())
        }
        Ok(PullOutcome::WrongBranch { current, expected }) => {
            output::error(&format!(
                "You are not on the {} branch (current branch: {})",
                expected, current
            ));
            Ok(())
        }
        Err(GitError::Conflicts { files }) => {
            output::error("Conflicts detected!");
            output::info("Conflicting files:");
            for file in &files {
                println!("  - {}", file);
            }
            output::info("Resolve conflicts manually and commit changes");
            Err(GitError::Conflicts { files }.into())
        }
        Err(e) => Err(e.into()),
    }
}
