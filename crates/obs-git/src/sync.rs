//! Push and pull flows for the vault repository

use crate::error::{GitError, Result};
use crate::ops::GitOps;
use chrono::{DateTime, Local};
use tracing::{info, warn};

/// Layout of the automatic commit message (local time)
pub const COMMIT_TIME_FORMAT: &str = "%d-%m-%Y_%H:%M:%S";

/// How a push ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushOutcome {
    /// Working tree clean and push not forced
    NoChanges,

    /// Changes were staged but the commit produced nothing
    NothingToCommit,

    Pushed,
}

/// How a pull ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PullOutcome {
    /// Checked-out branch is not the one to synchronize; nothing was done
    WrongBranch { current: String, expected: String },

    Pulled,
}

/// Commit message for a synchronization at `now`
pub fn commit_message(now: DateTime<Local>) -> String {
    now.format(COMMIT_TIME_FORMAT).to_string()
}

/// Commit every local change and push it.
///
/// With `force`, the add/commit/push sequence runs even when the working
/// tree looks clean.
pub async fn push_changes(git: &dyn GitOps, force: bool) -> Result<PushOutcome> {
    info!("Checking for changes");
    if !git.has_changes().await? && !force {
        info!("No changes to add");
        return Ok(PushOutcome::NoChanges);
    }

    git.add_all().await?;
    info!("Changes added");

    let message = commit_message(Local::now());
    if let Err(e) = git.commit(&message).await {
        warn!("Commit failed: {}", e);
        return Ok(PushOutcome::NothingToCommit);
    }
    info!("Commit {} created", message);

    git.push().await?;
    info!("Push successful");
    Ok(PushOutcome::Pushed)
}

/// Fetch and merge remote changes into `expected_branch`.
///
/// # Errors
/// Returns [`GitError::Conflicts`] listing the conflicting files when the
/// merge stops on conflicts
pub async fn pull_changes(git: &dyn GitOps, expected_branch: &str) -> Result<PullOutcome> {
    let current = git.current_branch().await?;
    if current != expected_branch {
        warn!(
            "Not on the {} branch (current branch: {})",
            expected_branch, current
        );
        return Ok(PullOutcome::WrongBranch {
            current,
            expected: expected_branch.to_string(),
        });
    }

    git.fetch().await?;
    info!("Fetch completed");

    match git.pull().await {
        Ok(()) => {
            info!("Pull successful");
            Ok(PullOutcome::Pulled)
        }
        Err(e) if e.is_conflict() => {
            let files = git.list_conflicts().await?;
            Err(GitError::conflicts(files))
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::sync::Mutex;

    /// Scripted [`GitOps`] recording every call
    #[derive(Default)]
    struct MockGit {
        branch: String,
        changes: bool,
        commit_fails: bool,
        pull_output: Option<String>,
        conflicts: Vec<String>,
        calls: Mutex<Vec<&'static str>>,
    }

    impl MockGit {
        fn on_main() -> Self {
            Self {
                branch: "main".to_string(),
                ..Default::default()
            }
        }

        fn record(&self, call: &'static str) {
            self.calls.lock().unwrap().push(call);
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl GitOps for MockGit {
        async fn current_branch(&self) -> Result<String> {
            self.record("current_branch");
            Ok(self.branch.clone())
        }

        async fn fetch(&self) -> Result<()> {
            self.record("fetch");
            Ok(())
        }

        async fn pull(&self) -> Result<()> {
            self.record("pull");
            match &self.pull_output {
                Some(output) => Err(GitError::command_failed("pull", output.clone())),
                None => Ok(()),
            }
        }

        async fn push(&self) -> Result<()> {
            self.record("push");
            Ok(())
        }

        async fn add_all(&self) -> Result<()> {
            self.record("add_all");
            Ok(())
        }

        async fn commit(&self, _message: &str) -> Result<()> {
            self.record("commit");
            if self.commit_fails {
                Err(GitError::command_failed("commit", "nothing to commit"))
            } else {
                Ok(())
            }
        }

        async fn has_changes(&self) -> Result<bool> {
            self.record("has_changes");
            Ok(self.changes)
        }

        async fn list_conflicts(&self) -> Result<Vec<String>> {
            self.record("list_conflicts");
            Ok(self.conflicts.clone())
        }
    }

    #[test]
    fn test_commit_message_format() {
        let now = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(commit_message(now), "09-03-2024_14:05:07");
    }

    #[tokio::test]
    async fn test_push_without_changes() {
        let git = MockGit::on_main();
        assert_eq!(push_changes(&git, false).await.unwrap(), PushOutcome::NoChanges);
        assert_eq!(git.calls(), vec!["has_changes"]);
    }

    #[tokio::test]
    async fn test_forced_push_without_changes() {
        let git = MockGit::on_main();
        assert_eq!(push_changes(&git, true).await.unwrap(), PushOutcome::Pushed);
        assert_eq!(git.calls(), vec!["has_changes", "add_all", "commit", "push"]);
    }

    #[tokio::test]
    async fn test_push_with_changes() {
        let git = MockGit {
            changes: true,
            ..MockGit::on_main()
        };
        assert_eq!(push_changes(&git, false).await.unwrap(), PushOutcome::Pushed);
        assert_eq!(git.calls(), vec!["has_changes", "add_all", "commit", "push"]);
    }

    #[tokio::test]
    async fn test_push_stops_when_commit_fails() {
        let git = MockGit {
            changes: true,
            commit_fails: true,
            ..MockGit::on_main()
        };
        assert_eq!(
            push_changes(&git, false).await.unwrap(),
            PushOutcome::NothingToCommit
        );
        assert!(!git.calls().contains(&"push"));
    }

    #[tokio::test]
    async fn test_pull_on_wrong_branch() {
        let git = MockGit {
            branch: "feature".to_string(),
            ..Default::default()
        };
        assert_eq!(
            pull_changes(&git, "main").await.unwrap(),
            PullOutcome::WrongBranch {
                current: "feature".to_string(),
                expected: "main".to_string(),
            }
        );
        assert_eq!(git.calls(), vec!["current_branch"]);
    }

    #[tokio::test]
    async fn test_pull_success() {
        let git = MockGit::on_main();
        assert_eq!(pull_changes(&git, "main").await.unwrap(), PullOutcome::Pulled);
        assert_eq!(git.calls(), vec!["current_branch", "fetch", "pull"]);
    }

    #[tokio::test]
    async fn test_pull_conflict_lists_files() {
        let git = MockGit {
            pull_output: Some("CONFLICT (content): Merge conflict in notes/a.md".to_string()),
            conflicts: vec!["notes/a.md".to_string()],
            ..MockGit::on_main()
        };

        match pull_changes(&git, "main").await {
            Err(GitError::Conflicts { files }) => assert_eq!(files, vec!["notes/a.md"]),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_pull_failure_is_propagated() {
        let git = MockGit {
            pull_output: Some("fatal: could not read from remote".to_string()),
            ..MockGit::on_main()
        };

        assert!(matches!(
            pull_changes(&git, "main").await,
            Err(GitError::CommandFailed { .. })
        ));
        assert!(!git.calls().contains(&"list_conflicts"));
    }
}
