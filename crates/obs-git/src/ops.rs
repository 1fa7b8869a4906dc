//! Git operations on the vault repository
//!
//! [`GitOps`] is the seam the synchronization flows are written against.
//! [`GitCli`] implements it by running the `git` binary in the repository.

use crate::error::{GitError, Result};
use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use std::process::Output;
use tokio::process::Command;
use tracing::debug;

/// Default remote name
pub const DEFAULT_REMOTE: &str = "origin";

/// Default branch name
pub const DEFAULT_BRANCH: &str = "main";

/// Operations needed to synchronize a repository with its remote
#[async_trait]
pub trait GitOps: Send + Sync {
    /// Name of the checked-out branch
    async fn current_branch(&self) -> Result<String>;

    async fn fetch(&self) -> Result<()>;

    async fn pull(&self) -> Result<()>;

    async fn push(&self) -> Result<()>;

    /// Stage every change in the working tree
    async fn add_all(&self) -> Result<()>;

    async fn commit(&self, message: &str) -> Result<()>;

    /// Whether the working tree has uncommitted changes
    async fn has_changes(&self) -> Result<bool>;

    /// Paths with unresolved merge conflicts
    async fn list_conflicts(&self) -> Result<Vec<String>>;
}

/// [`GitOps`] backed by the `git` command line
#[derive(Debug, Clone)]
pub struct GitCli {
    repo_path: Utf8PathBuf,
    remote: String,
    branch: String,
}

impl GitCli {
    /// Create a client for the repository at `repo_path`
    ///
    /// # Errors
    /// Returns [`GitError::GitNotFound`] if git is not installed
    pub fn new(
        repo_path: impl Into<Utf8PathBuf>,
        remote: impl Into<String>,
        branch: impl Into<String>,
    ) -> Result<Self> {
        which::which("git").map_err(|_| GitError::GitNotFound)?;

        Ok(Self {
            repo_path: repo_path.into(),
            remote: remote.into(),
            branch: branch.into(),
        })
    }

    pub fn repo_path(&self) -> &Utf8Path {
        &self.repo_path
    }

    pub fn remote(&self) -> &str {
        &self.remote
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// Run git with `args`, failing on a non-zero exit
    async fn run(&self, operation: &str, args: &[&str]) -> Result<Output> {
        debug!("Running git {}", args.join(" "));

        let output = Command::new("git")
            .current_dir(&self.repo_path)
            .args(args)
            .output()
            .await?;

        if !output.status.success() {
            return Err(GitError::command_failed(operation, combined_output(&output)));
        }

        Ok(output)
    }
}

/// stderr followed by stdout; git reports merge conflicts on stdout
fn combined_output(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    [stderr.trim(), stdout.trim()]
        .iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("\n")
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}

#[async_trait]
impl GitOps for GitCli {
    async fn current_branch(&self) -> Result<String> {
        let output = self.run("branch", &["branch", "--show-current"]).await?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    async fn fetch(&self) -> Result<()> {
        self.run("fetch", &["fetch", &self.remote, &self.branch])
            .await?;
        Ok(())
    }

    async fn pull(&self) -> Result<()> {
        self.run("pull", &["pull", &self.remote, &self.branch]).await?;
        Ok(())
    }

    async fn push(&self) -> Result<()> {
        self.run("push", &["push", "--quiet", &self.remote, &self.branch])
            .await?;
        Ok(())
    }

    async fn add_all(&self) -> Result<()> {
        self.run("add", &["add", "."]).await?;
        Ok(())
    }

    async fn commit(&self, message: &str) -> Result<()> {
        self.run("commit", &["commit", "--quiet", "-m", message])
            .await?;
        Ok(())
    }

    async fn has_changes(&self) -> Result<bool> {
        let output = self.run("status", &["status", "--porcelain"]).await?;
        Ok(!output.stdout.is_empty())
    }

    async fn list_conflicts(&self) -> Result<Vec<String>> {
        let output = self
            .run("diff", &["diff", "--name-only", "--diff-filter=U"])
            .await?;
        Ok(stdout_lines(&output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn git_available() -> bool {
        which::which("git").is_ok()
    }

    async fn init_repo(dir: &Utf8Path) {
        for args in [
            vec!["init", "--quiet"],
            vec!["symbolic-ref", "HEAD", "refs/heads/main"],
            vec!["config", "user.email", "obs@example.com"],
            vec!["config", "user.name", "obs"],
            vec!["config", "commit.gpgsign", "false"],
        ] {
            let status = Command::new("git")
                .current_dir(dir)
                .args(&args)
                .status()
                .await
                .unwrap();
            assert!(status.success());
        }
    }

    fn utf8_dir(temp: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap()
    }

    #[cfg(unix)]
    #[test]
    fn test_combined_output_skips_empty_streams() {
        use std::os::unix::process::ExitStatusExt;
        let output = Output {
            status: std::process::ExitStatus::from_raw(256),
            stdout: b"CONFLICT (content): Merge conflict in a.md\n".to_vec(),
            stderr: Vec::new(),
        };
        assert_eq!(
            combined_output(&output),
            "CONFLICT (content): Merge conflict in a.md"
        );
    }

    #[tokio::test]
    async fn test_changes_add_and_commit() {
        if !git_available() {
            return;
        }
        let temp = TempDir::new().unwrap();
        let dir = utf8_dir(&temp);
        init_repo(&dir).await;

        let git = GitCli::new(dir.clone(), DEFAULT_REMOTE, DEFAULT_BRANCH).unwrap();
        assert!(!git.has_changes().await.unwrap());

        fs::write(dir.join("note.md"), "# note").unwrap();
        assert!(git.has_changes().await.unwrap());

        git.add_all().await.unwrap();
        git.commit("01-02-2024_10:00:00").await.unwrap();
        assert!(!git.has_changes().await.unwrap());
        assert_eq!(git.current_branch().await.unwrap(), "main");
        assert!(git.list_conflicts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_commit_without_changes_fails() {
        if !git_available() {
            return;
        }
        let temp = TempDir::new().unwrap();
        let dir = utf8_dir(&temp);
        init_repo(&dir).await;

        let git = GitCli::new(dir, DEFAULT_REMOTE, DEFAULT_BRANCH).unwrap();
        let err = git.commit("message").await.unwrap_err();
        assert!(matches!(err, GitError::CommandFailed { ref operation, .. } if operation == "commit"));
    }

    #[tokio::test]
    async fn test_push_without_remote_fails() {
        if !git_available() {
            return;
        }
        let temp = TempDir::new().unwrap();
        let dir = utf8_dir(&temp);
        init_repo(&dir).await;

        let git = GitCli::new(dir, DEFAULT_REMOTE, DEFAULT_BRANCH).unwrap();
        assert!(matches!(
            git.push().await,
            Err(GitError::CommandFailed { .. })
        ));
    }
}
