//! Error types for obs-git

use thiserror::Error;

/// Result type alias using obs-git's error type
pub type Result<T> = std::result::Result<T, GitError>;

/// Git synchronization error types
#[derive(Error, Debug)]
pub enum GitError {
    /// Git command not found
    #[error("Git command not found. Please ensure git is installed and in PATH")]
    GitNotFound,

    /// A git invocation exited unsuccessfully
    #[error("git {operation} failed: {output}")]
    CommandFailed { operation: String, output: String },

    /// Pull stopped on a merge conflict
    #[error("Merge conflicts detected in: {}", .files.join(", "))]
    Conflicts { files: Vec<String> },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GitError {
    /// Create a command failure error
    pub fn command_failed(operation: impl Into<String>, output: impl Into<String>) -> Self {
        Self::CommandFailed {
            operation: operation.into(),
            output: output.into(),
        }
    }

    /// Create a conflicts error
    pub fn conflicts(files: Vec<String>) -> Self {
        Self::Conflicts { files }
    }

    /// Whether a failed command reported a merge conflict
    pub fn is_conflict(&self) -> bool {
        match self {
            Self::CommandFailed { output, .. } => output.to_lowercase().contains("conflict"),
            Self::Conflicts { .. } => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_detection() {
        let err = GitError::command_failed(
            "pull",
            "CONFLICT (content): Merge conflict in notes/a.md",
        );
        assert!(err.is_conflict());

        let err = GitError::command_failed("pull", "fatal: unable to access remote");
        assert!(!err.is_conflict());
        assert!(!GitError::GitNotFound.is_conflict());
    }

    #[test]
    fn test_conflicts_message_lists_files() {
        let err = GitError::conflicts(vec!["a.md".to_string(), "b.md".to_string()]);
        assert_eq!(err.to_string(), "Merge conflicts detected in: a.md, b.md");
    }
}
