//! Git synchronization for obs-cli
//!
//! The vault root is a git repository tracking a single remote branch.
//! This crate provides:
//! - the [`GitOps`] trait and its `git` command line implementation
//! - the push flow (stage, timestamped commit, push)
//! - the pull flow (branch check, fetch, merge with conflict reporting)
//!
//! # Examples
//!
//! ```no_run
//! use obs_git::{push_changes, GitCli, PushOutcome};
//!
//! # async fn example() -> obs_git::Result<()> {
//! let git = GitCli::new("/home/me/Obsidian", "origin", "main")?;
//! if push_changes(&git, false).await? == PushOutcome::NoChanges {
//!     println!("Nothing to push");
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod ops;
pub mod sync;

pub use error::{GitError, Result};
pub use ops::{GitCli, GitOps, DEFAULT_BRANCH, DEFAULT_REMOTE};
pub use sync::{commit_message, pull_changes, push_changes, PullOutcome, PushOutcome};
