//! Git repository port (trait).
//! Defines the interface for git operations without coupling to any implementation.

use crate::domain::{Branch, Commit, TreeSnapshot};
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Port for git repository operations.
/// Implementations may use git2, shell commands, or test fakes.
pub trait GitRepo {
    /// Working directory of the repository.
    fn workdir(&self) -> Result<PathBuf>;

    /// Resolve any revision (full or abbreviated hash, ref name) to a commit.
    fn resolve_commit(&self, rev: &str) -> Result<Commit>;

    /// The first commit visited after `commit_id` itself when walking its
    /// ancestry. `None` at the root of the repository.
    fn previous_commit(&self, commit_id: &str) -> Result<Option<Commit>>;

    /// Full tree of a commit, path -> blob id.
    fn snapshot(&self, commit_id: &str) -> Result<TreeSnapshot>;

    /// Unified patch text turning `old` into `new`.
    fn diff_snapshots(&self, old: &TreeSnapshot, new: &TreeSnapshot) -> Result<String>;

    /// Every local and remote-tracking branch.
    fn branches(&self) -> Result<Vec<Branch>>;

    /// Whether `commit_id` is reachable from `tip` (inclusive).
    fn history_contains(&self, tip: &str, commit_id: &str) -> Result<bool>;

    /// Detach HEAD at the commit and reset the working tree to it,
    /// discarding local modifications and untracked files.
    fn checkout_clean(&self, commit_id: &str) -> Result<()>;

    /// Stage exactly these paths (relative to the working directory).
    fn stage_paths(&self, paths: &[&Path]) -> Result<()>;

    /// Commit the index on top of HEAD, returning the new commit id.
    fn commit(&self, message: &str) -> Result<String>;
}
