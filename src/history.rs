//! Commit history queries built on the [`GitRepo`] port: the predecessor of a
//! commit, the diff a commit introduced, and the branch it came from.

use crate::domain::{select_originating_branch, BranchResolution, Commit, TreeSnapshot};
use crate::ports::GitRepo;
use anyhow::Result;
use tracing::debug;

/// Diff text reported for a commit that has no ancestor.
pub const START_OF_REPO: &str = "Start of repo";

/// First ancestor visited after `commit_id` itself, `None` at the root.
pub fn previous_commit(repo: &dyn GitRepo, commit_id: &str) -> Result<Option<Commit>> {
    repo.previous_commit(commit_id)
}

pub fn snapshot(repo: &dyn GitRepo, commit_id: &str) -> Result<TreeSnapshot> {
    repo.snapshot(commit_id)
}

/// Unified diff between a commit and its predecessor.
///
/// Root commits yield [`START_OF_REPO`]. Identical trees yield an empty
/// string; a tree that differs only in file modes still yields a patch.
pub fn diff_for_commit(repo: &dyn GitRepo, commit_id: &str) -> Result<String> {
    let Some(previous) = previous_commit(repo, commit_id)? else {
        return Ok(START_OF_REPO.to_string());
    };

    let old = snapshot(repo, &previous.id)?;
    let new = snapshot(repo, commit_id)?;
    debug!(
        old = %previous.short_id(),
        new = %commit_id,
        old_files = old.file_count(),
        new_files = new.file_count(),
        "diffing snapshots"
    );

    repo.diff_snapshots(&old, &new)
}

/// Branch whose history contains `commit_id`, preferring main-line branches.
pub fn resolve_originating_branch(repo: &dyn GitRepo, commit_id: &str) -> Result<BranchResolution> {
    let target = repo.resolve_commit(commit_id)?;

    let mut containing = Vec::new();
    for branch in repo.branches()? {
        if repo.history_contains(&branch.tip, &target.id)? {
            containing.push(branch.name);
        }
    }
    debug!(commit = %target.short_id(), containing = ?containing, "branches containing commit");

    Ok(select_originating_branch(containing))
}
