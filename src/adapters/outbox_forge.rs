//! PullRequestForge that pushes with git2 and writes PR requests to an outbox
//! directory as JSON, for the hosting integration to pick up.

use crate::domain::PullRequestDraft;
use crate::ports::{PullRequestForge, PushHandle};
use anyhow::{Context, Result};
use git2::Repository;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub struct OutboxForge {
    repo_root: PathBuf,
    fork_remote: Option<String>,
    outbox: PathBuf,
}

#[derive(Debug, Serialize)]
struct OutboxEntry<'a> {
    #[serde(flatten)]
    draft: &'a PullRequestDraft,
    created_at: String,
}

impl OutboxForge {
    pub fn new(repo_root: &Path, fork_remote: Option<String>, outbox: &Path) -> Self {
        Self {
            repo_root: repo_root.to_path_buf(),
            fork_remote,
            outbox: outbox.to_path_buf(),
        }
    }

    fn repo(&self) -> Result<Repository> {
        Repository::open(&self.repo_root)
            .with_context(|| format!("Failed to open repository at {}", self.repo_root.display()))
    }

    pub fn draft_path(&self, head_branch: &str) -> PathBuf {
        self.outbox
            .join(format!("{}.json", head_branch.replace('/', "_")))
    }
}

/// Remote names are looked up; anything that looks like a URL or path is
/// used directly.
fn is_url_like(remote: &str) -> bool {
    remote.contains("://") || remote.contains('/') || remote.ends_with(".git")
}

impl PullRequestForge for OutboxForge {
    fn fork_remote(&self) -> Option<String> {
        self.fork_remote.clone()
    }

    fn create_branch_for_push(&self, name: &str) -> Result<PushHandle> {
        let repo = self.repo()?;
        let head = repo
            .head()
            .and_then(|h| h.peel_to_commit())
            .context("Failed to get HEAD commit")?;
        // Reruns on the same commit and rule reuse the deterministic name.
        repo.branch(name, &head, true)
            .with_context(|| format!("Failed to create branch {}", name))?;
        Ok(PushHandle {
            branch: name.to_string(),
            commit_id: head.id().to_string(),
        })
    }

    fn push(&self, handle: &PushHandle, remote: &str, branch: &str) -> Result<()> {
        let repo = self.repo()?;
        let mut remote_handle = if is_url_like(remote) {
            repo.remote_anonymous(remote)
        } else {
            repo.find_remote(remote)
        }
        .with_context(|| format!("Failed to find remote {}", remote))?;

        let refspec = format!("+refs/heads/{}:refs/heads/{}", handle.branch, branch);
        remote_handle
            .push(&[refspec.as_str()], None)
            .with_context(|| format!("Failed to push {} to {}", branch, remote))?;
        info!(remote, branch, commit = %handle.commit_id, "pushed patch branch");
        Ok(())
    }

    fn create_pull_request(&self, draft: &PullRequestDraft) -> Result<()> {
        fs::create_dir_all(&self.outbox).context("Failed to create outbox directory")?;
        let entry = OutboxEntry {
            draft,
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        let path = self.draft_path(&draft.head_branch);
        let json = serde_json::to_string_pretty(&entry)?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(base = %draft.base_branch, head = %draft.head_branch, path = %path.display(), "pull request queued");
        Ok(())
    }
}
