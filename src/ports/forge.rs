//! Pull-request transport port (trait).
//! Branch creation, pushing and PR requests against the hosting forge.

use crate::domain::PullRequestDraft;
use anyhow::Result;

/// A local branch ready to be pushed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushHandle {
    pub branch: String,
    pub commit_id: String,
}

pub trait PullRequestForge {
    /// Remote that patch branches are pushed to. `None` disables branch,
    /// push and PR creation.
    fn fork_remote(&self) -> Option<String>;

    /// Create `name` at the current HEAD.
    fn create_branch_for_push(&self, name: &str) -> Result<PushHandle>;

    fn push(&self, handle: &PushHandle, remote: &str, branch: &str) -> Result<()>;

    fn create_pull_request(&self, draft: &PullRequestDraft) -> Result<()>;
}
