//! Pure data types for the repair domain.
//! No I/O, no dependencies on external crates beyond serde.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A commit as seen through the history walker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub id: String,
    pub parents: Vec<String>,
    pub summary: String,
}

impl Commit {
    pub fn short_id(&self) -> &str {
        &self.id[..self.id.len().min(10)]
    }
}

/// Full path -> content mapping of one commit's tree.
///
/// Snapshots are equal exactly when their tree ids are. The tree id also
/// covers file modes, which `entries` does not record.
#[derive(Debug, Clone)]
pub struct TreeSnapshot {
    pub commit_id: String,
    pub tree_id: String,
    pub entries: BTreeMap<String, String>,
}

impl TreeSnapshot {
    pub fn file_count(&self) -> usize {
        self.entries.len()
    }

    /// Same tree regardless of which commit it was read from.
    pub fn same_content(&self, other: &TreeSnapshot) -> bool {
        self.tree_id == other.tree_id
    }
}

impl PartialEq for TreeSnapshot {
    fn eq(&self, other: &Self) -> bool {
        self.same_content(other)
    }
}

impl Eq for TreeSnapshot {}

/// A named pointer to a commit.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Branch {
    pub name: String,
    pub tip: String,
}

/// Outcome of looking for the branch a commit came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchResolution {
    Found(String),
    NotFound,
}

/// What is being repaired: one commit of one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetCommit {
    pub repo_url: String,
    pub commit_id: String,
    pub slug: String,
}

impl TargetCommit {
    pub fn new(forge_base_url: &str, slug: &str, commit_id: &str) -> Self {
        let base = forge_base_url.trim_end_matches('/');
        let slug = slug.trim_matches('/');
        Self {
            repo_url: format!("{}/{}", base, slug),
            commit_id: commit_id.trim().to_string(),
            slug: slug.to_string(),
        }
    }

    pub fn commit_url(&self) -> String {
        format!("{}/commit/{}", self.repo_url, self.commit_id)
    }
}

/// Opaque strategy selector handed to the repair engine unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepairMode(pub String);

impl RepairMode {
    pub const SNIPER: &'static str = "SNIPER";

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RepairMode {
    fn default() -> Self {
        Self(Self::SNIPER.to_string())
    }
}

impl fmt::Display for RepairMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Files the repair engine touched for one rule. Empty means nothing fixed.
pub type RuleResult = BTreeSet<String>;

/// Artifact produced per rule and handed to the notification hook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatchRecord {
    pub tool_name: String,
    pub description: String,
    pub diff: String,
}

/// Text and refs for one pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequestDraft {
    pub title: String,
    pub body: String,
    pub base_branch: String,
    pub head_branch: String,
}

/// Pipeline-facing status of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepStatus {
    Success,
    Skipped { reason: String },
}

impl StepStatus {
    pub fn skipped(reason: impl Into<String>) -> Self {
        StepStatus::Skipped {
            reason: reason.into(),
        }
    }
}

/// Where a single rule ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RuleOutcome {
    /// Engine fixed nothing; no commit was made.
    NothingFixed { rule: String },
    Patched {
        rule: String,
        commit_id: String,
        files: Vec<String>,
        branch: Option<String>,
        pull_request: bool,
    },
}

impl RuleOutcome {
    pub fn rule(&self) -> &str {
        match self {
            RuleOutcome::NothingFixed { rule } | RuleOutcome::Patched { rule, .. } => rule,
        }
    }
}

/// Everything one run produced, serialized as the step's output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    #[serde(flatten)]
    pub status: StepStatus,
    pub target: Option<TargetCommit>,
    pub base_branch: Option<String>,
    pub patched: bool,
    pub rules: Vec<RuleOutcome>,
    pub patches: Vec<PatchRecord>,
    pub pull_requests: Vec<PullRequestDraft>,
}

impl RunReport {
    pub fn new(target: Option<TargetCommit>) -> Self {
        Self {
            status: StepStatus::Success,
            target,
            base_branch: None,
            patched: false,
            rules: Vec::new(),
            patches: Vec::new(),
            pull_requests: Vec::new(),
        }
    }
}
