pub mod origin;
pub mod proposal;
pub mod types;

pub use origin::select_originating_branch;
pub use types::{
    Branch, BranchResolution, Commit, PatchRecord, PullRequestDraft, RepairMode, RuleOutcome,
    RuleResult, RunReport, StepStatus, TargetCommit, TreeSnapshot,
};
