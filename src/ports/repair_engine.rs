//! Repair engine port (trait).
//! The rule-based fixer is a black box: rule + directory in, modified files out.

use crate::domain::{RepairMode, RuleResult, TargetCommit};
use anyhow::Result;
use std::path::Path;

pub trait RepairEngine {
    /// Apply the fixes for `rule` inside `workdir`.
    fn repair(&self, rule: &str, workdir: &Path, mode: &RepairMode) -> Result<()>;

    /// Repair the checkout found at `repo_path_hint` (relative to the engine's
    /// workspace) and report the files that were changed.
    fn repair_and_return_modified_files(
        &self,
        target: &TargetCommit,
        rule: &str,
        repo_path_hint: &str,
        mode: &RepairMode,
    ) -> Result<RuleResult>;
}
