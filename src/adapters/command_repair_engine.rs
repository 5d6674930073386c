//! External-command implementation of the RepairEngine port.
//!
//! The configured program is run with `{rule}`, `{dir}` and `{mode}`
//! substituted in its arguments. Which files it changed is read back from git.

use super::git2_adapter::modified_tracked_files;
use crate::domain::{RepairMode, RuleResult, TargetCommit};
use crate::ports::RepairEngine;
use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

pub struct CommandRepairEngine {
    workspace: PathBuf,
    program: String,
    args: Vec<String>,
}

impl CommandRepairEngine {
    pub fn new(workspace: &Path, program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            workspace: workspace.to_path_buf(),
            program: program.into(),
            args,
        }
    }

    fn run(&self, rule: &str, dir: &Path, mode: &RepairMode) -> Result<()> {
        let args: Vec<String> = self
            .args
            .iter()
            .map(|a| expand(a, rule, dir, mode))
            .collect();
        debug!(program = %self.program, ?args, dir = %dir.display(), "running repair tool");

        let output = Command::new(&self.program)
            .args(&args)
            .current_dir(dir)
            .output()
            .with_context(|| format!("Failed to execute {}", self.program))?;

        if !output.status.success() {
            return Err(anyhow!(
                "{} failed for rule {}: {}",
                self.program,
                rule,
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }
        Ok(())
    }
}

fn expand(template: &str, rule: &str, dir: &Path, mode: &RepairMode) -> String {
    template
        .replace("{rule}", rule)
        .replace("{dir}", &dir.to_string_lossy())
        .replace("{mode}", mode.as_str())
}

impl RepairEngine for CommandRepairEngine {
    fn repair(&self, rule: &str, workdir: &Path, mode: &RepairMode) -> Result<()> {
        self.run(rule, workdir, mode)
    }

    fn repair_and_return_modified_files(
        &self,
        target: &TargetCommit,
        rule: &str,
        repo_path_hint: &str,
        mode: &RepairMode,
    ) -> Result<RuleResult> {
        let dir = self.workspace.join(repo_path_hint);
        self.run(rule, &dir, mode)?;

        let files = modified_tracked_files(&dir)?;
        info!(commit = %target.commit_id, rule, files = files.len(), "repair tool finished");
        Ok(files)
    }
}
