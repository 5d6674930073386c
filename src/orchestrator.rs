//! Drives one repair run: for each rule, check out the target commit, run the
//! repair engine, commit what it fixed and turn the commit into a patch and,
//! when configured, a pull request.
//!
//! Rules are processed strictly one after another on a single working
//! checkout. Each rule moves through [`RuleState`]; the first error ends the
//! whole run as skipped.

use crate::config::Config;
use crate::domain::proposal::{commit_message, patch_branch_name, pull_request_draft, BRANCH_HASH_LEN};
use crate::domain::{
    BranchResolution, PatchRecord, RepairMode, RuleOutcome, RuleResult, RunReport, StepStatus,
    TargetCommit,
};
use crate::error::{Result, RunError};
use crate::history;
use crate::ports::{GitRepo, PatchNotifier, PullRequestForge, RepairEngine};
use std::path::Path;
use tracing::{debug, error, info, info_span, warn};

/// Run-wide settings, fixed before the first rule starts.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub rules: Vec<String>,
    pub mode: RepairMode,
    pub create_pr: bool,
    /// Where the engine finds the checkout, relative to its workspace.
    pub repo_path_hint: String,
    pub branch_prefix: String,
    pub tool_name: String,
    pub rule_doc_url: String,
    pub forge_base_url: String,
}

impl RunSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            rules: config.run.rules.clone(),
            mode: RepairMode(config.run.repair_mode.clone()),
            create_pr: config.run.create_pr,
            repo_path_hint: config.run.repo_dir.clone(),
            branch_prefix: config.run.branch_prefix.clone(),
            tool_name: config.tool.name.clone(),
            rule_doc_url: config.tool.rule_doc_url.clone(),
            forge_base_url: config.forge.base_url.clone(),
        }
    }
}

/// Where a single rule is in its lifecycle.
#[derive(Debug, Clone, PartialEq)]
enum RuleState {
    NotStarted,
    CheckedOut,
    Repaired(RuleResult),
    Committed { commit_id: String, files: RuleResult },
    PatchBuilt { commit_id: String, files: RuleResult, patch: PatchRecord },
    Notified { commit_id: String, files: RuleResult },
    Finished(RuleOutcome),
}

impl RuleState {
    fn name(&self) -> &'static str {
        match self {
            RuleState::NotStarted => "not_started",
            RuleState::CheckedOut => "checked_out",
            RuleState::Repaired(_) => "repaired",
            RuleState::Committed { .. } => "committed",
            RuleState::PatchBuilt { .. } => "patch_built",
            RuleState::Notified { .. } => "notified",
            RuleState::Finished(_) => "finished",
        }
    }
}

pub struct RepairOrchestrator<'a> {
    git: &'a dyn GitRepo,
    engine: &'a dyn RepairEngine,
    notifier: &'a dyn PatchNotifier,
    forge: &'a dyn PullRequestForge,
    settings: RunSettings,
}

/// Per-run context shared by every rule.
struct RunContext<'r> {
    target: &'r TargetCommit,
    base_branch: &'r str,
}

impl<'a> RepairOrchestrator<'a> {
    pub fn new(
        git: &'a dyn GitRepo,
        engine: &'a dyn RepairEngine,
        notifier: &'a dyn PatchNotifier,
        forge: &'a dyn PullRequestForge,
        settings: RunSettings,
    ) -> Self {
        Self {
            git,
            engine,
            notifier,
            forge,
            settings,
        }
    }

    /// Repair `commit_id` of `slug` with every configured rule.
    pub fn run(&self, commit_id: &str, slug: &str) -> RunReport {
        let _span = info_span!("repair_run", slug, commit = %commit_id).entered();

        let target = TargetCommit::new(&self.settings.forge_base_url, slug, commit_id);
        let mut report = RunReport::new(Some(target.clone()));

        let (target, base_branch) = match self.initialize(target) {
            Ok(resolved) => resolved,
            Err(e) => {
                warn!(kind = e.kind(), error = %e, "skipping run");
                report.status = StepStatus::skipped(e.to_string());
                return report;
            }
        };
        info!(url = %target.commit_url(), base = %base_branch, rules = self.settings.rules.len(), "working on commit");
        report.target = Some(target.clone());
        report.base_branch = Some(base_branch.clone());

        let ctx = RunContext {
            target: &target,
            base_branch: &base_branch,
        };

        for rule in &self.settings.rules {
            info!(rule = %rule, "processing rule");
            match self.process_rule(&ctx, rule, &mut report) {
                Ok(outcome) => report.rules.push(outcome),
                Err(e) => {
                    error!(rule = %rule, kind = e.kind(), error = %e, "aborting run");
                    report.status = StepStatus::skipped(format!(
                        "Error while repairing with {}: {}",
                        self.settings.tool_name, e
                    ));
                    return report;
                }
            }
        }

        info!(patched = report.patched, patches = report.patches.len(), "run finished");
        report
    }

    /// Validate the target, pin it to its full commit id and settle the base
    /// branch for later PRs. Branch names, URLs and checkouts all use the
    /// pinned id from here on.
    fn initialize(&self, mut target: TargetCommit) -> Result<(TargetCommit, String)> {
        let id = &target.commit_id;
        if id.len() < BRANCH_HASH_LEN || !id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(RunError::Initialization(format!(
                "'{}' is not a commit hash of at least {} hex characters",
                id, BRANCH_HASH_LEN
            )));
        }

        let commit = self.git.resolve_commit(id).map_err(|e| {
            RunError::Initialization(format!("failed to resolve commit {}: {:#}", id, e))
        })?;
        if commit.id != target.commit_id {
            debug!(given = %target.commit_id, full = %commit.id, "pinned abbreviated commit id");
        }
        target.commit_id = commit.id;

        let base_branch = match history::resolve_originating_branch(self.git, &target.commit_id) {
            Ok(BranchResolution::Found(branch)) => branch,
            Ok(BranchResolution::NotFound) => {
                return Err(RunError::Initialization(format!(
                    "no branch contains commit {}",
                    target.commit_id
                )))
            }
            Err(e) => {
                return Err(RunError::Initialization(format!(
                    "failed looking for the original branch: {:#}",
                    e
                )))
            }
        };
        Ok((target, base_branch))
    }

    fn process_rule(&self, ctx: &RunContext<'_>, rule: &str, report: &mut RunReport) -> Result<RuleOutcome> {
        let mut state = RuleState::NotStarted;
        loop {
            if let RuleState::Finished(outcome) = state {
                return Ok(outcome);
            }
            let from = state.name();
            state = self.advance(ctx, rule, state, report)?;
            debug!(rule, from, to = state.name(), "rule transition");
        }
    }

    fn advance(
        &self,
        ctx: &RunContext<'_>,
        rule: &str,
        state: RuleState,
        report: &mut RunReport,
    ) -> Result<RuleState> {
        let git_err = |cause| RunError::Git {
            rule: rule.to_string(),
            cause,
        };
        let engine_err = |cause| RunError::RepairEngine {
            rule: rule.to_string(),
            cause,
        };

        match state {
            RuleState::NotStarted => {
                // Every rule starts from a fresh checkout of the target.
                self.git
                    .checkout_clean(&ctx.target.commit_id)
                    .map_err(git_err)?;
                Ok(RuleState::CheckedOut)
            }

            RuleState::CheckedOut => {
                let files = self
                    .engine
                    .repair_and_return_modified_files(
                        ctx.target,
                        rule,
                        &self.settings.repo_path_hint,
                        &self.settings.mode,
                    )
                    .map_err(engine_err)?;
                Ok(RuleState::Repaired(files))
            }

            RuleState::Repaired(files) if files.is_empty() => {
                info!(rule, "nothing to fix");
                Ok(RuleState::Finished(RuleOutcome::NothingFixed {
                    rule: rule.to_string(),
                }))
            }

            RuleState::Repaired(files) => {
                let workdir = self.git.workdir().map_err(git_err)?;
                self.engine
                    .repair(rule, &workdir, &self.settings.mode)
                    .map_err(engine_err)?;

                let paths: Vec<&Path> = files.iter().map(Path::new).collect();
                self.git.stage_paths(&paths).map_err(git_err)?;
                let commit_id = self
                    .git
                    .commit(&commit_message(&self.settings.tool_name, rule))
                    .map_err(git_err)?;

                report.patched = true;
                info!(rule, commit = %commit_id, files = files.len(), "committed fixes");
                Ok(RuleState::Committed { commit_id, files })
            }

            RuleState::Committed { commit_id, files } => {
                let diff = history::diff_for_commit(self.git, &commit_id)
                    .map_err(RunError::HistoryTraversal)?;
                let patch = PatchRecord {
                    tool_name: self.settings.tool_name.clone(),
                    description: commit_message(&self.settings.tool_name, rule),
                    diff,
                };
                Ok(RuleState::PatchBuilt {
                    commit_id,
                    files,
                    patch,
                })
            }

            RuleState::PatchBuilt {
                commit_id,
                files,
                patch,
            } => {
                self.notifier.notify(std::slice::from_ref(&patch));
                report.patches.push(patch);
                Ok(RuleState::Notified { commit_id, files })
            }

            RuleState::Notified { commit_id, files } => {
                let files: Vec<String> = files.into_iter().collect();

                let Some(remote) = self.forge.fork_remote() else {
                    debug!(rule, "no fork remote configured, not pushing");
                    return Ok(RuleState::Finished(RuleOutcome::Patched {
                        rule: rule.to_string(),
                        commit_id,
                        files,
                        branch: None,
                        pull_request: false,
                    }));
                };

                let transport_err = |cause| RunError::Transport {
                    rule: rule.to_string(),
                    cause,
                };
                let branch =
                    patch_branch_name(&self.settings.branch_prefix, &ctx.target.commit_id, rule);
                let handle = self
                    .forge
                    .create_branch_for_push(&branch)
                    .map_err(transport_err)?;
                self.forge
                    .push(&handle, &remote, &branch)
                    .map_err(transport_err)?;

                if self.settings.create_pr {
                    let draft = pull_request_draft(
                        &self.settings.tool_name,
                        &self.settings.rule_doc_url,
                        rule,
                        ctx.base_branch,
                        &branch,
                    );
                    self.forge
                        .create_pull_request(&draft)
                        .map_err(transport_err)?;
                    report.pull_requests.push(draft);
                }

                Ok(RuleState::Finished(RuleOutcome::Patched {
                    rule: rule.to_string(),
                    commit_id,
                    files,
                    branch: Some(branch),
                    pull_request: self.settings.create_pr,
                }))
            }

            RuleState::Finished(outcome) => Ok(RuleState::Finished(outcome)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PullRequestDraft;
    use crate::history::START_OF_REPO;
    use crate::ports::PushHandle;
    use crate::test_support::TestRepo;
    use anyhow::anyhow;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::fs;
    use std::path::PathBuf;

    /// Writes canned file contents into the checkout and reports the listed
    /// paths as modified.
    struct FakeEngine {
        workdir: PathBuf,
        writes: HashMap<String, Vec<(&'static str, &'static str)>>,
        reported: HashMap<String, Vec<&'static str>>,
        fail_on: Option<&'static str>,
        calls: RefCell<Vec<String>>,
    }

    impl FakeEngine {
        fn new(workdir: &Path) -> Self {
            Self {
                workdir: workdir.to_path_buf(),
                writes: HashMap::new(),
                reported: HashMap::new(),
                fail_on: None,
                calls: RefCell::new(Vec::new()),
            }
        }

        fn fixes(
            mut self,
            rule: &str,
            writes: Vec<(&'static str, &'static str)>,
            reported: Vec<&'static str>,
        ) -> Self {
            self.writes.insert(rule.to_string(), writes);
            self.reported.insert(rule.to_string(), reported);
            self
        }
    }

    impl RepairEngine for FakeEngine {
        fn repair(&self, rule: &str, _workdir: &Path, _mode: &RepairMode) -> anyhow::Result<()> {
            self.calls.borrow_mut().push(format!("repair:{}", rule));
            Ok(())
        }

        fn repair_and_return_modified_files(
            &self,
            _target: &TargetCommit,
            rule: &str,
            repo_path_hint: &str,
            mode: &RepairMode,
        ) -> anyhow::Result<RuleResult> {
            self.calls
                .borrow_mut()
                .push(format!("scan:{}:{}:{}", rule, repo_path_hint, mode));
            if self.fail_on == Some(rule) {
                return Err(anyhow!("tool crashed"));
            }
            for (path, content) in self.writes.get(rule).into_iter().flatten() {
                fs::write(self.workdir.join(path), content)?;
            }
            Ok(self
                .reported
                .get(rule)
                .into_iter()
                .flatten()
                .map(|p| p.to_string())
                .collect())
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        patches: RefCell<Vec<PatchRecord>>,
        calls: RefCell<usize>,
    }

    impl PatchNotifier for RecordingNotifier {
        fn notify(&self, patches: &[PatchRecord]) {
            *self.calls.borrow_mut() += 1;
            self.patches.borrow_mut().extend_from_slice(patches);
        }
    }

    #[derive(Default)]
    struct FakeForge {
        remote: Option<String>,
        reject_push: bool,
        branches: RefCell<Vec<String>>,
        pushes: RefCell<Vec<(String, String)>>,
        prs: RefCell<Vec<PullRequestDraft>>,
    }

    impl PullRequestForge for FakeForge {
        fn fork_remote(&self) -> Option<String> {
            self.remote.clone()
        }

        fn create_branch_for_push(&self, name: &str) -> anyhow::Result<PushHandle> {
            self.branches.borrow_mut().push(name.to_string());
            Ok(PushHandle {
                branch: name.to_string(),
                commit_id: String::new(),
            })
        }

        fn push(&self, _handle: &PushHandle, remote: &str, branch: &str) -> anyhow::Result<()> {
            if self.reject_push {
                return Err(anyhow!("remote rejected {}", branch));
            }
            self.pushes
                .borrow_mut()
                .push((remote.to_string(), branch.to_string()));
            Ok(())
        }

        fn create_pull_request(&self, draft: &PullRequestDraft) -> anyhow::Result<()> {
            self.prs.borrow_mut().push(draft.clone());
            Ok(())
        }
    }

    fn settings(rules: &[&str], create_pr: bool) -> RunSettings {
        let mut config = Config::default();
        config.run.rules = rules.iter().map(|r| r.to_string()).collect();
        config.run.create_pr = create_pr;
        RunSettings::from_config(&config)
    }

    fn fork() -> FakeForge {
        FakeForge {
            remote: Some("fork".to_string()),
            ..Default::default()
        }
    }

    /// Repository with one commit on main holding Foo.java and Bar.java.
    fn java_repo() -> (TestRepo, String) {
        let t = TestRepo::new();
        let base = t.commit("refs/heads/main", None, "init", &[("README.md", "demo\n")]);
        let a = t.commit(
            "refs/heads/main",
            Some(&base),
            "java",
            &[
                ("Foo.java", "class Foo { int x; }\n"),
                ("Bar.java", "class Bar {}\n"),
            ],
        );
        (t, a)
    }

    #[test]
    fn single_rule_produces_commit_patch_and_pr() {
        let (t, a) = java_repo();
        let git = t.git();
        let engine = FakeEngine::new(t.path()).fixes(
            "S1234",
            vec![
                ("Foo.java", "class Foo { final int x; }\n"),
                // Unrelated noise that must not leak into the commit.
                ("Bar.java", "class Bar { /* noise */ }\n"),
            ],
            vec!["Foo.java"],
        );
        let notifier = RecordingNotifier::default();
        let forge = fork();

        let orchestrator =
            RepairOrchestrator::new(&git, &engine, &notifier, &forge, settings(&["S1234"], true));
        let report = orchestrator.run(&a, "acme/widgets");

        assert_eq!(report.status, StepStatus::Success);
        assert!(report.patched);
        assert_eq!(report.base_branch.as_deref(), Some("main"));

        // Exactly one new commit on top of the target, touching only Foo.java.
        let head_commit = git.resolve_commit("HEAD").unwrap();
        let head = head_commit.id.clone();
        assert_eq!(head_commit.parents, vec![a.clone()]);
        assert_eq!(head_commit.summary, "Proposal for patching the Sorald rule S1234");
        let before = git.snapshot(&a).unwrap();
        let after = git.snapshot(&head).unwrap();
        assert_ne!(before.entries["Foo.java"], after.entries["Foo.java"]);
        assert_eq!(before.entries["Bar.java"], after.entries["Bar.java"]);

        // One patch, notified once.
        assert_eq!(*notifier.calls.borrow(), 1);
        let patches = notifier.patches.borrow();
        assert_eq!(patches.len(), 1);
        assert_eq!(patches[0].tool_name, "Sorald");
        assert_ne!(patches[0].diff, START_OF_REPO);
        assert!(patches[0].diff.contains("+class Foo { final int x; }"));
        assert!(!patches[0].diff.contains("Bar.java"));
        assert_eq!(report.patches, *patches);

        // One branch, pushed to the fork, one PR against main.
        let branch = format!("repair-patch-{}_S1234", &a[..10]);
        assert_eq!(*forge.branches.borrow(), vec![branch.clone()]);
        assert_eq!(*forge.pushes.borrow(), vec![("fork".to_string(), branch.clone())]);
        let prs = forge.prs.borrow();
        assert_eq!(prs.len(), 1);
        assert_eq!(prs[0].title, "Fix Sorald violations");
        assert_eq!(prs[0].base_branch, "main");
        assert_eq!(prs[0].head_branch, branch);
        assert!(prs[0]
            .body
            .contains("https://rules.sonarsource.com/java/RSPEC-S1234"));

        assert_eq!(
            report.rules,
            vec![RuleOutcome::Patched {
                rule: "S1234".into(),
                commit_id: head,
                files: vec!["Foo.java".into()],
                branch: Some(branch),
                pull_request: true,
            }]
        );
    }

    #[test]
    fn engine_call_passes_hint_and_mode_through() {
        let (t, a) = java_repo();
        let git = t.git();
        let engine = FakeEngine::new(t.path());
        let notifier = RecordingNotifier::default();
        let forge = FakeForge::default();

        RepairOrchestrator::new(&git, &engine, &notifier, &forge, settings(&["S1"], false))
            .run(&a, "acme/widgets");

        assert_eq!(*engine.calls.borrow(), vec!["scan:S1:tmp_repo:SNIPER".to_string()]);
    }

    #[test]
    fn empty_result_skips_rule_and_continues() {
        let (t, a) = java_repo();
        let git = t.git();
        let engine = FakeEngine::new(t.path()).fixes(
            "S2",
            vec![("Foo.java", "class Foo { final int x; }\n")],
            vec!["Foo.java"],
        );
        let notifier = RecordingNotifier::default();
        let forge = fork();

        let report = RepairOrchestrator::new(
            &git,
            &engine,
            &notifier,
            &forge,
            settings(&["S1", "S2"], true),
        )
        .run(&a, "acme/widgets");

        assert_eq!(report.status, StepStatus::Success);
        assert_eq!(report.rules.len(), 2);
        assert_eq!(
            report.rules[0],
            RuleOutcome::NothingFixed { rule: "S1".into() }
        );
        assert_eq!(report.rules[1].rule(), "S2");

        // Only S2 reached commit, notification and PR.
        assert_eq!(*notifier.calls.borrow(), 1);
        assert_eq!(forge.prs.borrow().len(), 1);
        assert_eq!(forge.prs.borrow()[0].head_branch, format!("repair-patch-{}_S2", &a[..10]));
        let head = git.resolve_commit("HEAD").unwrap();
        assert_eq!(head.parents, vec![a]);
    }

    #[test]
    fn each_rule_starts_from_the_target_commit() {
        let (t, a) = java_repo();
        let git = t.git();
        let engine = FakeEngine::new(t.path())
            .fixes("S1", vec![("Foo.java", "class Foo { final int x; }\n")], vec!["Foo.java"])
            .fixes("S2", vec![("Bar.java", "final class Bar {}\n")], vec!["Bar.java"]);
        let notifier = RecordingNotifier::default();
        let forge = FakeForge::default();

        let report = RepairOrchestrator::new(
            &git,
            &engine,
            &notifier,
            &forge,
            settings(&["S1", "S2"], false),
        )
        .run(&a, "acme/widgets");

        // The second patch holds only its own rule's change.
        let patches = notifier.patches.borrow();
        assert_eq!(patches.len(), 2);
        assert!(patches[0].diff.contains("Foo.java") && !patches[0].diff.contains("Bar.java"));
        assert!(patches[1].diff.contains("Bar.java") && !patches[1].diff.contains("Foo.java"));

        let head = git.resolve_commit("HEAD").unwrap();
        assert_eq!(head.parents, vec![a]);

        // No fork: nothing pushed, but both rules are patched.
        assert!(forge.branches.borrow().is_empty());
        assert!(report
            .rules
            .iter()
            .all(|r| matches!(r, RuleOutcome::Patched { branch: None, .. })));
    }

    #[test]
    fn engine_failure_aborts_remaining_rules() {
        let (t, a) = java_repo();
        let git = t.git();
        let mut engine = FakeEngine::new(t.path()).fixes(
            "S2",
            vec![("Foo.java", "class Foo { final int x; }\n")],
            vec!["Foo.java"],
        );
        engine.fail_on = Some("S1");
        let notifier = RecordingNotifier::default();
        let forge = fork();

        let report = RepairOrchestrator::new(
            &git,
            &engine,
            &notifier,
            &forge,
            settings(&["S1", "S2"], true),
        )
        .run(&a, "acme/widgets");

        match &report.status {
            StepStatus::Skipped { reason } => {
                assert!(reason.starts_with("Error while repairing with Sorald"), "{reason}");
                assert!(reason.contains("tool crashed"), "{reason}");
            }
            other => panic!("expected Skipped, got {:?}", other),
        }
        assert!(report.rules.is_empty());
        assert!(!report.patched);
        assert_eq!(engine.calls.borrow().len(), 1);
        assert_eq!(*notifier.calls.borrow(), 0);
        assert!(forge.prs.borrow().is_empty());
    }

    #[test]
    fn fork_without_create_pr_pushes_only() {
        let (t, a) = java_repo();
        let git = t.git();
        let engine = FakeEngine::new(t.path()).fixes(
            "S1",
            vec![("Foo.java", "class Foo { final int x; }\n")],
            vec!["Foo.java"],
        );
        let notifier = RecordingNotifier::default();
        let forge = fork();

        let report = RepairOrchestrator::new(&git, &engine, &notifier, &forge, settings(&["S1"], false))
            .run(&a, "acme/widgets");

        assert_eq!(forge.pushes.borrow().len(), 1);
        assert!(forge.prs.borrow().is_empty());
        assert!(report.pull_requests.is_empty());
    }

    #[test]
    fn commit_on_no_branch_skips_run() {
        let (t, a) = java_repo();
        let stray = t.commit("refs/tags/stray", Some(&a), "stray", &[("x.txt", "x\n")]);
        let git = t.git();
        let engine = FakeEngine::new(t.path());
        let notifier = RecordingNotifier::default();
        let forge = fork();

        let report = RepairOrchestrator::new(&git, &engine, &notifier, &forge, settings(&["S1"], true))
            .run(&stray, "acme/widgets");

        assert!(matches!(report.status, StepStatus::Skipped { .. }));
        assert!(report.base_branch.is_none());
        assert!(engine.calls.borrow().is_empty());
    }

    #[test]
    fn malformed_commit_id_skips_run() {
        let (t, _) = java_repo();
        let git = t.git();
        let engine = FakeEngine::new(t.path());
        let notifier = RecordingNotifier::default();
        let forge = FakeForge::default();

        for bad in ["abc123", "not-a-hash-at-all", "zzzzzzzzzzzz"] {
            let report = RepairOrchestrator::new(&git, &engine, &notifier, &forge, settings(&["S1"], false))
                .run(bad, "acme/widgets");
            assert!(matches!(report.status, StepStatus::Skipped { .. }), "{bad}");
        }
        assert!(engine.calls.borrow().is_empty());
    }

    #[test]
    fn unknown_commit_skips_run() {
        let (t, _) = java_repo();
        let git = t.git();
        let engine = FakeEngine::new(t.path());
        let notifier = RecordingNotifier::default();
        let forge = FakeForge::default();

        let report = RepairOrchestrator::new(&git, &engine, &notifier, &forge, settings(&["S1"], false))
            .run("0123456789abcdef0123456789abcdef01234567", "acme/widgets");

        match report.status {
            StepStatus::Skipped { reason } => {
                assert!(reason.contains("failed to resolve commit"), "{reason}")
            }
            other => panic!("expected Skipped, got {:?}", other),
        }
    }

    #[test]
    fn abbreviated_commit_id_is_pinned_to_full_hash() {
        let (t, a) = java_repo();
        let git = t.git();
        let engine = FakeEngine::new(t.path()).fixes(
            "S1",
            vec![("Foo.java", "class Foo { final int x; }\n")],
            vec!["Foo.java"],
        );
        let notifier = RecordingNotifier::default();
        let forge = fork();

        let report = RepairOrchestrator::new(&git, &engine, &notifier, &forge, settings(&["S1"], false))
            .run(&a[..12], "acme/widgets");

        assert_eq!(report.status, StepStatus::Success);
        let target = report.target.as_ref().unwrap();
        assert_eq!(target.commit_id, a);
        assert_eq!(
            target.commit_url(),
            format!("https://github.com/acme/widgets/commit/{}", a)
        );
        assert_eq!(
            *forge.branches.borrow(),
            vec![format!("repair-patch-{}_S1", &a[..10])]
        );
        assert_eq!(git.resolve_commit("HEAD").unwrap().parents, vec![a]);
    }

    #[test]
    fn push_failure_aborts_remaining_rules() {
        let (t, a) = java_repo();
        let git = t.git();
        let engine = FakeEngine::new(t.path())
            .fixes("S1", vec![("Foo.java", "class Foo { final int x; }\n")], vec!["Foo.java"])
            .fixes("S2", vec![("Bar.java", "final class Bar {}\n")], vec!["Bar.java"]);
        let notifier = RecordingNotifier::default();
        let forge = FakeForge {
            reject_push: true,
            ..fork()
        };

        let report = RepairOrchestrator::new(
            &git,
            &engine,
            &notifier,
            &forge,
            settings(&["S1", "S2"], true),
        )
        .run(&a, "acme/widgets");

        match &report.status {
            StepStatus::Skipped { reason } => {
                assert!(reason.starts_with("Error while repairing with Sorald"), "{reason}");
                assert!(reason.contains("remote rejected"), "{reason}");
            }
            other => panic!("expected Skipped, got {:?}", other),
        }
        // S1 was committed and notified before the push failed; S2 never ran.
        assert!(report.patched);
        assert_eq!(report.patches.len(), 1);
        assert_eq!(*notifier.calls.borrow(), 1);
        assert!(report.rules.is_empty());
        assert!(forge.pushes.borrow().is_empty());
        assert!(forge.prs.borrow().is_empty());
        assert!(!engine.calls.borrow().iter().any(|c| c.contains("S2")));
    }
}
