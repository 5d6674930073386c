//! rulepatch - pipeline step that repairs one commit rule by rule
//! and stages each fix as a branch, commit and PR draft.

use anyhow::{Context, Result};
use clap::Parser;
use rulepatch::adapters::{CommandRepairEngine, Git2Repo, Identity, OutboxForge, TracingNotifier};
use rulepatch::config::Config;
use rulepatch::domain::{RunReport, StepStatus, TargetCommit};
use rulepatch::{RepairOrchestrator, RunSettings};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "rulepatch")]
#[command(about = "Repair a commit rule by rule and stage the fixes as pull requests")]
#[command(version)]
struct Args {
    /// Workspace holding the working checkout and the PR outbox
    #[arg(short, long, default_value = ".")]
    workspace: PathBuf,

    /// Commit hash to repair
    #[arg(short, long)]
    commit: String,

    /// Repository slug, e.g. owner/name
    #[arg(short, long)]
    slug: String,

    /// Rule to repair (repeatable; replaces the configured list)
    #[arg(short, long = "rule")]
    rules: Vec<String>,

    /// Request a pull request for every pushed patch branch
    #[arg(long)]
    create_pr: bool,

    /// Remote name or URL patch branches are pushed to
    #[arg(long)]
    fork_remote: Option<String>,

    /// Config file (default: <workspace>/rulepatch.toml, then the user config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => Config::load_from(path),
        None => Config::load(&args.workspace),
    }
    .context("Failed to load configuration")?;

    if !args.rules.is_empty() {
        config.run.rules = args.rules.clone();
    }
    if args.create_pr {
        config.run.create_pr = true;
    }
    if args.fork_remote.is_some() {
        config.forge.fork_remote = args.fork_remote.clone();
    }

    let report = run(&args, &config);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn run(args: &Args, config: &Config) -> RunReport {
    let settings = RunSettings::from_config(config);
    let repo_path = args.workspace.join(&config.run.repo_dir);

    // A missing checkout is an initialization failure, reported as a skip.
    let git = match Git2Repo::open(&repo_path) {
        Ok(git) => git.with_identity(Identity {
            name: config.git.committer_name.clone(),
            email: config.git.committer_email.clone(),
        }),
        Err(e) => {
            warn!(path = %repo_path.display(), error = %format!("{:#}", e), "skipping run");
            let target = TargetCommit::new(&settings.forge_base_url, &args.slug, &args.commit);
            let mut report = RunReport::new(Some(target));
            report.status = StepStatus::skipped(format!("initialization failed: {:#}", e));
            return report;
        }
    };

    let engine = CommandRepairEngine::new(
        &args.workspace,
        config.tool.program.clone(),
        config.tool.args.clone(),
    );
    let notifier = TracingNotifier;
    let forge = OutboxForge::new(
        &repo_path,
        config.forge.fork_remote.clone(),
        &args.workspace.join(&config.forge.outbox_dir),
    );

    info!(rules = ?settings.rules, create_pr = settings.create_pr, "starting repair run");
    RepairOrchestrator::new(&git, &engine, &notifier, &forge, settings).run(&args.commit, &args.slug)
}
