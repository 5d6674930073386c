//! Git2 implementation of the GitRepo port.
//!
//! The repository is reopened for every operation and dropped before the
//! call returns, so no libgit2 handle outlives a single port call.

use crate::domain::{Branch, Commit, RuleResult, TreeSnapshot};
use crate::ports::GitRepo;
use anyhow::{anyhow, Context, Result};
use git2::build::CheckoutBuilder;
use git2::{
    DiffFormat, DiffOptions, ObjectType, Oid, ReferenceType, Repository, Signature, Sort,
    Status, StatusOptions, TreeWalkMode, TreeWalkResult,
};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Name and email stamped on commits created by the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

impl Default for Identity {
    fn default() -> Self {
        Self {
            name: "rulepatch".to_string(),
            email: "rulepatch@users.noreply.github.com".to_string(),
        }
    }
}

pub struct Git2Repo {
    root: PathBuf,
    identity: Identity,
}

impl Git2Repo {
    /// Open the repository rooted exactly at `path`. Enclosing repositories
    /// are never searched.
    pub fn open(path: &Path) -> Result<Self> {
        let repo = Repository::open(path)
            .with_context(|| format!("Failed to open git repository at {}", path.display()))?;
        let root = repo
            .workdir()
            .map(PathBuf::from)
            .ok_or_else(|| anyhow!("Repository has no working directory (bare repo?)"))?;
        Ok(Self {
            root,
            identity: Identity::default(),
        })
    }

    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.identity = identity;
        self
    }

    fn repo(&self) -> Result<Repository> {
        Repository::open(&self.root)
            .with_context(|| format!("Failed to open repository at {}", self.root.display()))
    }
}

fn resolve_oid(repo: &Repository, rev: &str) -> Result<Oid> {
    let commit = repo
        .revparse_single(rev)
        .and_then(|obj| obj.peel_to_commit())
        .with_context(|| format!("Failed to resolve commit '{}'", rev))?;
    Ok(commit.id())
}

fn to_commit(commit: &git2::Commit) -> Commit {
    Commit {
        id: commit.id().to_string(),
        parents: commit.parent_ids().map(|p| p.to_string()).collect(),
        summary: commit.summary().unwrap_or("").to_string(),
    }
}

/// Make `path` relative to the working directory if it points inside it.
fn relative_to(workdir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.strip_prefix(workdir)
            .map(PathBuf::from)
            .unwrap_or_else(|_| path.to_path_buf())
    } else {
        path.to_path_buf()
    }
}

fn render_patch(diff: &git2::Diff) -> Result<String> {
    let mut out = String::new();
    diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
        if let origin @ ('+' | '-' | ' ') = line.origin() {
            out.push(origin);
        }
        out.push_str(&String::from_utf8_lossy(line.content()));
        true
    })
    .context("Failed to render diff")?;
    Ok(out)
}

impl GitRepo for Git2Repo {
    fn workdir(&self) -> Result<PathBuf> {
        Ok(self.root.clone())
    }

    fn resolve_commit(&self, rev: &str) -> Result<Commit> {
        let repo = self.repo()?;
        let oid = resolve_oid(&repo, rev)?;
        let commit = repo.find_commit(oid)?;
        Ok(to_commit(&commit))
    }

    fn previous_commit(&self, commit_id: &str) -> Result<Option<Commit>> {
        let repo = self.repo()?;
        let start = resolve_oid(&repo, commit_id)?;

        let mut revwalk = repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push(start)?;

        // The walk yields the starting commit first.
        let previous = revwalk
            .nth(1)
            .transpose()
            .context("Failed to walk commit history")?;

        match previous {
            Some(oid) => Ok(Some(to_commit(&repo.find_commit(oid)?))),
            None => Ok(None),
        }
    }

    fn snapshot(&self, commit_id: &str) -> Result<TreeSnapshot> {
        let repo = self.repo()?;
        let oid = resolve_oid(&repo, commit_id)?;
        let commit = repo.find_commit(oid)?;
        let tree = commit.tree().context("Failed to read commit tree")?;

        let mut entries = BTreeMap::new();
        tree.walk(TreeWalkMode::PreOrder, |root, entry| {
            // Gitlinks (submodules) show up as commit entries.
            if matches!(entry.kind(), Some(ObjectType::Blob) | Some(ObjectType::Commit)) {
                let name = String::from_utf8_lossy(entry.name_bytes());
                entries.insert(format!("{}{}", root, name), entry.id().to_string());
            }
            TreeWalkResult::Ok
        })
        .context("Failed to walk commit tree")?;

        Ok(TreeSnapshot {
            commit_id: oid.to_string(),
            tree_id: tree.id().to_string(),
            entries,
        })
    }

    fn diff_snapshots(&self, old: &TreeSnapshot, new: &TreeSnapshot) -> Result<String> {
        if old.same_content(new) {
            return Ok(String::new());
        }

        let repo = self.repo()?;
        let old_tree = repo.find_tree(Oid::from_str(&old.tree_id)?)?;
        let new_tree = repo.find_tree(Oid::from_str(&new.tree_id)?)?;

        let mut opts = DiffOptions::new();
        opts.context_lines(3);

        let diff = repo
            .diff_tree_to_tree(Some(&old_tree), Some(&new_tree), Some(&mut opts))
            .context("Failed to diff trees")?;

        render_patch(&diff)
    }

    fn branches(&self) -> Result<Vec<Branch>> {
        let repo = self.repo()?;
        let mut branches = Vec::new();

        for entry in repo.branches(None).context("Failed to list branches")? {
            let (branch, _kind) = entry?;
            let reference = branch.get();
            // Skip symbolic refs like origin/HEAD
            if reference.kind() == Some(ReferenceType::Symbolic) {
                continue;
            }
            let (Some(name), Some(tip)) = (branch.name()?, reference.target()) else {
                continue;
            };
            branches.push(Branch {
                name: name.to_string(),
                tip: tip.to_string(),
            });
        }

        branches.sort();
        Ok(branches)
    }

    fn history_contains(&self, tip: &str, commit_id: &str) -> Result<bool> {
        let repo = self.repo()?;
        let tip = resolve_oid(&repo, tip)?;
        let target = resolve_oid(&repo, commit_id)?;

        let mut revwalk = repo.revwalk()?;
        revwalk.push(tip)?;
        for oid in revwalk {
            if oid.context("Failed to walk commit history")? == target {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn checkout_clean(&self, commit_id: &str) -> Result<()> {
        let repo = self.repo()?;
        let oid = resolve_oid(&repo, commit_id)?;
        let commit = repo.find_commit(oid)?;

        let mut checkout = CheckoutBuilder::new();
        checkout.force().remove_untracked(true);
        repo.checkout_tree(commit.as_object(), Some(&mut checkout))
            .with_context(|| format!("Failed to check out {}", oid))?;
        repo.set_head_detached(oid)
            .context("Failed to detach HEAD")?;
        Ok(())
    }

    fn stage_paths(&self, paths: &[&Path]) -> Result<()> {
        let repo = self.repo()?;
        let mut index = repo.index().context("Failed to get index")?;

        for path in paths {
            let rel = relative_to(&self.root, path);
            if self.root.join(&rel).exists() {
                index
                    .add_path(&rel)
                    .with_context(|| format!("Failed to stage {}", rel.display()))?;
            } else {
                index
                    .remove_path(&rel)
                    .with_context(|| format!("Failed to stage removal of {}", rel.display()))?;
            }
        }

        index.write().context("Failed to write index")?;
        Ok(())
    }

    fn commit(&self, message: &str) -> Result<String> {
        let repo = self.repo()?;
        let mut index = repo.index().context("Failed to get index")?;
        let tree_oid = index.write_tree().context("Failed to write tree")?;
        let tree = repo.find_tree(tree_oid)?;

        let parent = repo
            .head()
            .and_then(|h| h.peel_to_commit())
            .context("Failed to get parent commit")?;

        let sig = Signature::now(&self.identity.name, &self.identity.email)
            .context("Invalid committer identity")?;

        let oid = repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &[&parent])
            .context("Failed to create commit")?;
        Ok(oid.to_string())
    }
}

/// Tracked files whose working-tree content differs from the index.
pub fn modified_tracked_files(workdir: &Path) -> Result<RuleResult> {
    let repo = Repository::open(workdir)
        .with_context(|| format!("Failed to open repository at {}", workdir.display()))?;

    let mut opts = StatusOptions::new();
    opts.include_untracked(false).include_ignored(false);

    let statuses = repo
        .statuses(Some(&mut opts))
        .context("Failed to read repository status")?;

    let changed = Status::WT_MODIFIED | Status::WT_DELETED | Status::WT_TYPECHANGE | Status::WT_RENAMED;
    Ok(statuses
        .iter()
        .filter(|entry| entry.status().intersects(changed))
        .filter_map(|entry| entry.path().map(String::from))
        .collect())
}
