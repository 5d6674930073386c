//! Throwaway git repositories for tests.

use crate::adapters::Git2Repo;
use git2::{Oid, Repository, RepositoryInitOptions, Signature};
use std::collections::BTreeMap;
use std::path::Path;
use tempfile::TempDir;

pub struct TestRepo {
    pub repo: Repository,
    pub dir: TempDir,
}

impl TestRepo {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let mut opts = RepositoryInitOptions::new();
        opts.initial_head("main");
        let repo = Repository::init_opts(dir.path(), &opts).unwrap();

        let mut config = repo.config().unwrap();
        config.set_str("user.name", "Test User").unwrap();
        config.set_str("user.email", "test@example.com").unwrap();

        Self { repo, dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn git(&self) -> Git2Repo {
        Git2Repo::open(self.path()).unwrap()
    }

    /// Commit `files` on top of `parent` straight into the object database,
    /// moving `refname` to the new commit. The working tree is left alone.
    /// Paths may be nested one directory deep.
    pub fn commit(
        &self,
        refname: &str,
        parent: Option<&str>,
        message: &str,
        files: &[(&str, &str)],
    ) -> String {
        let entries: Vec<(&str, &str, i32)> = files
            .iter()
            .map(|&(name, content)| (name, content, 0o100644))
            .collect();
        self.commit_with_modes(refname, parent, message, &entries)
    }

    /// Like [`TestRepo::commit`], with an explicit filemode per file.
    pub fn commit_with_modes(
        &self,
        refname: &str,
        parent: Option<&str>,
        message: &str,
        files: &[(&str, &str, i32)],
    ) -> String {
        let parent = parent.map(|p| self.find(p));
        let base_tree = parent.as_ref().map(|c| c.tree().unwrap());

        let mut builder = self.repo.treebuilder(base_tree.as_ref()).unwrap();
        let mut nested: BTreeMap<&str, Vec<(&str, &str, i32)>> = BTreeMap::new();
        for &(name, content, mode) in files {
            if let Some((dir, file)) = name.split_once('/') {
                assert!(!file.contains('/'), "only one directory level: {name}");
                nested.entry(dir).or_default().push((file, content, mode));
                continue;
            }
            let blob = self.repo.blob(content.as_bytes()).unwrap();
            builder.insert(name, blob, mode).unwrap();
        }
        // One builder per directory so files sharing it accumulate.
        for (dir, dir_files) in nested {
            let existing = base_tree
                .as_ref()
                .and_then(|t| t.get_name(dir))
                .map(|e| self.repo.find_tree(e.id()).unwrap());
            let mut sub = self.repo.treebuilder(existing.as_ref()).unwrap();
            for (file, content, mode) in dir_files {
                let blob = self.repo.blob(content.as_bytes()).unwrap();
                sub.insert(file, blob, mode).unwrap();
            }
            let sub_oid = sub.write().unwrap();
            builder.insert(dir, sub_oid, 0o040000).unwrap();
        }
        let tree = self.repo.find_tree(builder.write().unwrap()).unwrap();

        let parents: Vec<&git2::Commit> = parent.iter().collect();
        self.write_commit(refname, message, &tree, &parents)
    }

    /// Merge commit on `refname` whose tree is taken from the first parent.
    pub fn merge(&self, refname: &str, parents: &[&str], message: &str) -> String {
        let parents: Vec<git2::Commit> = parents.iter().map(|p| self.find(p)).collect();
        let tree = parents[0].tree().unwrap();
        let refs: Vec<&git2::Commit> = parents.iter().collect();
        self.write_commit(refname, message, &tree, &refs)
    }

    fn find(&self, id: &str) -> git2::Commit<'_> {
        self.repo.find_commit(Oid::from_str(id).unwrap()).unwrap()
    }

    fn write_commit(
        &self,
        refname: &str,
        message: &str,
        tree: &git2::Tree,
        parents: &[&git2::Commit],
    ) -> String {
        let sig = Signature::now("Test User", "test@example.com").unwrap();
        self.repo
            .commit(Some(refname), &sig, &sig, message, tree, parents)
            .unwrap()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn files_sharing_a_directory_accumulate() {
        let t = TestRepo::new();
        let a = t.commit(
            "refs/heads/main",
            None,
            "A",
            &[("src/A.java", "a\n"), ("src/B.java", "b\n")],
        );
        let b = t.commit("refs/heads/main", Some(&a), "B", &[("src/C.java", "c\n")]);
        let tree = t.find(&b).tree().unwrap();
        let src = t.repo.find_tree(tree.get_name("src").unwrap().id()).unwrap();
        let names: Vec<String> = src.iter().map(|e| e.name().unwrap().to_string()).collect();
        assert_eq!(names, vec!["A.java", "B.java", "C.java"]);
    }
}
