//! Choosing the branch a commit originated from.
//! No I/O - the caller supplies the branches whose history contains the commit.
//!
//! Git history alone cannot tell which branch "owns" a commit once branches
//! have diverged and merged back. The choice here is a heuristic biased
//! towards the main line: `main`/`master` win over anything else, then
//! remote-qualified forms such as `origin/main`, then the first containing
//! branch in name order.

use super::types::BranchResolution;
use std::collections::BTreeSet;

const MAIN_LINE: [&str; 2] = ["main", "master"];

fn is_main_line(name: &str) -> bool {
    MAIN_LINE.contains(&name)
}

fn is_qualified_main_line(name: &str) -> bool {
    MAIN_LINE
        .iter()
        .any(|m| name.strip_suffix(m).is_some_and(|rest| rest.ends_with('/')))
}

/// Pick one branch out of the branches whose history contains the commit.
///
/// Ties between several main-line names are broken by name order, so the
/// answer is stable for an unchanged repository.
pub fn select_originating_branch<I, S>(containing: I) -> BranchResolution
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let containing: BTreeSet<String> = containing.into_iter().map(Into::into).collect();

    let selected = containing
        .iter()
        .find(|b| is_main_line(b))
        .or_else(|| containing.iter().find(|b| is_qualified_main_line(b)))
        .or_else(|| containing.iter().next());

    match selected {
        Some(name) => BranchResolution::Found(name.clone()),
        None => BranchResolution::NotFound,
    }
}
